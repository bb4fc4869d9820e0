//! Launch sequence tests against a recording server factory.

use std::path::PathBuf;

use workflow_lite::config::IndexedValueType;
use workflow_lite::lifecycle::startup::STOPPED_MESSAGE;
use workflow_lite::lifecycle::{BootstrapState, Shutdown};
use workflow_lite::options::{ServerOption, StorageMode};

mod common;

use common::{argv, bootstrap, Behavior, RecordingFactory};

#[tokio::test]
async fn test_ephemeral_with_port() {
    let factory = RecordingFactory::default();
    let driver = bootstrap(factory.clone(), Shutdown::new());

    let completed = driver.run(argv(&["start", "--ephemeral", "--port", "7777"])).await.unwrap();
    assert_eq!(completed.message, STOPPED_MESSAGE);

    let config = factory.last_config().unwrap();
    assert_eq!(config.storage, StorageMode::Memory);
    assert_eq!(config.frontend_port, 7777);
    assert!(config.search_attributes.is_empty());
    assert!(config.logger.is_none());

    let recorded = factory.recorded.lock().unwrap();
    assert_eq!(recorded.started, 1);
    assert_eq!(recorded.ran, 1);
}

#[tokio::test]
async fn test_ephemeral_with_filename_fails_before_construction() {
    let factory = RecordingFactory::default();
    let driver = bootstrap(factory.clone(), Shutdown::new());

    let failure = driver
        .run(argv(&["start", "--ephemeral", "--filename", "foo.db"]))
        .await
        .unwrap_err();
    assert_eq!(failure.exit_code, 1);
    assert_eq!(failure.stage, BootstrapState::Validating);
    assert!(failure.message.contains("ephemeral"));
    assert!(failure.message.contains("filename"));
    assert_eq!(factory.build_count(), 0);
}

#[tokio::test]
async fn test_single_search_attribute() {
    let factory = RecordingFactory::default();
    let driver = bootstrap(factory.clone(), Shutdown::new());

    driver
        .run(argv(&[
            "start",
            "--search-attributes-key",
            "CustomID",
            "--search-attributes-type",
            "Keyword",
        ]))
        .await
        .unwrap();

    let recorded = factory.recorded.lock().unwrap();
    let registered: Vec<_> = recorded.options[0]
        .iter()
        .filter_map(|option| match option {
            ServerOption::SearchAttributes(map) => Some(map.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(registered.len(), 1);
    assert_eq!(registered[0].len(), 1);
    assert_eq!(registered[0]["CustomID"], IndexedValueType::Keyword);
}

#[tokio::test]
async fn test_search_attribute_count_mismatch() {
    let factory = RecordingFactory::default();
    let driver = bootstrap(factory.clone(), Shutdown::new());

    let failure = driver
        .run(argv(&[
            "start",
            "--search-attributes-key",
            "A,B",
            "--search-attributes-type",
            "Keyword",
        ]))
        .await
        .unwrap_err();
    assert_eq!(failure.stage, BootstrapState::Validating);
    assert!(failure.message.contains("must be the same"));
    assert_eq!(factory.build_count(), 0);
}

#[tokio::test]
async fn test_unknown_search_attribute_type() {
    let factory = RecordingFactory::default();
    let driver = bootstrap(factory.clone(), Shutdown::new());

    let failure = driver
        .run(argv(&[
            "start",
            "--search-attributes-key",
            "CustomID",
            "--search-attributes-type",
            "keyword",
        ]))
        .await
        .unwrap_err();
    assert_eq!(failure.exit_code, 1);
    assert_eq!(failure.stage, BootstrapState::Parsing);
    assert_eq!(
        failure.message,
        "the type: keyword is not a valid type for a search attribute"
    );
    assert_eq!(factory.build_count(), 0);
}

#[tokio::test]
async fn test_bad_log_format() {
    let driver = bootstrap(RecordingFactory::default(), Shutdown::new());

    let failure = driver.run(argv(&["start", "--log-format", "xml"])).await.unwrap_err();
    assert_eq!(failure.exit_code, 1);
    assert!(failure.message.contains("xml"));
    assert!(failure.message.contains("log-format"));
}

#[tokio::test]
async fn test_pretty_log_format_overrides_logger() {
    let factory = RecordingFactory::default();
    let driver = bootstrap(factory.clone(), Shutdown::new());

    driver.run(argv(&["start", "--log-format", "pretty"])).await.unwrap();
    assert!(factory.last_config().unwrap().logger.is_some());
}

#[tokio::test]
async fn test_positional_argument() {
    let driver = bootstrap(RecordingFactory::default(), Shutdown::new());

    let failure = driver.run(argv(&["start", "extra-arg"])).await.unwrap_err();
    assert_eq!(failure.exit_code, 1);
    assert_eq!(failure.message, "ERROR: start command doesn't support arguments.");
}

#[tokio::test]
async fn test_defaults_are_file_backed() {
    let factory = RecordingFactory::default();
    let driver = bootstrap(factory.clone(), Shutdown::new());

    driver.run(argv(&["start", "-n", "orders,billing"])).await.unwrap();
    let config = factory.last_config().unwrap();
    assert_eq!(
        config.storage,
        StorageMode::File(PathBuf::from("/tmp/workflow-lite-test/default.db"))
    );
    assert_eq!(config.frontend_port, 7233);
    assert_eq!(config.namespaces, vec!["orders", "billing"]);
}

#[tokio::test]
async fn test_interrupt_hook_reaches_server() {
    let factory = RecordingFactory::default();
    let hook = Shutdown::new();
    let driver = bootstrap(factory.clone(), hook.clone());

    driver.run(argv(&["start"])).await.unwrap();
    hook.trigger();
    assert!(factory.last_config().unwrap().interrupt.unwrap().is_triggered());
}

#[tokio::test]
async fn test_construction_failure() {
    let factory = RecordingFactory::with_behavior(Behavior::FailBuild);
    let driver = bootstrap(factory.clone(), Shutdown::new());

    let failure = driver.run(argv(&["start"])).await.unwrap_err();
    assert_eq!(failure.exit_code, 1);
    assert_eq!(failure.stage, BootstrapState::Constructing);
    assert_eq!(failure.message, "invalid frontend port: 0");
    assert_eq!(factory.recorded.lock().unwrap().started, 0);
}

#[tokio::test]
async fn test_start_failure() {
    let factory = RecordingFactory::with_behavior(Behavior::FailStart);
    let driver = bootstrap(factory.clone(), Shutdown::new());

    let failure = driver.run(argv(&["start"])).await.unwrap_err();
    assert_eq!(failure.exit_code, 1);
    assert_eq!(failure.stage, BootstrapState::Starting);
    assert_eq!(
        failure.message,
        "Unable to start server. Error: frontend failed: address in use"
    );
    assert_eq!(factory.recorded.lock().unwrap().ran, 0);
}

#[tokio::test]
async fn test_run_failure() {
    let factory = RecordingFactory::with_behavior(Behavior::FailRun);
    let driver = bootstrap(factory, Shutdown::new());

    let failure = driver.run(argv(&["start"])).await.unwrap_err();
    assert_eq!(failure.exit_code, 1);
    assert_eq!(failure.stage, BootstrapState::Running);
}

#[tokio::test]
async fn test_usage_errors_exit_one() {
    let driver = bootstrap(RecordingFactory::default(), Shutdown::new());

    let failure = driver.run(argv(&["start", "--port", "not-a-port"])).await.unwrap_err();
    assert_eq!(failure.exit_code, 1);

    let failure = driver.run(argv(&["start", "--no-such-flag"])).await.unwrap_err();
    assert_eq!(failure.exit_code, 1);
}

#[tokio::test]
async fn test_help_is_informational() {
    let driver = bootstrap(RecordingFactory::default(), Shutdown::new());

    let completed = driver.run(argv(&["start", "--help"])).await.unwrap();
    assert!(completed.message.contains("--search-attributes-key"));
    assert!(completed.message.contains("[default: 7233]"));
}
