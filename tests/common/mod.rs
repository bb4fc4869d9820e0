//! Shared utilities for launch tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use workflow_lite::config::LiteConfig;
use workflow_lite::lifecycle::{Bootstrap, Shutdown};
use workflow_lite::options::{ServerConfig, ServerOptionSet};
use workflow_lite::server::{ServerError, ServerFactory, WorkflowServer};

/// What a [`RecordingFactory`] should do with the servers it builds.
#[derive(Debug, Clone, Copy, Default)]
pub enum Behavior {
    #[default]
    Succeed,
    FailBuild,
    FailStart,
    FailRun,
}

/// Everything a [`RecordingFactory`] observed.
#[derive(Debug, Default)]
pub struct Recorded {
    pub options: Vec<ServerOptionSet>,
    pub started: usize,
    pub ran: usize,
}

/// Factory that records the directives it is given and builds stub servers.
#[derive(Clone, Default)]
pub struct RecordingFactory {
    pub behavior: Behavior,
    pub recorded: Arc<Mutex<Recorded>>,
}

impl RecordingFactory {
    pub fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            ..Self::default()
        }
    }

    /// Directives passed to the last build, folded into a config.
    pub fn last_config(&self) -> Option<ServerConfig> {
        let recorded = self.recorded.lock().unwrap();
        recorded.options.last().cloned().map(ServerOptionSet::into_config)
    }

    pub fn build_count(&self) -> usize {
        self.recorded.lock().unwrap().options.len()
    }
}

pub struct StubServer {
    behavior: Behavior,
    recorded: Arc<Mutex<Recorded>>,
}

#[async_trait]
impl WorkflowServer for StubServer {
    async fn start(&mut self) -> Result<(), ServerError> {
        self.recorded.lock().unwrap().started += 1;
        match self.behavior {
            Behavior::FailStart => Err(ServerError::Frontend(std::io::Error::new(
                std::io::ErrorKind::AddrInUse,
                "address in use",
            ))),
            _ => Ok(()),
        }
    }

    async fn run(&mut self) -> Result<(), ServerError> {
        self.recorded.lock().unwrap().ran += 1;
        match self.behavior {
            Behavior::FailRun => Err(ServerError::Frontend(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "listener closed",
            ))),
            _ => Ok(()),
        }
    }
}

impl ServerFactory for RecordingFactory {
    type Server = StubServer;

    fn build(&self, options: ServerOptionSet) -> Result<StubServer, ServerError> {
        self.recorded.lock().unwrap().options.push(options);
        match self.behavior {
            Behavior::FailBuild => Err(ServerError::InvalidPort(0)),
            _ => Ok(StubServer {
                behavior: self.behavior,
                recorded: self.recorded.clone(),
            }),
        }
    }
}

/// Defaults with a fixed database path, so tests do not depend on the host.
pub fn test_defaults() -> LiteConfig {
    LiteConfig {
        database_file_path: "/tmp/workflow-lite-test/default.db".into(),
        ..LiteConfig::default()
    }
}

/// Driver over `factory` with a private interrupt hook instead of OS signals.
pub fn bootstrap<F: ServerFactory>(factory: F, interrupt: Shutdown) -> Bootstrap<F> {
    Bootstrap::new(factory)
        .with_defaults(test_defaults())
        .with_interrupt(move || interrupt.clone())
}

/// Prefix `args` with the binary name.
pub fn argv(args: &[&str]) -> Vec<String> {
    std::iter::once("workflow-lite")
        .chain(args.iter().copied())
        .map(String::from)
        .collect()
}

/// A port the OS just handed out and released.
pub fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}
