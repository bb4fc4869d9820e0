//! Server loggers.
//!
//! # Responsibilities
//! - Build the default JSON logger
//! - Build the pretty logger used by `--log-format pretty`
//! - Read the filter directives from `WORKFLOW_LITE_LOG`
//!
//! # Design Decisions
//! - Loggers are `tracing::Dispatch` values handed to the server, not a
//!   process-global subscriber
//! - Pretty output is colorized, omits caller location, and prints a
//!   backtrace for every ERROR event
//! - An invalid filter directive fails logger construction

use std::backtrace::Backtrace;

use thiserror::Error;
use tracing::{Dispatch, Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding log filter directives.
pub const LOG_ENV: &str = "WORKFLOW_LITE_LOG";

/// Errors raised while building a logger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoggingError {
    #[error("invalid log filter \"{directives}\" in WORKFLOW_LITE_LOG: {reason}")]
    InvalidFilter { directives: String, reason: String },
}

/// Build an [`EnvFilter`] from `directives`, defaulting to `info`.
pub fn build_filter(directives: Option<&str>) -> Result<EnvFilter, LoggingError> {
    let builder = EnvFilter::builder().with_default_directive(LevelFilter::INFO.into());
    match directives {
        Some(directives) => builder
            .parse(directives)
            .map_err(|err| LoggingError::InvalidFilter {
                directives: directives.to_string(),
                reason: err.to_string(),
            }),
        None => Ok(builder.parse_lossy("")),
    }
}

fn filter_from_env() -> Result<EnvFilter, LoggingError> {
    let directives = std::env::var(LOG_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty());
    build_filter(directives.as_deref())
}

/// JSON lines on stdout.
pub fn json_logger() -> Result<Dispatch, LoggingError> {
    let filter = filter_from_env()?;
    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(false),
    );
    Ok(Dispatch::new(subscriber))
}

/// Colorized output on stderr for interactive use.
pub fn pretty_logger() -> Result<Dispatch, LoggingError> {
    let filter = filter_from_env()?;
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .with_target(false)
                .with_file(false)
                .with_line_number(false),
        )
        .with(ErrorBacktrace);
    Ok(Dispatch::new(subscriber))
}

/// Prints a captured backtrace after every ERROR event.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorBacktrace;

impl<S: Subscriber> Layer<S> for ErrorBacktrace {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::ERROR {
            eprintln!("{}", Backtrace::force_capture());
        }
    }
}
