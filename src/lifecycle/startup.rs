//! Startup orchestration.
//!
//! # States
//! ```text
//! Validating → Parsing → Composing → Constructing → Starting → Running → Stopped
//!          ↘ (no search attributes) ↗
//! any stage → Failed
//! ```
//!
//! # Design Decisions
//! - Fail fast: every failure is terminal, nothing is retried here
//! - Validation and parsing finish before any resource is touched
//! - Every outcome carries the message and exit status for the process;
//!   only `main` turns it into an actual exit

use std::ffi::OsString;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::cli::{self, Invocation};
use crate::config::defaults::LiteConfig;
use crate::config::raw::RawInput;
use crate::config::validation::validate;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals;
use crate::options::compose;
use crate::server::{ServerFactory, WorkflowServer};

/// Message reported after a clean shutdown.
pub const STOPPED_MESSAGE: &str = "All services are stopped.";

/// Stage of the launch sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    Validating,
    Parsing,
    Composing,
    Constructing,
    Starting,
    Running,
    Stopped,
    Failed,
}

impl fmt::Display for BootstrapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BootstrapState::Validating => "validating",
            BootstrapState::Parsing => "parsing",
            BootstrapState::Composing => "composing",
            BootstrapState::Constructing => "constructing",
            BootstrapState::Starting => "starting",
            BootstrapState::Running => "running",
            BootstrapState::Stopped => "stopped",
            BootstrapState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A terminal failure with the process exit status it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CliFailure {
    pub message: String,
    pub exit_code: u8,
    /// Stage the launch sequence was in when it failed.
    pub stage: BootstrapState,
}

impl CliFailure {
    pub fn new(message: impl Into<String>, exit_code: u8, stage: BootstrapState) -> Self {
        Self {
            message: message.into(),
            exit_code,
            stage,
        }
    }

    fn at(stage: BootstrapState, err: impl fmt::Display) -> Self {
        Self::new(err.to_string(), 1, stage)
    }
}

/// Informational outcome: a clean shutdown, or help/version output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completed {
    pub message: String,
}

impl Completed {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type BootstrapResult = Result<Completed, CliFailure>;

type InterruptSource = Arc<dyn Fn() -> Shutdown + Send + Sync>;

/// Drives the `start` command from arguments to server termination.
pub struct Bootstrap<F> {
    factory: F,
    defaults: LiteConfig,
    interrupt: InterruptSource,
}

impl<F: ServerFactory> Bootstrap<F> {
    /// Driver using OS signals for the interrupt hook and the standard defaults.
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            defaults: LiteConfig::default(),
            interrupt: Arc::new(signals::interrupt_on_signals),
        }
    }

    pub fn with_defaults(mut self, defaults: LiteConfig) -> Self {
        self.defaults = defaults;
        self
    }

    /// Replace the source of the interrupt hook.
    pub fn with_interrupt<S>(mut self, source: S) -> Self
    where
        S: Fn() -> Shutdown + Send + Sync + 'static,
    {
        self.interrupt = Arc::new(source);
        self
    }

    pub fn defaults(&self) -> &LiteConfig {
        &self.defaults
    }

    /// Parse `args` (including the binary name) and launch.
    pub async fn run<I, T>(&self, args: I) -> BootstrapResult
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match cli::parse_args(args, &self.defaults) {
            Ok(Invocation::Start(raw)) => self.launch(raw).await,
            Err(err) if cli::is_display_request(&err) => {
                Ok(Completed::new(err.render().to_string().trim_end()))
            }
            Err(err) => Err(CliFailure::at(
                BootstrapState::Validating,
                err.render().to_string().trim_end(),
            )),
        }
    }

    /// Validate, compose, construct, start and run the server.
    pub async fn launch(&self, raw: RawInput) -> BootstrapResult {
        let mut state = BootstrapState::Validating;
        let validated = validate(&raw).map_err(|err| fail(state, err))?;

        let config = match validated.search_attributes {
            Some(request) => {
                state = advance(state, BootstrapState::Parsing);
                let attributes = request.parse().map_err(|err| fail(state, err))?;
                validated.config.with_search_attributes(attributes)
            }
            None => validated.config,
        };

        state = advance(state, BootstrapState::Composing);
        let options = compose(&config, (self.interrupt)()).map_err(|err| fail(state, err))?;

        state = advance(state, BootstrapState::Constructing);
        let mut server = self.factory.build(options).map_err(|err| fail(state, err))?;

        state = advance(state, BootstrapState::Starting);
        server.start().await.map_err(|err| {
            fail(state, format!("Unable to start server. Error: {err}"))
        })?;

        state = advance(state, BootstrapState::Running);
        server.run().await.map_err(|err| {
            fail(state, format!("Server terminated with error: {err}"))
        })?;

        advance(state, BootstrapState::Stopped);
        Ok(Completed::new(STOPPED_MESSAGE))
    }
}

fn advance(from: BootstrapState, to: BootstrapState) -> BootstrapState {
    tracing::debug!(from = %from, to = %to, "Bootstrap state change");
    to
}

fn fail(state: BootstrapState, err: impl fmt::Display) -> CliFailure {
    tracing::debug!(from = %state, to = %BootstrapState::Failed, error = %err, "Bootstrap failed");
    CliFailure::at(state, err)
}
