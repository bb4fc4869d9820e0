//! Launch layer for an embeddable workflow orchestration server.
//!
//! Turns `workflow-lite start ...` into a validated configuration, composes
//! it into server directives, then builds, starts and runs the server until
//! it is interrupted.

pub mod cli;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod options;
pub mod server;

pub use config::{LiteConfig, RawInput, ValidatedConfig};
pub use lifecycle::{Bootstrap, CliFailure, Completed, Shutdown};
pub use options::{ServerConfig, ServerOption, ServerOptionSet};
pub use server::{LiteServer, LiteServerFactory, ServerError, ServerFactory, WorkflowServer};
