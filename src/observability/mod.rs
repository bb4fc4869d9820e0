//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! --log-format
//!     → options.rs (json: server default, pretty: logger directive)
//!     → logging.rs builds a Dispatch
//!     → server runs its tasks under that Dispatch
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) by default for machine parsing
//! - Filter directives come from the environment, defaulting to `info`

pub mod logging;

pub use logging::{json_logger, pretty_logger, LoggingError};
