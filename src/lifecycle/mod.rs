//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Parse args → Validate → Parse search attributes → Compose options
//!     → Construct server → Start → Run
//!
//! Shutdown (shutdown.rs):
//!     Interrupt hook triggered → Frontend drains → Catalog flushed → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger the interrupt hook
//! ```
//!
//! # Design Decisions
//! - Ordered startup: nothing is acquired until every check has passed
//! - One interrupt hook per process, handed to the server at construction
//! - Exit statuses are decided here and applied only by `main`

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{Bootstrap, BootstrapState, CliFailure, Completed};
