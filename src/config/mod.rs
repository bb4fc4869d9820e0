//! Launch configuration subsystem.
//!
//! # Data Flow
//! ```text
//! command line
//!     → cli.rs (clap) → RawInput
//!     → validation.rs (flag checks) → ValidatedConfig + pending search attributes
//!     → search_attributes.rs (type resolution) → SearchAttributes
//!     → options.rs (composition) → ServerOptionSet
//! ```
//!
//! # Design Decisions
//! - Defaults come from a factory, never a shared global
//! - Every stage is pure and runs once per invocation
//! - Validation fails fast, before any resource is touched

pub mod defaults;
pub mod raw;
pub mod search_attributes;
pub mod validation;

pub use defaults::LiteConfig;
pub use raw::{FlagValue, RawInput};
pub use search_attributes::{IndexedValueType, SearchAttributeError, SearchAttributes};
pub use validation::{LogFormat, Persistence, ValidatedConfig, ValidationError};
