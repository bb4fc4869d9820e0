//! Unvalidated command-line input.

use std::path::PathBuf;

use crate::config::defaults::LiteConfig;

/// A flag value together with whether the user passed it explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagValue<T> {
    pub value: T,
    pub explicit: bool,
}

impl<T> FlagValue<T> {
    /// A value the user passed on the command line.
    pub fn explicit(value: T) -> Self {
        Self { value, explicit: true }
    }

    /// A value taken from the defaults.
    pub fn default_value(value: T) -> Self {
        Self { value, explicit: false }
    }

    /// Use `passed` when present, otherwise fall back to `default`.
    pub fn resolve(passed: Option<T>, default: T) -> Self {
        match passed {
            Some(value) => Self::explicit(value),
            None => Self::default_value(default),
        }
    }
}

/// Everything the `start` command received, before any checks.
///
/// May be internally contradictory; see [`crate::config::validation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInput {
    /// Positional arguments (the `start` command accepts none).
    pub args: Vec<String>,
    pub ephemeral: FlagValue<bool>,
    pub filename: FlagValue<PathBuf>,
    pub port: FlagValue<u16>,
    pub ip: FlagValue<String>,
    pub log_format: FlagValue<String>,
    pub namespaces: FlagValue<Vec<String>>,
    pub search_attribute_keys: FlagValue<Vec<String>>,
    pub search_attribute_types: FlagValue<Vec<String>>,
}

impl RawInput {
    /// Input where every flag holds its default and nothing was passed.
    pub fn from_defaults(defaults: &LiteConfig) -> Self {
        Self {
            args: Vec::new(),
            ephemeral: FlagValue::default_value(defaults.ephemeral),
            filename: FlagValue::default_value(defaults.database_file_path.clone()),
            port: FlagValue::default_value(defaults.frontend_port),
            ip: FlagValue::default_value(defaults.frontend_ip.clone()),
            log_format: FlagValue::default_value(defaults.log_format.clone()),
            namespaces: FlagValue::default_value(Vec::new()),
            search_attribute_keys: FlagValue::default_value(Vec::new()),
            search_attribute_types: FlagValue::default_value(Vec::new()),
        }
    }
}
