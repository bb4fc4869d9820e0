//! Default launch configuration.
//!
//! # Responsibilities
//! - Provide the values every flag falls back to when it is not passed
//! - Resolve the default database location under the user cache directory
//!
//! # Design Decisions
//! - Pure factory: `LiteConfig::default()` returns a fresh value on every call
//! - No process-wide mutable defaults

use std::path::PathBuf;

/// Default port for the frontend service.
pub const DEFAULT_FRONTEND_PORT: u16 = 7233;

/// Default address the frontend binds to.
pub const DEFAULT_FRONTEND_IP: &str = "127.0.0.1";

/// Default `--log-format` value.
pub const DEFAULT_LOG_FORMAT: &str = "json";

/// Database file used when no cache directory can be resolved.
const FALLBACK_DATABASE_FILE: &str = "workflow-lite.db";

/// Flag defaults for the `start` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteConfig {
    /// Run with in-memory persistence.
    pub ephemeral: bool,

    /// File in which server state is persisted.
    pub database_file_path: PathBuf,

    /// Port for the frontend service.
    pub frontend_port: u16,

    /// Address the frontend binds to.
    pub frontend_ip: String,

    /// Log format name.
    pub log_format: String,
}

impl Default for LiteConfig {
    fn default() -> Self {
        Self {
            ephemeral: false,
            database_file_path: default_database_path(),
            frontend_port: DEFAULT_FRONTEND_PORT,
            frontend_ip: DEFAULT_FRONTEND_IP.to_string(),
            log_format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

/// `<cache dir>/workflow-lite/db/default.db`, or a file in the working
/// directory when the platform has no cache directory.
pub fn default_database_path() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("workflow-lite").join("db").join("default.db"))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DATABASE_FILE))
}
