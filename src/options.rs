//! Server construction options.
//!
//! # Responsibilities
//! - Define the directives a server is constructed from
//! - Compose a validated launch configuration into an ordered directive set
//! - Fold directives, in order, into a [`ServerConfig`]
//!
//! # Design Decisions
//! - Composition performs no I/O; the only fallible step is building the
//!   pretty logger
//! - Later directives override earlier ones: persistence-disabled comes after
//!   the database path so it replaces the file-backed default
//! - Anything without a directive keeps the server's built-in default

use std::path::PathBuf;

use tracing::Dispatch;

use crate::config::defaults::LiteConfig;
use crate::config::search_attributes::SearchAttributes;
use crate::config::validation::{LogFormat, ValidatedConfig};
use crate::lifecycle::shutdown::Shutdown;
use crate::observability::logging::{self, LoggingError};

/// Where the server keeps its state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageMode {
    /// State is lost when the process stops.
    Memory,
    /// State is persisted to this file.
    File(PathBuf),
}

/// Settings a server is built from.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub frontend_port: u16,
    pub frontend_ip: String,
    pub storage: StorageMode,
    pub namespaces: Vec<String>,
    pub search_attributes: SearchAttributes,
    /// Logger override; `None` means the server's JSON logger.
    pub logger: Option<Dispatch>,
    /// Interrupt hook; `None` means the server only stops on frontend failure
    /// or when its own handle is triggered.
    pub interrupt: Option<Shutdown>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let defaults = LiteConfig::default();
        Self {
            frontend_port: defaults.frontend_port,
            frontend_ip: defaults.frontend_ip,
            storage: StorageMode::File(defaults.database_file_path),
            namespaces: Vec::new(),
            search_attributes: SearchAttributes::new(),
            logger: None,
            interrupt: None,
        }
    }
}

/// One unit of server construction configuration.
#[derive(Debug, Clone)]
pub enum ServerOption {
    FrontendPort(u16),
    FrontendIp(String),
    DatabaseFilePath(PathBuf),
    Namespaces(Vec<String>),
    PersistenceDisabled,
    SearchAttributes(SearchAttributes),
    Logger(Dispatch),
    InterruptOn(Shutdown),
}

impl ServerOption {
    /// Apply this directive on top of `config`.
    pub fn apply(self, config: &mut ServerConfig) {
        match self {
            ServerOption::FrontendPort(port) => config.frontend_port = port,
            ServerOption::FrontendIp(ip) => config.frontend_ip = ip,
            ServerOption::DatabaseFilePath(path) => config.storage = StorageMode::File(path),
            ServerOption::Namespaces(namespaces) => config.namespaces.extend(namespaces),
            ServerOption::PersistenceDisabled => config.storage = StorageMode::Memory,
            ServerOption::SearchAttributes(attributes) => config.search_attributes.extend(attributes),
            ServerOption::Logger(logger) => config.logger = Some(logger),
            ServerOption::InterruptOn(shutdown) => config.interrupt = Some(shutdown),
        }
    }
}

/// Ordered list of directives.
#[derive(Debug, Clone, Default)]
pub struct ServerOptionSet {
    options: Vec<ServerOption>,
}

impl ServerOptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, option: ServerOption) {
        self.options.push(option);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ServerOption> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Apply every directive, in order, to the server defaults.
    pub fn into_config(self) -> ServerConfig {
        let mut config = ServerConfig::default();
        for option in self.options {
            option.apply(&mut config);
        }
        config
    }
}

impl FromIterator<ServerOption> for ServerOptionSet {
    fn from_iter<I: IntoIterator<Item = ServerOption>>(iter: I) -> Self {
        Self {
            options: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ServerOptionSet {
    type Item = ServerOption;
    type IntoIter = std::vec::IntoIter<ServerOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.into_iter()
    }
}

/// Turn a validated configuration into server directives.
///
/// `interrupt` is the hook bound to process termination.
pub fn compose(
    config: &ValidatedConfig,
    interrupt: Shutdown,
) -> Result<ServerOptionSet, LoggingError> {
    let mut options = ServerOptionSet::new();
    options.push(ServerOption::FrontendPort(config.port));
    options.push(ServerOption::FrontendIp(config.ip.clone()));
    options.push(ServerOption::DatabaseFilePath(
        config.persistence.database_file_path().clone(),
    ));
    options.push(ServerOption::Namespaces(config.namespaces.clone()));
    options.push(ServerOption::InterruptOn(interrupt));

    if config.persistence.is_ephemeral() {
        options.push(ServerOption::PersistenceDisabled);
    }

    if let Some(attributes) = &config.search_attributes {
        options.push(ServerOption::SearchAttributes(attributes.clone()));
    }

    if config.log_format == LogFormat::Pretty {
        options.push(ServerOption::Logger(logging::pretty_logger()?));
    }

    Ok(options)
}
