//! Flag validation for the `start` command.
//!
//! # Responsibilities
//! - Reject positional arguments
//! - Enforce that `--ephemeral` and `--filename` are not both passed
//! - Enforce that the search attribute key and type lists come as a pair
//!   of equal length
//! - Resolve `--log-format` to a known [`LogFormat`]
//!
//! # Design Decisions
//! - Validation is a pure function: `&RawInput → Result<Validated, ValidationError>`
//! - Checks run in a fixed order and the first failure is returned
//! - Search attribute types are not resolved here; parsing is a later stage

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::config::raw::RawInput;
use crate::config::search_attributes::{SearchAttributeRequest, SearchAttributes};

/// Output format of the server logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// JSON lines (the server default).
    #[default]
    Json,
    /// Colorized, human-oriented output.
    Pretty,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(ValidationError::BadLogFormat(other.to_string())),
        }
    }
}

/// Where server state lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persistence {
    /// In-memory only. The path is the default file location, still handed to
    /// the server and overridden by the persistence-disabled directive.
    Ephemeral { default_path: PathBuf },
    /// Persisted to `path`.
    FileBacked { path: PathBuf },
}

impl Persistence {
    pub fn is_ephemeral(&self) -> bool {
        matches!(self, Persistence::Ephemeral { .. })
    }

    pub fn database_file_path(&self) -> &PathBuf {
        match self {
            Persistence::Ephemeral { default_path } => default_path,
            Persistence::FileBacked { path } => path,
        }
    }
}

/// Launch configuration that passed every flag check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfig {
    pub persistence: Persistence,
    pub port: u16,
    pub ip: String,
    pub log_format: LogFormat,
    /// Namespaces to pre-create, in the order given.
    pub namespaces: Vec<String>,
    pub search_attributes: Option<SearchAttributes>,
}

impl ValidatedConfig {
    pub fn with_search_attributes(mut self, attributes: SearchAttributes) -> Self {
        self.search_attributes = Some(attributes);
        self
    }
}

/// Result of a successful validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated {
    pub config: ValidatedConfig,
    /// Present when both search attribute lists were passed.
    pub search_attributes: Option<SearchAttributeRequest>,
}

/// A flag combination the `start` command refuses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("ERROR: start command doesn't support arguments.")]
    UnexpectedArguments(Vec<String>),

    #[error("ERROR: only one of \"ephemeral\" or \"filename\" flags may be passed at a time")]
    EphemeralWithFilename,

    #[error(
        "ERROR: both \"search-attributes-type\" and \"search-attributes-key\" must be set at the same time, or omitted completely"
    )]
    UnpairedSearchAttributes,

    #[error(
        "ERROR: number of search attributes (type/key) in \"search-attributes-type\" and \"search-attributes-key\" must be the same"
    )]
    SearchAttributeCountMismatch { keys: usize, types: usize },

    #[error("bad value \"{0}\" passed for flag \"log-format\"")]
    BadLogFormat(String),
}

/// Check `raw` and resolve it into a [`ValidatedConfig`].
pub fn validate(raw: &RawInput) -> Result<Validated, ValidationError> {
    if !raw.args.is_empty() {
        return Err(ValidationError::UnexpectedArguments(raw.args.clone()));
    }

    if raw.ephemeral.explicit && raw.filename.explicit {
        return Err(ValidationError::EphemeralWithFilename);
    }

    let search_attributes = validate_search_attributes(raw)?;
    let log_format = raw.log_format.value.parse::<LogFormat>()?;

    let persistence = if raw.ephemeral.value {
        Persistence::Ephemeral {
            default_path: raw.filename.value.clone(),
        }
    } else {
        Persistence::FileBacked {
            path: raw.filename.value.clone(),
        }
    };

    Ok(Validated {
        config: ValidatedConfig {
            persistence,
            port: raw.port.value,
            ip: raw.ip.value.clone(),
            log_format,
            namespaces: raw.namespaces.value.clone(),
            search_attributes: None,
        },
        search_attributes,
    })
}

fn validate_search_attributes(
    raw: &RawInput,
) -> Result<Option<SearchAttributeRequest>, ValidationError> {
    let keys = &raw.search_attribute_keys;
    let types = &raw.search_attribute_types;

    match (keys.explicit, types.explicit) {
        (false, false) => Ok(None),
        (true, true) if keys.value.len() != types.value.len() => {
            Err(ValidationError::SearchAttributeCountMismatch {
                keys: keys.value.len(),
                types: types.value.len(),
            })
        }
        (true, true) => Ok(Some(SearchAttributeRequest {
            keys: keys.value.clone(),
            types: types.value.clone(),
        })),
        _ => Err(ValidationError::UnpairedSearchAttributes),
    }
}
