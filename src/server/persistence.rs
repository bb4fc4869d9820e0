//! Catalog storage.
//!
//! # Responsibilities
//! - Hold the namespace and search attribute catalog
//! - Persist it as JSON for file-backed servers
//!
//! # Design Decisions
//! - In-memory mode never touches the filesystem
//! - Opening a file store creates missing parent directories
//! - A file that does not exist yet (or is empty) is an empty catalog; one
//!   that does not parse is an error, never silently replaced
//! - Flushes write a sibling temp file then rename over the catalog

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::search_attributes::{IndexedValueType, SearchAttributes};
use crate::options::StorageMode;

/// Errors raised by the catalog store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unable to access database file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("database file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unable to encode catalog for {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("search attribute {name} is already registered as {existing}, cannot register it as {requested}")]
    SearchAttributeConflict {
        name: String,
        existing: IndexedValueType,
        requested: IndexedValueType,
    },
}

/// Registered namespaces and search attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    /// Namespaces in creation order.
    pub namespaces: Vec<String>,
    pub search_attributes: SearchAttributes,
}

impl Catalog {
    /// Returns `false` when the namespace already existed.
    pub fn create_namespace(&mut self, name: &str) -> bool {
        if self.namespaces.iter().any(|existing| existing == name) {
            return false;
        }
        self.namespaces.push(name.to_string());
        true
    }

    /// Returns `false` when the attribute already existed with the same type.
    pub fn register_search_attribute(
        &mut self,
        name: &str,
        ty: IndexedValueType,
    ) -> Result<bool, StoreError> {
        match self.search_attributes.get(name) {
            Some(existing) if *existing == ty => Ok(false),
            Some(existing) => Err(StoreError::SearchAttributeConflict {
                name: name.to_string(),
                existing: *existing,
                requested: ty,
            }),
            None => {
                self.search_attributes.insert(name.to_string(), ty);
                Ok(true)
            }
        }
    }
}

/// Catalog plus where (if anywhere) it is persisted.
#[derive(Debug)]
pub struct Store {
    path: Option<PathBuf>,
    catalog: Catalog,
}

impl Store {
    /// Open the store selected by `mode`.
    pub fn open(mode: &StorageMode) -> Result<Self, StoreError> {
        match mode {
            StorageMode::Memory => Ok(Self {
                path: None,
                catalog: Catalog::default(),
            }),
            StorageMode::File(path) => Self::open_file(path),
        }
    }

    fn open_file(path: &Path) -> Result<Self, StoreError> {
        let io_err = |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let catalog = match fs::read_to_string(path) {
            Ok(content) if content.trim().is_empty() => Catalog::default(),
            Ok(content) => serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: path.to_path_buf(),
                source,
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Catalog::default(),
            Err(err) => return Err(io_err(err)),
        };

        Ok(Self {
            path: Some(path.to_path_buf()),
            catalog,
        })
    }

    pub fn is_ephemeral(&self) -> bool {
        self.path.is_none()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    /// Write the catalog to disk. No-op for in-memory stores.
    pub fn flush(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_err = |source| StoreError::Io {
            path: path.clone(),
            source,
        };

        let content = serde_json::to_vec_pretty(&self.catalog).map_err(|source| StoreError::Encode {
            path: path.clone(),
            source,
        })?;
        let tmp = temp_path(path);
        fs::write(&tmp, content).map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)?;
        Ok(())
    }
}

/// `<file name>.tmp` next to `path`, so distinct catalogs never share one.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
