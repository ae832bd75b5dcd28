//! Configuration for the persistence layer

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the persistence layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Base directory for persistence files
    pub data_dir: PathBuf,

    /// Opaque namespace; every key lives under `data_dir/namespace`
    pub namespace: String,

    /// Write records with indentation (easier to inspect by hand)
    pub pretty: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self { data_dir: PathBuf::from("./data"), namespace: "default".to_string(), pretty: false }
    }
}

impl PersistenceConfig {
    /// Create a new configuration with custom data directory and namespace
    pub fn new(data_dir: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        Self { data_dir: data_dir.into(), namespace: namespace.into(), ..Default::default() }
    }

    /// Get the directory holding this namespace's records
    pub fn namespace_dir(&self) -> PathBuf {
        self.data_dir.join(&self.namespace)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.namespace.trim().is_empty() {
            return Err("namespace must not be empty".to_string());
        }

        if self.namespace.contains(['/', '\\']) || self.namespace == ".." {
            return Err(format!("namespace '{}' must be a single path component", self.namespace));
        }

        Ok(())
    }
}
