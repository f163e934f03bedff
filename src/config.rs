//! Store configuration
//!
//! A JSON file naming the data directory and the document whose history is
//! managed:
//!
//! ```json
//! {
//!   "data_dir": "/var/lib/revstore",
//!   "document_id": "6f1c1b9e-93c4-4c8e-9d0a-2f43b1f3c6de",
//!   "history_file_name": "change-data.binary"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::observability::{log_event, Event};

/// Default name of the history file inside a document's change-data directory
pub const DEFAULT_HISTORY_FILE_NAME: &str = "change-data.binary";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration of one document's revision store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Root data directory (required)
    pub data_dir: PathBuf,

    /// Document whose history this store manages (required)
    pub document_id: Uuid,

    /// File name of the history log (optional)
    #[serde(default = "default_history_file_name")]
    pub history_file_name: String,
}

fn default_history_file_name() -> String {
    DEFAULT_HISTORY_FILE_NAME.to_string()
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>, document_id: Uuid) -> Self {
        Self {
            data_dir: data_dir.into(),
            document_id,
            history_file_name: default_history_file_name(),
        }
    }

    /// Load and validate configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: StoreConfig = serde_json::from_str(&content)?;
        config.validate()?;

        log_event(
            Event::ConfigLoaded,
            &[
                ("document_id", &config.document_id.to_string()),
                ("path", &path.display().to_string()),
            ],
        );

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data_dir must not be empty".into()));
        }

        let name = self.history_file_name.as_str();
        if name.is_empty() || name == "." || name == ".." {
            return Err(ConfigError::Invalid(format!(
                "history_file_name must be a plain file name, got '{}'",
                name
            )));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(ConfigError::Invalid(format!(
                "history_file_name must not contain path separators: '{}'",
                name
            )));
        }

        Ok(())
    }

    /// Directory holding this document's change data
    pub fn change_data_dir(&self) -> PathBuf {
        self.data_dir
            .join("documents")
            .join(self.document_id.to_string())
            .join("change-data")
    }

    /// Full path of the history file
    pub fn history_path(&self) -> PathBuf {
        self.change_data_dir().join(&self.history_file_name)
    }
}
