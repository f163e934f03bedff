//! CLI-specific error types
//!
//! Every CLI error ends the command. Each carries a stable code for the JSON
//! error envelope.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::log::LogError;
use crate::revision::RevisionNumber;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file missing or invalid
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// History file could not be replayed
    #[error("{0}")]
    Log(#[from] LogError),

    /// Requested revision is not in the history
    #[error("Revision {0} not found")]
    RevisionNotFound(RevisionNumber),

    /// stdout could not be written
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Output could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "REVSTORE_CLI_CONFIG_ERROR",
            CliError::Log(e) => e.code().code(),
            CliError::RevisionNotFound(_) => "REVSTORE_CLI_REVISION_NOT_FOUND",
            CliError::Io(_) => "REVSTORE_CLI_IO_ERROR",
            CliError::Json(_) => "REVSTORE_CLI_JSON_ERROR",
        }
    }
}
