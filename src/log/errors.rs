//! Revision log error types
//!
//! Error codes:
//! - REVLOG_OPEN_FAILED
//! - REVLOG_APPEND_FAILED
//! - REVLOG_FSYNC_FAILED
//! - REVLOG_CORRUPTION
//! - REVLOG_UNSUPPORTED_VERSION

use std::fmt;
use std::io;

/// Revision log error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogErrorCode {
    /// History file could not be opened or inspected
    OpenFailed,
    /// Chunk write failed
    AppendFailed,
    /// fsync after a chunk write failed
    FsyncFailed,
    /// Structural corruption of the current chunk or the header
    Corruption,
    /// File header names a format version this reader does not know
    UnsupportedVersion,
}

impl LogErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            LogErrorCode::OpenFailed => "REVLOG_OPEN_FAILED",
            LogErrorCode::AppendFailed => "REVLOG_APPEND_FAILED",
            LogErrorCode::FsyncFailed => "REVLOG_FSYNC_FAILED",
            LogErrorCode::Corruption => "REVLOG_CORRUPTION",
            LogErrorCode::UnsupportedVersion => "REVLOG_UNSUPPORTED_VERSION",
        }
    }

    /// True for errors raised while writing
    pub fn is_write_failure(&self) -> bool {
        matches!(self, LogErrorCode::AppendFailed | LogErrorCode::FsyncFailed)
    }
}

impl fmt::Display for LogErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Revision log error with context
#[derive(Debug)]
pub struct LogError {
    code: LogErrorCode,
    message: String,
    details: Option<String>,
    source: Option<io::Error>,
}

impl LogError {
    pub fn open_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: LogErrorCode::OpenFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    pub fn append_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: LogErrorCode::AppendFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    pub fn fsync_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: LogErrorCode::FsyncFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    pub fn corruption(message: impl Into<String>) -> Self {
        Self {
            code: LogErrorCode::Corruption,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Corruption of the chunk starting at `offset`
    pub fn corruption_at_offset(offset: u64, reason: impl Into<String>) -> Self {
        Self {
            code: LogErrorCode::Corruption,
            message: reason.into(),
            details: Some(format!("byte_offset: {}", offset)),
            source: None,
        }
    }

    /// Corruption detected on a decoded revision
    pub fn corruption_at_revision(revision: u64, reason: impl Into<String>) -> Self {
        Self {
            code: LogErrorCode::Corruption,
            message: reason.into(),
            details: Some(format!("revision: {}", revision)),
            source: None,
        }
    }

    pub fn unsupported_version(version: u16) -> Self {
        Self {
            code: LogErrorCode::UnsupportedVersion,
            message: format!("Unsupported revision log format version {}", version),
            details: None,
            source: None,
        }
    }

    pub fn code(&self) -> LogErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// True when the file content itself is unreadable
    pub fn is_corruption(&self) -> bool {
        matches!(
            self.code,
            LogErrorCode::Corruption | LogErrorCode::UnsupportedVersion
        )
    }
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        if let Some(ref source) = self.source {
            write!(f, ": {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for LogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for revision log operations
pub type LogResult<T> = Result<T, LogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LogErrorCode::OpenFailed.code(), "REVLOG_OPEN_FAILED");
        assert_eq!(LogErrorCode::AppendFailed.code(), "REVLOG_APPEND_FAILED");
        assert_eq!(LogErrorCode::FsyncFailed.code(), "REVLOG_FSYNC_FAILED");
        assert_eq!(LogErrorCode::Corruption.code(), "REVLOG_CORRUPTION");
        assert_eq!(LogErrorCode::UnsupportedVersion.code(), "REVLOG_UNSUPPORTED_VERSION");
    }

    #[test]
    fn test_write_failures() {
        let err = LogError::append_failed("write failed", io::Error::new(io::ErrorKind::Other, "disk full"));
        assert!(err.code().is_write_failure());
        assert!(!err.is_corruption());
    }

    #[test]
    fn test_version_error_is_corruption() {
        assert!(LogError::unsupported_version(9).is_corruption());
    }

    #[test]
    fn test_display_contains_context() {
        let err = LogError::corruption_at_offset(128, "checksum mismatch");
        let display = err.to_string();
        assert!(display.contains("REVLOG_CORRUPTION"));
        assert!(display.contains("checksum mismatch"));
        assert!(display.contains("byte_offset: 128"));
    }

    #[test]
    fn test_source_is_exposed() {
        use std::error::Error;
        let err = LogError::fsync_failed("fsync", io::Error::new(io::ErrorKind::Other, "eio"));
        assert!(err.source().is_some());
    }
}
