//! Revision store errors
//!
//! Appending never fails for I/O reasons: persistence failures are logged and
//! the in-memory history stays authoritative. The only errors are caller
//! mistakes.

use thiserror::Error;

use crate::revision::RevisionNumber;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The appended revision does not come after the current one
    #[error("Revision number ({attempted}) must be greater than the current revision number ({current})")]
    OrderingViolation {
        attempted: u64,
        current: u64,
    },

    /// The `HEAD` sentinel was used as a concrete revision number
    #[error("HEAD is a lookup sentinel and cannot be appended")]
    HeadNotAppendable,
}

impl StoreError {
    pub fn ordering_violation(attempted: RevisionNumber, current: RevisionNumber) -> Self {
        StoreError::OrderingViolation {
            attempted: attempted.value(),
            current: current.value(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            StoreError::OrderingViolation { .. } => "REVSTORE_ORDERING_VIOLATION",
            StoreError::HeadNotAppendable => "REVSTORE_HEAD_NOT_APPENDABLE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_violation_message() {
        let err = StoreError::ordering_violation(RevisionNumber::new(3), RevisionNumber::new(5));
        assert_eq!(
            err.to_string(),
            "Revision number (3) must be greater than the current revision number (5)"
        );
        assert_eq!(err.code(), "REVSTORE_ORDERING_VIOLATION");
    }
}
