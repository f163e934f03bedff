//! Revisions
//!
//! A revision is one authored, timestamped batch of changes with the next
//! sequence number. Revisions are immutable after construction and owned by
//! the revision store once appended; corrections are new revisions.

mod number;

pub use number::RevisionNumber;

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::statement::Change;

/// Identity of the user who authored a revision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(Arc<str>);

impl UserId {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Wrap an already shared (possibly interned) name
    pub fn from_shared(name: Arc<str>) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_shared(&self) -> &Arc<str> {
        &self.0
    }

    /// Placeholder author for revisions whose author was not recorded
    pub fn guest() -> Self {
        Self::new("guest")
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One revision of the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Revision {
    author: UserId,
    number: RevisionNumber,
    changes: Vec<Change>,
    timestamp: DateTime<Utc>,
    description: Arc<str>,
}

impl Revision {
    /// Create a revision.
    ///
    /// The timestamp is truncated to millisecond precision, which is what the
    /// revision log stores.
    pub fn new(
        author: UserId,
        number: RevisionNumber,
        changes: Vec<Change>,
        timestamp: DateTime<Utc>,
        description: impl Into<Arc<str>>,
    ) -> Self {
        let timestamp =
            DateTime::<Utc>::from_timestamp_millis(timestamp.timestamp_millis()).unwrap_or(timestamp);
        Self {
            author,
            number,
            changes,
            timestamp,
            description: description.into(),
        }
    }

    pub fn author(&self) -> &UserId {
        &self.author
    }

    pub fn number(&self) -> RevisionNumber {
        self.number
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Milliseconds since the Unix epoch
    pub fn timestamp_millis(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn change_count(&self) -> usize {
        self.changes.len()
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {} at {} ({} changes): {}",
            self.number,
            self.author,
            self.timestamp.to_rfc3339(),
            self.changes.len(),
            self.description
        )
    }
}
