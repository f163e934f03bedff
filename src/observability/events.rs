//! Observable events
//!
//! Every log line emitted by the revision store, the revision log and the
//! CLI names one of these events.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration file loaded and validated
    ConfigLoaded,

    // History load
    /// No history file yet; its directory was created
    HistoryDirCreated,
    /// Replay of the history file begins
    HistoryLoadBegin,
    /// Replay finished
    HistoryLoadComplete,
    /// Replay stopped early; the readable prefix was kept
    HistoryLoadFailed,
    /// A chunk of unknown type was stepped over
    UnknownChunkSkipped,

    // Persistence
    /// The first revision of a document was written synchronously
    FirstRevisionPersisted,
    /// A revision was handed to the background worker
    RevisionQueued,
    /// The background worker wrote a revision
    RevisionPersisted,
    /// Writing a revision failed; it exists in memory only
    RevisionPersistFailed,
    /// A revision appended after disposal was not persisted
    RevisionPersistSkipped,

    // Lifecycle
    /// The persistence worker drained its queue and exited
    PersistenceWorkerStopped,
    /// The store stopped accepting background work
    StoreDisposed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::HistoryDirCreated => "HISTORY_DIR_CREATED",
            Event::HistoryLoadBegin => "HISTORY_LOAD_BEGIN",
            Event::HistoryLoadComplete => "HISTORY_LOAD_COMPLETE",
            Event::HistoryLoadFailed => "HISTORY_LOAD_FAILED",
            Event::UnknownChunkSkipped => "UNKNOWN_CHUNK_SKIPPED",

            Event::FirstRevisionPersisted => "FIRST_REVISION_PERSISTED",
            Event::RevisionQueued => "REVISION_QUEUED",
            Event::RevisionPersisted => "REVISION_PERSISTED",
            Event::RevisionPersistFailed => "REVISION_PERSIST_FAILED",
            Event::RevisionPersistSkipped => "REVISION_PERSIST_SKIPPED",

            Event::PersistenceWorkerStopped => "PERSISTENCE_WORKER_STOPPED",
            Event::StoreDisposed => "STORE_DISPOSED",
        }
    }

    /// Default severity for this event
    pub fn severity(&self) -> Severity {
        match self {
            Event::RevisionQueued | Event::RevisionPersisted => Severity::Trace,
            Event::UnknownChunkSkipped | Event::RevisionPersistSkipped => Severity::Warn,
            Event::HistoryLoadFailed | Event::RevisionPersistFailed => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Event; 13] = [
        Event::ConfigLoaded,
        Event::HistoryDirCreated,
        Event::HistoryLoadBegin,
        Event::HistoryLoadComplete,
        Event::HistoryLoadFailed,
        Event::UnknownChunkSkipped,
        Event::FirstRevisionPersisted,
        Event::RevisionQueued,
        Event::RevisionPersisted,
        Event::RevisionPersistFailed,
        Event::RevisionPersistSkipped,
        Event::PersistenceWorkerStopped,
        Event::StoreDisposed,
    ];

    #[test]
    fn test_all_events_are_upper_snake_case() {
        for event in ALL {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_failures_are_errors() {
        assert_eq!(Event::HistoryLoadFailed.severity(), Severity::Error);
        assert_eq!(Event::RevisionPersistFailed.severity(), Severity::Error);
        assert_eq!(Event::HistoryLoadBegin.severity(), Severity::Info);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::FirstRevisionPersisted), "FIRST_REVISION_PERSISTED");
    }
}
