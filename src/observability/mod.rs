//! Observability for the revision store
//!
//! - Structured logging (JSON lines)
//! - Typed lifecycle events
//! - Begin/complete scopes around long operations
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. Logging never changes store behavior
//! 3. Deterministic output: fields are sorted by key
//!
//! # Usage
//!
//! ```ignore
//! use revstore::observability::{log_event, Event, ObservationScope};
//!
//! log_event(Event::RevisionQueued, &[("document_id", id), ("revision", "7")]);
//!
//! let scope = ObservationScope::new("HISTORY_LOAD");
//! // ... replay ...
//! scope.complete();
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::{ObservationScope, Timer};

/// Log `event` at its default severity.
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_does_not_panic() {
        log_event(Event::StoreDisposed, &[("document_id", "d1")]);
        log_event(Event::RevisionPersistFailed, &[("reason", "disk full")]);
    }
}
