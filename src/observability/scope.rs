//! ObservationScope for begin/complete logging around long operations
//!
//! - `{name}_BEGIN` on creation
//! - `{name}_COMPLETE` on `complete`, with `elapsed_ms`
//! - `{name}_FAILED` on `fail`, with `elapsed_ms` and the reason
//! - `{name}_INCOMPLETE` if dropped without either

use std::cell::Cell;
use std::time::Instant;

use super::logger::Logger;

/// A scope that logs start and end of an operation
///
/// ```ignore
/// let scope = ObservationScope::with_fields("HISTORY_LOAD", &[("document_id", id)]);
/// // ... replay ...
/// scope.complete_with_fields(&[("revisions", "42")]);
/// ```
pub struct ObservationScope<'a> {
    name: &'a str,
    completed: Cell<bool>,
    fields: Vec<(&'a str, String)>,
    timer: Timer,
}

impl<'a> ObservationScope<'a> {
    pub fn new(name: &'a str) -> Self {
        Self::with_fields(name, &[])
    }

    /// Create a scope whose fields are repeated on every line it logs
    pub fn with_fields(name: &'a str, fields: &[(&'a str, &str)]) -> Self {
        let event = format!("{}_BEGIN", name);
        Logger::info(&event, fields);

        Self {
            name,
            completed: Cell::new(false),
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            timer: Timer::new(),
        }
    }

    fn fields_with(&self, extra: &[(&str, &str)]) -> Vec<(String, String)> {
        let mut all: Vec<(String, String)> = self
            .fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        all.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        all.push(("elapsed_ms".to_string(), self.timer.elapsed_ms()));
        all
    }

    /// Logs `{name}_COMPLETE` at INFO level
    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    /// Logs `{name}_COMPLETE` at INFO level with additional fields
    pub fn complete_with_fields(self, extra_fields: &[(&str, &str)]) {
        self.completed.set(true);
        let event = format!("{}_COMPLETE", self.name);
        let fields = self.fields_with(extra_fields);
        let refs: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        Logger::info(&event, &refs);
    }

    /// Logs `{name}_FAILED` at ERROR level
    pub fn fail(self, reason: &str) {
        self.fail_with_fields(reason, &[]);
    }

    /// Logs `{name}_FAILED` at ERROR level with additional fields
    pub fn fail_with_fields(self, reason: &str, extra_fields: &[(&str, &str)]) {
        self.completed.set(true);
        let event = format!("{}_FAILED", self.name);
        let mut fields = self.fields_with(extra_fields);
        fields.push(("reason".to_string(), reason.to_string()));
        let refs: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        Logger::error(&event, &refs);
    }

    pub fn is_completed(&self) -> bool {
        self.completed.get()
    }
}

impl Drop for ObservationScope<'_> {
    fn drop(&mut self) {
        if !self.completed.get() {
            let event = format!("{}_INCOMPLETE", self.name);
            Logger::warn(&event, &[("reason", "scope dropped without completion")]);
        }
    }
}

/// Elapsed-time timer for log fields
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed milliseconds as a string
    pub fn elapsed_ms(&self) -> String {
        self.start.elapsed().as_millis().to_string()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
