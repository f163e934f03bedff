//! revstore - versioned revision history for ontology documents
//!
//! An append-only, concurrently readable log of authored revisions, each a
//! batch of statement-level changes, plus matchers that turn a batch into
//! human-readable summaries.

pub mod cli;
pub mod config;
pub mod intern;
pub mod log;
pub mod matcher;
pub mod observability;
pub mod revision;
pub mod statement;
pub mod store;
