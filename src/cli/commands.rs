//! CLI command implementations
//!
//! Every command loads the configuration, replays the history into a fresh
//! store and prints one JSON response. Nothing is ever appended.

use std::path::Path;

use serde_json::{json, Value};

use crate::config::StoreConfig;
use crate::matcher::ChangeDescriber;
use crate::revision::{Revision, RevisionNumber};
use crate::store::{LoadReport, RevisionStore};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Dispatch a parsed command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Log { config } => log(&config),
        Command::Show { config, revision } => show(&config, revision),
        Command::Verify { config } => verify(&config),
    }
}

fn open_store(config_path: &Path) -> CliResult<(RevisionStore, LoadReport)> {
    let config = StoreConfig::load(config_path)?;
    let store = RevisionStore::open(&config);
    let report = store.load();
    Ok((store, report))
}

/// List all revisions, oldest first
pub fn log(config_path: &Path) -> CliResult<()> {
    let (store, report) = open_store(config_path)?;

    let revisions: Vec<Value> = store
        .get_revisions()
        .iter()
        .map(|revision| revision_json(revision))
        .collect();

    write_response(json!({
        "document_id": store.document_id(),
        "complete": report.is_complete(),
        "revisions": revisions,
    }))
}

/// Print one revision with its change summaries
pub fn show(config_path: &Path, number: RevisionNumber) -> CliResult<()> {
    let (store, _report) = open_store(config_path)?;

    let revision = store
        .get_revision(number)
        .ok_or(CliError::RevisionNotFound(number))?;

    let describer = ChangeDescriber::new();
    let summaries = describer
        .describe(revision.changes())
        .into_iter()
        .map(|summary| -> Result<Value, serde_json::Error> {
            Ok(json!({
                "kind": serde_json::to_value(summary.kind)?,
                "subject": summary.subject.as_ref().map(|iri| iri.as_str()),
                "text": summary.text,
                "change_count": summary.changes.len(),
            }))
        })
        .collect::<Result<Vec<Value>, serde_json::Error>>()?;

    let changes: Vec<String> = revision.changes().iter().map(|c| c.to_string()).collect();

    let mut data = revision_json(&revision);
    data["changes"] = json!(changes);
    data["summaries"] = json!(summaries);
    write_response(data)
}

/// Replay the history file and report the outcome
pub fn verify(config_path: &Path) -> CliResult<()> {
    let (store, report) = open_store(config_path)?;

    let error = report.error.as_ref().map(|e| {
        json!({
            "code": e.code().code(),
            "message": e.to_string(),
        })
    });

    write_response(json!({
        "document_id": store.document_id(),
        "path": store.history_path().display().to_string(),
        "complete": report.is_complete(),
        "revisions_loaded": report.revisions_loaded,
        "skipped_chunks": report.skipped_chunks,
        "created_directories": report.created_directories,
        "current_revision": store.get_current_revision_number().value(),
        "error": error,
    }))
}

fn revision_json(revision: &Revision) -> Value {
    json!({
        "revision": revision.number().value(),
        "author": revision.author().as_str(),
        "timestamp": revision.timestamp().to_rfc3339(),
        "description": revision.description(),
        "change_count": revision.change_count(),
    })
}
