//! Human-readable change summaries

use std::fmt;

use serde::Serialize;

use crate::statement::{Change, Iri};

/// What a summary describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryKind {
    EntityCreated,
    EntityDeleted,
    AnnotationAdded,
    AnnotationRemoved,
    AnnotationChanged,
    ParentAdded,
    ParentRemoved,
    EquivalenceAdded,
    EquivalenceRemoved,
    TypeAdded,
    TypeRemoved,
    SuperPropertyAdded,
    SuperPropertyRemoved,
    RelationshipAdded,
    RelationshipRemoved,
    PropertyValueAdded,
    PropertyValueRemoved,
    DocumentAnnotationAdded,
    DocumentAnnotationRemoved,
    DocumentIdChanged,
    ImportAdded,
    ImportRemoved,
    /// Fallback for an added statement no matcher recognised
    StatementAdded,
    /// Fallback for a removed statement no matcher recognised
    StatementRemoved,
}

/// One human-readable description of part of a change batch.
///
/// Recomputed on demand and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeSummary {
    pub kind: SummaryKind,
    /// The entity the summary is about, if there is one
    pub subject: Option<Iri>,
    pub text: String,
    /// The raw changes this summary accounts for
    pub changes: Vec<Change>,
}

impl ChangeSummary {
    pub fn new(kind: SummaryKind, subject: Option<Iri>, text: impl Into<String>) -> Self {
        Self {
            kind,
            subject,
            text: text.into(),
            changes: Vec::new(),
        }
    }

    pub fn about(kind: SummaryKind, subject: &Iri, text: impl Into<String>) -> Self {
        Self::new(kind, Some(subject.clone()), text)
    }

    /// Attach the changes this summary accounts for
    pub fn consuming(mut self, changes: &[Change]) -> Self {
        self.changes = changes.to_vec();
        self
    }
}

impl fmt::Display for ChangeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
