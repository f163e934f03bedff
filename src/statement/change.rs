//! Atomic changes against a document

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::fact::Statement;
use super::types::{Annotation, DocumentIri, Iri};

/// Change tags as written to the revision log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ChangeType {
    AddStatement = 0,
    RemoveStatement = 1,
    AddDocumentAnnotation = 2,
    RemoveDocumentAnnotation = 3,
    SetDocumentId = 4,
    AddImport = 5,
    RemoveImport = 6,
}

impl ChangeType {
    /// Convert from u8, returns None for invalid values
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ChangeType::AddStatement),
            1 => Some(ChangeType::RemoveStatement),
            2 => Some(ChangeType::AddDocumentAnnotation),
            3 => Some(ChangeType::RemoveDocumentAnnotation),
            4 => Some(ChangeType::SetDocumentId),
            5 => Some(ChangeType::AddImport),
            6 => Some(ChangeType::RemoveImport),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// One atomic change. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Change {
    AddStatement(Arc<Statement>),
    RemoveStatement(Arc<Statement>),
    AddDocumentAnnotation(Annotation),
    RemoveDocumentAnnotation(Annotation),
    SetDocumentId(DocumentIri),
    AddImport(Iri),
    RemoveImport(Iri),
}

impl Change {
    /// Add a statement
    pub fn add(statement: Statement) -> Self {
        Change::AddStatement(Arc::new(statement))
    }

    /// Remove a statement
    pub fn remove(statement: Statement) -> Self {
        Change::RemoveStatement(Arc::new(statement))
    }

    pub fn change_type(&self) -> ChangeType {
        match self {
            Change::AddStatement(_) => ChangeType::AddStatement,
            Change::RemoveStatement(_) => ChangeType::RemoveStatement,
            Change::AddDocumentAnnotation(_) => ChangeType::AddDocumentAnnotation,
            Change::RemoveDocumentAnnotation(_) => ChangeType::RemoveDocumentAnnotation,
            Change::SetDocumentId(_) => ChangeType::SetDocumentId,
            Change::AddImport(_) => ChangeType::AddImport,
            Change::RemoveImport(_) => ChangeType::RemoveImport,
        }
    }

    /// The statement added or removed, if this is a statement change
    pub fn statement(&self) -> Option<&Arc<Statement>> {
        match self {
            Change::AddStatement(statement) | Change::RemoveStatement(statement) => Some(statement),
            _ => None,
        }
    }

    /// The statement if this change adds one
    pub fn added_statement(&self) -> Option<&Statement> {
        match self {
            Change::AddStatement(statement) => Some(statement),
            _ => None,
        }
    }

    pub fn is_add_statement(&self) -> bool {
        matches!(self, Change::AddStatement(_))
    }

    pub fn is_remove_statement(&self) -> bool {
        matches!(self, Change::RemoveStatement(_))
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::AddStatement(statement) => write!(f, "Add {}", statement),
            Change::RemoveStatement(statement) => write!(f, "Remove {}", statement),
            Change::AddDocumentAnnotation(annotation) => write!(f, "Add {}", annotation),
            Change::RemoveDocumentAnnotation(annotation) => write!(f, "Remove {}", annotation),
            Change::SetDocumentId(id) => write!(f, "Set document id {}", id),
            Change::AddImport(iri) => write!(f, "Add Import({})", iri),
            Change::RemoveImport(iri) => write!(f, "Remove Import({})", iri),
        }
    }
}
