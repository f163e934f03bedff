//! Statement model
//!
//! Opaque, immutable, structurally compared values:
//! - `Statement`: an atomic document fact (declarations, annotations, axioms)
//! - `Change`: an atomic add/remove of a statement or a document-level edit

mod change;
mod fact;
mod types;

pub use change::{Change, ChangeType};
pub use fact::{Statement, StatementKind};
pub use types::{
    Annotation, AnnotationValue, DocumentIri, Entity, EntityKind, Iri, Literal, RDFS_COMMENT,
    RDFS_LABEL,
};
