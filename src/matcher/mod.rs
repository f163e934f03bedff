//! Change matchers: raw change batches to human-readable summaries
//!
//! # Matching
//!
//! 1. A per-kind matcher accepts a batch only if it reduces to exactly one
//!    add or remove of a statement of its kind
//! 2. Adds may consult the whole batch (labels, inline declarations)
//! 3. Removes are described from the removed statement alone
//! 4. Matchers opting in to inline declarations first drop the
//!    declaration-plus-annotations groups of entities created in the batch
//!
//! `ChangeDescriber` tries matchers on the whole batch, first hit wins, and
//! otherwise describes each change on its own.

mod composite;
mod describer;
mod inline;
mod kinds;
mod matchers;
mod names;
mod summary;

pub use composite::{AnnotationEditMatcher, EntityCreationMatcher};
pub use describer::{generic_summary, ChangeDescriber};
pub use inline::without_inline_declarations;
pub use kinds::{
    statement_matcher, AnnotationAssertionMatcher, ClassAssertionMatcher,
    DataPropertyAssertionMatcher, DeclarationMatcher, EquivalentClassesMatcher,
    ObjectPropertyAssertionMatcher, SubClassOfMatcher, SubObjectPropertyOfMatcher,
};
pub use matchers::{ChangeMatcher, StatementMatcher};
pub use names::display_name;
pub use summary::{ChangeSummary, SummaryKind};
