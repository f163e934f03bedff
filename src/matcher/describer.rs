//! Entry point for display layers: change batch in, summaries out

use std::slice;

use super::composite::{AnnotationEditMatcher, EntityCreationMatcher};
use super::kinds::{
    statement_matcher, AnnotationAssertionMatcher, ClassAssertionMatcher,
    DataPropertyAssertionMatcher, DeclarationMatcher, EquivalentClassesMatcher,
    ObjectPropertyAssertionMatcher, SubClassOfMatcher, SubObjectPropertyOfMatcher,
};
use super::matchers::ChangeMatcher;
use super::names::value_text;
use super::summary::{ChangeSummary, SummaryKind};
use crate::statement::Change;

/// Describes change batches with a fixed, ordered set of matchers.
pub struct ChangeDescriber {
    matchers: Vec<&'static dyn ChangeMatcher>,
}

impl ChangeDescriber {
    /// Per-kind matchers in statement tag order, then the multi-change idioms
    pub fn new() -> Self {
        let matchers: [&'static dyn ChangeMatcher; 10] = [
            &DeclarationMatcher,
            &AnnotationAssertionMatcher,
            &SubClassOfMatcher,
            &EquivalentClassesMatcher,
            &ClassAssertionMatcher,
            &SubObjectPropertyOfMatcher,
            &ObjectPropertyAssertionMatcher,
            &DataPropertyAssertionMatcher,
            &EntityCreationMatcher,
            &AnnotationEditMatcher,
        ];
        Self {
            matchers: matchers.to_vec(),
        }
    }

    /// Summaries for one revision's changes.
    ///
    /// If a matcher accepts the whole batch its summary is the only one.
    /// Otherwise each change is described on its own by the matcher for its
    /// statement kind, or generically. An empty batch has no summaries.
    pub fn describe(&self, batch: &[Change]) -> Vec<ChangeSummary> {
        if batch.is_empty() {
            return Vec::new();
        }
        if let Some(summary) = self.first_match(batch) {
            return vec![summary];
        }
        batch
            .iter()
            .map(|change| describe_single(change).unwrap_or_else(|| generic_summary(change)))
            .collect()
    }

    fn first_match(&self, batch: &[Change]) -> Option<ChangeSummary> {
        self.matchers.iter().find_map(|matcher| matcher.describe(batch))
    }
}

fn describe_single(change: &Change) -> Option<ChangeSummary> {
    let statement = change.statement()?;
    statement_matcher(statement.kind()).describe(slice::from_ref(change))
}

impl Default for ChangeDescriber {
    fn default() -> Self {
        Self::new()
    }
}

/// Fallback summary for a change no matcher recognised.
pub fn generic_summary(change: &Change) -> ChangeSummary {
    let summary = match change {
        Change::AddStatement(statement) => ChangeSummary::new(
            SummaryKind::StatementAdded,
            statement.creation_subject().cloned(),
            format!("Added {}", statement),
        ),
        Change::RemoveStatement(statement) => ChangeSummary::new(
            SummaryKind::StatementRemoved,
            statement.creation_subject().cloned(),
            format!("Removed {}", statement),
        ),
        Change::AddDocumentAnnotation(annotation) => ChangeSummary::new(
            SummaryKind::DocumentAnnotationAdded,
            None,
            format!(
                "Added document annotation {} {}",
                annotation.property.short_form(),
                value_text(&annotation.value)
            ),
        ),
        Change::RemoveDocumentAnnotation(annotation) => ChangeSummary::new(
            SummaryKind::DocumentAnnotationRemoved,
            None,
            format!(
                "Removed document annotation {} {}",
                annotation.property.short_form(),
                value_text(&annotation.value)
            ),
        ),
        Change::SetDocumentId(id) => ChangeSummary::new(
            SummaryKind::DocumentIdChanged,
            id.iri.clone(),
            format!("Set document id to {}", id),
        ),
        Change::AddImport(iri) => ChangeSummary::new(
            SummaryKind::ImportAdded,
            Some(iri.clone()),
            format!("Added import {}", iri),
        ),
        Change::RemoveImport(iri) => ChangeSummary::new(
            SummaryKind::ImportRemoved,
            Some(iri.clone()),
            format!("Removed import {}", iri),
        ),
    };
    summary.consuming(slice::from_ref(change))
}
