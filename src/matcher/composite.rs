//! Matchers for idioms spanning several changes

use std::collections::HashSet;

use super::inline::{declared_subjects, is_inline_member};
use super::matchers::ChangeMatcher;
use super::names::{label_in, value_text};
use super::summary::{ChangeSummary, SummaryKind};
use crate::statement::{Change, Iri, Statement};

/// A batch that only creates one entity, with the annotations it was given.
///
/// `[Declaration(Class(:Pizza)), label(:Pizza "Pizza")]` reads
/// "Created class Pizza labeled \"Pizza\"".
pub struct EntityCreationMatcher;

impl ChangeMatcher for EntityCreationMatcher {
    fn describe(&self, batch: &[Change]) -> Option<ChangeSummary> {
        let declared = declared_subjects(batch);
        let [subject] = declared.as_slice() else {
            return None;
        };
        let subject: &Iri = subject;

        let group: HashSet<&Iri> = HashSet::from([subject]);
        if !batch.iter().all(|change| is_inline_member(change, &group)) {
            return None;
        }

        let declarations: Vec<&Statement> = batch
            .iter()
            .filter_map(Change::added_statement)
            .filter(|statement| statement.is_declaration())
            .collect();
        let [Statement::Declaration(entity)] = declarations.as_slice() else {
            return None;
        };

        let mut text = format!("Created {} {}", entity.kind.noun(), subject.short_form());
        if let Some(label) = label_in(batch, subject) {
            text.push_str(&format!(" labeled \"{}\"", label));
        }

        Some(ChangeSummary::about(SummaryKind::EntityCreated, subject, text).consuming(batch))
    }
}

/// A batch replacing one annotation value with another.
///
/// `[remove label(:Pizza "Piza"), add label(:Pizza "Pizza")]` reads
/// "Changed label of Pizza from \"Piza\" to \"Pizza\"".
pub struct AnnotationEditMatcher;

impl ChangeMatcher for AnnotationEditMatcher {
    fn describe(&self, batch: &[Change]) -> Option<ChangeSummary> {
        let (removed, added) = match batch {
            [Change::RemoveStatement(removed), Change::AddStatement(added)]
            | [Change::AddStatement(added), Change::RemoveStatement(removed)] => (removed, added),
            _ => return None,
        };

        let (
            Statement::AnnotationAssertion {
                subject: old_subject,
                property: old_property,
                value: old_value,
            },
            Statement::AnnotationAssertion {
                subject,
                property,
                value: new_value,
            },
        ) = (&**removed, &**added)
        else {
            return None;
        };

        if old_subject != subject || old_property != property || old_value == new_value {
            return None;
        }

        Some(
            ChangeSummary::about(
                SummaryKind::AnnotationChanged,
                subject,
                format!(
                    "Changed {} of {} from {} to {}",
                    property.short_form(),
                    subject.short_form(),
                    value_text(old_value),
                    value_text(new_value)
                ),
            )
            .consuming(batch),
        )
    }
}
