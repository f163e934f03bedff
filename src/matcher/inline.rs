//! Inline-declaration grouping
//!
//! An editor creating an entity emits its declaration together with the
//! annotations it was given in the same batch. Grouping the added
//! declarations and annotation assertions of a batch by the entity they are
//! about identifies those units, so a matcher can look past them to the one
//! change it describes.

use std::collections::HashSet;

use crate::statement::{Change, Iri};

/// Subjects declared by an add in `batch`, in first-appearance order.
pub fn declared_subjects(batch: &[Change]) -> Vec<&Iri> {
    let mut seen = HashSet::new();
    batch
        .iter()
        .filter_map(Change::added_statement)
        .filter(|statement| statement.is_declaration())
        .filter_map(|statement| statement.creation_subject())
        .filter(|subject| seen.insert(*subject))
        .collect()
}

/// True if `change` adds a declaration or annotation about a subject in
/// `declared`.
pub fn is_inline_member(change: &Change, declared: &HashSet<&Iri>) -> bool {
    match change.added_statement() {
        Some(statement) if statement.is_declaration() || statement.is_annotation_assertion() => {
            statement
                .creation_subject()
                .map_or(false, |subject| declared.contains(subject))
        }
        _ => false,
    }
}

/// The changes of `batch` outside every inline declaration group.
///
/// A group is the added declarations and annotation assertions sharing one
/// subject; it is removed when it contains a declaration. Removals are never
/// grouped.
pub fn without_inline_declarations(batch: &[Change]) -> Vec<&Change> {
    let declared: HashSet<&Iri> = declared_subjects(batch).into_iter().collect();
    batch
        .iter()
        .filter(|change| !is_inline_member(change, &declared))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::{Entity, Literal, Statement};

    const PIZZA: &str = "http://ex.org#Pizza";
    const FOOD: &str = "http://ex.org#Food";

    #[test]
    fn test_declaration_and_label_are_grouped_away() {
        let batch = vec![
            Change::add(Statement::declaration(Entity::class(PIZZA))),
            Change::add(Statement::label(PIZZA, Literal::plain("Pizza"))),
            Change::add(Statement::sub_class_of(PIZZA, FOOD)),
        ];

        let remaining = without_inline_declarations(&batch);
        assert_eq!(remaining, vec![&batch[2]]);
    }

    #[test]
    fn test_annotations_without_declaration_stay() {
        let batch = vec![
            Change::add(Statement::label(PIZZA, Literal::plain("Pizza"))),
            Change::add(Statement::sub_class_of(PIZZA, FOOD)),
        ];
        assert_eq!(without_inline_declarations(&batch).len(), 2);
    }

    #[test]
    fn test_annotations_of_other_subjects_stay() {
        let batch = vec![
            Change::add(Statement::declaration(Entity::class(PIZZA))),
            Change::add(Statement::label(FOOD, Literal::plain("Food"))),
        ];
        assert_eq!(without_inline_declarations(&batch), vec![&batch[1]]);
    }

    #[test]
    fn test_removals_are_never_grouped() {
        let batch = vec![
            Change::remove(Statement::declaration(Entity::class(PIZZA))),
            Change::remove(Statement::label(PIZZA, Literal::plain("Pizza"))),
        ];
        assert_eq!(without_inline_declarations(&batch).len(), 2);
        assert!(declared_subjects(&batch).is_empty());
    }

    #[test]
    fn test_declared_subjects_deduplicated() {
        let batch = vec![
            Change::add(Statement::declaration(Entity::class(PIZZA))),
            Change::add(Statement::declaration(Entity::individual(PIZZA))),
            Change::add(Statement::declaration(Entity::class(FOOD))),
        ];
        let subjects: Vec<&str> = declared_subjects(&batch).iter().map(|i| i.as_str()).collect();
        assert_eq!(subjects, vec![PIZZA, FOOD]);
    }
}
