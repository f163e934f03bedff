//! Rendering entities and values for summaries

use crate::statement::{AnnotationValue, Change, EntityKind, Iri, Literal, Statement};

/// The `rdfs:label` the batch adds for `subject`, if any.
pub fn label_in<'a>(batch: &'a [Change], subject: &Iri) -> Option<&'a str> {
    batch
        .iter()
        .filter_map(Change::added_statement)
        .find_map(|statement| match statement {
            Statement::AnnotationAssertion {
                subject: s,
                property,
                value: AnnotationValue::Literal(literal),
            } if s == subject && property.is_label() => Some(&*literal.lexical),
            _ => None,
        })
}

/// Name shown for `subject`: its label from the batch, else its short form.
pub fn display_name(subject: &Iri, batch: &[Change]) -> String {
    label_in(batch, subject)
        .unwrap_or_else(|| subject.short_form())
        .to_string()
}

/// The kind `subject` is declared as by an add in the batch.
pub fn declared_kind(batch: &[Change], subject: &Iri) -> Option<EntityKind> {
    batch
        .iter()
        .filter_map(Change::added_statement)
        .find_map(|statement| match statement {
            Statement::Declaration(entity) if &entity.iri == subject => Some(entity.kind),
            _ => None,
        })
}

/// Annotation value as shown in a sentence: quoted literal or IRI short form
pub fn value_text(value: &AnnotationValue) -> String {
    match value {
        AnnotationValue::Literal(literal) => literal_text(literal),
        AnnotationValue::Iri(iri) => iri.short_form().to_string(),
    }
}

pub fn literal_text(literal: &Literal) -> String {
    format!("\"{}\"", literal.lexical)
}

/// Comma-separated short forms
pub fn joined(iris: &[Iri]) -> String {
    iris.iter()
        .map(Iri::short_form)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::{Entity, Literal};

    #[test]
    fn test_display_name_prefers_label_from_batch() {
        let pizza = Iri::new("http://ex.org#P123");
        let batch = vec![
            Change::add(Statement::declaration(Entity::class("http://ex.org#P123"))),
            Change::add(Statement::label("http://ex.org#P123", Literal::plain("Pizza"))),
        ];
        assert_eq!(display_name(&pizza, &batch), "Pizza");
        assert_eq!(display_name(&pizza, &[]), "P123");
        assert_eq!(declared_kind(&batch, &pizza), Some(EntityKind::Class));
    }

    #[test]
    fn test_removed_label_is_not_used() {
        let pizza = Iri::new("http://ex.org#P123");
        let batch = vec![Change::remove(Statement::label(
            "http://ex.org#P123",
            Literal::plain("Pizza"),
        ))];
        assert!(label_in(&batch, &pizza).is_none());
    }

    #[test]
    fn test_joined_short_forms() {
        let iris = vec![Iri::new("http://ex.org#A"), Iri::new("http://ex.org/B")];
        assert_eq!(joined(&iris), "A, B");
    }
}
