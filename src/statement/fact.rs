//! Atomic document facts

use std::fmt;

use serde::Serialize;

use super::types::{AnnotationValue, Entity, Iri, Literal};

/// The recognised statement kinds.
///
/// Matchers specialise on exactly one kind; dispatch is an exhaustive match
/// on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u8)]
pub enum StatementKind {
    Declaration = 0,
    AnnotationAssertion = 1,
    SubClassOf = 2,
    EquivalentClasses = 3,
    ClassAssertion = 4,
    SubObjectPropertyOf = 5,
    ObjectPropertyAssertion = 6,
    DataPropertyAssertion = 7,
}

impl StatementKind {
    /// Every kind, in tag order
    pub const ALL: [StatementKind; 8] = [
        StatementKind::Declaration,
        StatementKind::AnnotationAssertion,
        StatementKind::SubClassOf,
        StatementKind::EquivalentClasses,
        StatementKind::ClassAssertion,
        StatementKind::SubObjectPropertyOf,
        StatementKind::ObjectPropertyAssertion,
        StatementKind::DataPropertyAssertion,
    ];

    /// Convert from u8, returns None for invalid values
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(StatementKind::Declaration),
            1 => Some(StatementKind::AnnotationAssertion),
            2 => Some(StatementKind::SubClassOf),
            3 => Some(StatementKind::EquivalentClasses),
            4 => Some(StatementKind::ClassAssertion),
            5 => Some(StatementKind::SubObjectPropertyOf),
            6 => Some(StatementKind::ObjectPropertyAssertion),
            7 => Some(StatementKind::DataPropertyAssertion),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Functional-syntax keyword
    pub fn keyword(self) -> &'static str {
        match self {
            StatementKind::Declaration => "Declaration",
            StatementKind::AnnotationAssertion => "AnnotationAssertion",
            StatementKind::SubClassOf => "SubClassOf",
            StatementKind::EquivalentClasses => "EquivalentClasses",
            StatementKind::ClassAssertion => "ClassAssertion",
            StatementKind::SubObjectPropertyOf => "SubObjectPropertyOf",
            StatementKind::ObjectPropertyAssertion => "ObjectPropertyAssertion",
            StatementKind::DataPropertyAssertion => "DataPropertyAssertion",
        }
    }
}

/// An atomic document fact
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Statement {
    /// Declares that an entity exists
    Declaration(Entity),
    /// Attaches an annotation to a subject
    AnnotationAssertion {
        subject: Iri,
        property: Iri,
        value: AnnotationValue,
    },
    SubClassOf {
        sub_class: Iri,
        super_class: Iri,
    },
    EquivalentClasses(Vec<Iri>),
    ClassAssertion {
        class: Iri,
        individual: Iri,
    },
    SubObjectPropertyOf {
        sub_property: Iri,
        super_property: Iri,
    },
    ObjectPropertyAssertion {
        property: Iri,
        subject: Iri,
        object: Iri,
    },
    DataPropertyAssertion {
        property: Iri,
        subject: Iri,
        value: Literal,
    },
}

impl Statement {
    /// Declaration of an entity
    pub fn declaration(entity: Entity) -> Self {
        Statement::Declaration(entity)
    }

    /// `rdfs:label` assertion on a subject
    pub fn label(subject: impl Into<Iri>, value: Literal) -> Self {
        Statement::AnnotationAssertion {
            subject: subject.into(),
            property: Iri::new(super::types::RDFS_LABEL),
            value: AnnotationValue::Literal(value),
        }
    }

    pub fn sub_class_of(sub_class: impl Into<Iri>, super_class: impl Into<Iri>) -> Self {
        Statement::SubClassOf {
            sub_class: sub_class.into(),
            super_class: super_class.into(),
        }
    }

    pub fn class_assertion(class: impl Into<Iri>, individual: impl Into<Iri>) -> Self {
        Statement::ClassAssertion {
            class: class.into(),
            individual: individual.into(),
        }
    }

    /// The kind tag of this statement
    pub fn kind(&self) -> StatementKind {
        match self {
            Statement::Declaration(_) => StatementKind::Declaration,
            Statement::AnnotationAssertion { .. } => StatementKind::AnnotationAssertion,
            Statement::SubClassOf { .. } => StatementKind::SubClassOf,
            Statement::EquivalentClasses(_) => StatementKind::EquivalentClasses,
            Statement::ClassAssertion { .. } => StatementKind::ClassAssertion,
            Statement::SubObjectPropertyOf { .. } => StatementKind::SubObjectPropertyOf,
            Statement::ObjectPropertyAssertion { .. } => StatementKind::ObjectPropertyAssertion,
            Statement::DataPropertyAssertion { .. } => StatementKind::DataPropertyAssertion,
        }
    }

    /// The entity this statement would be "about" if it accompanied the
    /// creation of that entity.
    ///
    /// Used to group a declaration with the annotations that arrive in the
    /// same batch.
    pub fn creation_subject(&self) -> Option<&Iri> {
        match self {
            Statement::Declaration(entity) => Some(&entity.iri),
            Statement::AnnotationAssertion { subject, .. } => Some(subject),
            Statement::SubClassOf { sub_class, .. } => Some(sub_class),
            Statement::EquivalentClasses(classes) => classes.first(),
            Statement::ClassAssertion { individual, .. } => Some(individual),
            Statement::SubObjectPropertyOf { sub_property, .. } => Some(sub_property),
            Statement::ObjectPropertyAssertion { subject, .. } => Some(subject),
            Statement::DataPropertyAssertion { subject, .. } => Some(subject),
        }
    }

    pub fn is_declaration(&self) -> bool {
        matches!(self, Statement::Declaration(_))
    }

    pub fn is_annotation_assertion(&self) -> bool {
        matches!(self, Statement::AnnotationAssertion { .. })
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = self.kind().keyword();
        match self {
            Statement::Declaration(entity) => write!(f, "{}({})", keyword, entity),
            Statement::AnnotationAssertion {
                subject,
                property,
                value,
            } => write!(f, "{}({} {} {})", keyword, property, subject, value),
            Statement::SubClassOf {
                sub_class,
                super_class,
            } => write!(f, "{}({} {})", keyword, sub_class, super_class),
            Statement::EquivalentClasses(classes) => {
                write!(f, "{}(", keyword)?;
                for (i, class) in classes.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", class)?;
                }
                write!(f, ")")
            }
            Statement::ClassAssertion { class, individual } => {
                write!(f, "{}({} {})", keyword, class, individual)
            }
            Statement::SubObjectPropertyOf {
                sub_property,
                super_property,
            } => write!(f, "{}({} {})", keyword, sub_property, super_property),
            Statement::ObjectPropertyAssertion {
                property,
                subject,
                object,
            } => write!(f, "{}({} {} {})", keyword, property, subject, object),
            Statement::DataPropertyAssertion {
                property,
                subject,
                value,
            } => write!(f, "{}({} {} {})", keyword, property, subject, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_kind_roundtrip() {
        for value in 0..=7u8 {
            let kind = StatementKind::from_u8(value).unwrap();
            assert_eq!(kind.as_u8(), value);
        }
        assert!(StatementKind::from_u8(8).is_none());
    }

    #[test]
    fn test_creation_subject_of_label_is_its_subject() {
        let label = Statement::label("http://ex.org#A", Literal::plain("A"));
        assert_eq!(label.creation_subject().unwrap().as_str(), "http://ex.org#A");
    }

    #[test]
    fn test_creation_subject_of_class_assertion_is_individual() {
        let st = Statement::class_assertion("http://ex.org#Pizza", "http://ex.org#p1");
        assert_eq!(st.creation_subject().unwrap().as_str(), "http://ex.org#p1");
    }

    #[test]
    fn test_functional_syntax_display() {
        let st = Statement::declaration(Entity::class("http://ex.org#A"));
        assert_eq!(st.to_string(), "Declaration(Class(<http://ex.org#A>))");

        let st = Statement::sub_class_of("http://ex.org#A", "http://ex.org#B");
        assert_eq!(st.to_string(), "SubClassOf(<http://ex.org#A> <http://ex.org#B>)");
    }

    #[test]
    fn test_structural_equality() {
        let a = Statement::sub_class_of("http://ex.org#A", "http://ex.org#B");
        let b = Statement::sub_class_of("http://ex.org#A", "http://ex.org#B");
        assert_eq!(a, b);
        assert_eq!(a.kind(), StatementKind::SubClassOf);
    }
}
