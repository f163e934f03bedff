//! Document fact types
//!
//! Statements are immutable values compared and hashed by structure. Once
//! interned they are shared by reference (`Arc<Statement>`) across every
//! revision of a load.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// IRI of `rdfs:label`
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

/// IRI of `rdfs:comment`
pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";

/// An IRI naming an entity, property or document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Iri(Arc<str>);

impl Iri {
    /// Create an IRI from any string-like value
    pub fn new(value: impl Into<Arc<str>>) -> Self {
        Self(value.into())
    }

    /// Wrap an already shared (possibly interned) string
    pub fn from_shared(value: Arc<str>) -> Self {
        Self(value)
    }

    /// The full IRI text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The shared backing string
    pub fn as_shared(&self) -> &Arc<str> {
        &self.0
    }

    /// Short display form: the fragment after `#`, else the last path segment.
    ///
    /// Falls back to the full IRI when both are empty.
    pub fn short_form(&self) -> &str {
        let iri = self.as_str();
        if let Some((_, fragment)) = iri.rsplit_once('#') {
            if !fragment.is_empty() {
                return fragment;
            }
        }
        match iri.trim_end_matches('/').rsplit_once('/') {
            Some((_, segment)) if !segment.is_empty() => segment,
            _ => iri,
        }
    }

    /// True for `rdfs:label`
    pub fn is_label(&self) -> bool {
        self.as_str() == RDFS_LABEL
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl From<&str> for Iri {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Iri {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// The kind of a declared entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u8)]
pub enum EntityKind {
    Class = 0,
    ObjectProperty = 1,
    DataProperty = 2,
    AnnotationProperty = 3,
    NamedIndividual = 4,
    Datatype = 5,
}

impl EntityKind {
    /// Convert from u8, returns None for invalid values
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(EntityKind::Class),
            1 => Some(EntityKind::ObjectProperty),
            2 => Some(EntityKind::DataProperty),
            3 => Some(EntityKind::AnnotationProperty),
            4 => Some(EntityKind::NamedIndividual),
            5 => Some(EntityKind::Datatype),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Functional-syntax keyword
    pub fn keyword(self) -> &'static str {
        match self {
            EntityKind::Class => "Class",
            EntityKind::ObjectProperty => "ObjectProperty",
            EntityKind::DataProperty => "DataProperty",
            EntityKind::AnnotationProperty => "AnnotationProperty",
            EntityKind::NamedIndividual => "NamedIndividual",
            EntityKind::Datatype => "Datatype",
        }
    }

    /// Lower-case noun used in summaries
    pub fn noun(self) -> &'static str {
        match self {
            EntityKind::Class => "class",
            EntityKind::ObjectProperty => "object property",
            EntityKind::DataProperty => "data property",
            EntityKind::AnnotationProperty => "annotation property",
            EntityKind::NamedIndividual => "individual",
            EntityKind::Datatype => "datatype",
        }
    }
}

/// A typed entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub iri: Iri,
}

impl Entity {
    pub fn new(kind: EntityKind, iri: impl Into<Iri>) -> Self {
        Self {
            kind,
            iri: iri.into(),
        }
    }

    pub fn class(iri: impl Into<Iri>) -> Self {
        Self::new(EntityKind::Class, iri)
    }

    pub fn individual(iri: impl Into<Iri>) -> Self {
        Self::new(EntityKind::NamedIndividual, iri)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind.keyword(), self.iri)
    }
}

/// A literal value with an optional language tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Literal {
    pub lexical: Arc<str>,
    pub language: Option<Arc<str>>,
}

impl Literal {
    /// A plain literal without language tag
    pub fn plain(lexical: impl Into<Arc<str>>) -> Self {
        Self {
            lexical: lexical.into(),
            language: None,
        }
    }

    /// A literal with a language tag
    pub fn tagged(lexical: impl Into<Arc<str>>, language: impl Into<Arc<str>>) -> Self {
        Self {
            lexical: lexical.into(),
            language: Some(language.into()),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.lexical.replace('"', "\\\""))?;
        if let Some(ref language) = self.language {
            write!(f, "@{}", language)?;
        }
        Ok(())
    }
}

/// The object of an annotation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum AnnotationValue {
    Iri(Iri),
    Literal(Literal),
}

impl AnnotationValue {
    /// Text shown to users: the literal's lexical form or the IRI short form
    pub fn display_text(&self) -> &str {
        match self {
            AnnotationValue::Iri(iri) => iri.short_form(),
            AnnotationValue::Literal(literal) => &literal.lexical,
        }
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationValue::Iri(iri) => write!(f, "{}", iri),
            AnnotationValue::Literal(literal) => write!(f, "{}", literal),
        }
    }
}

impl From<Literal> for AnnotationValue {
    fn from(value: Literal) -> Self {
        AnnotationValue::Literal(value)
    }
}

impl From<Iri> for AnnotationValue {
    fn from(value: Iri) -> Self {
        AnnotationValue::Iri(value)
    }
}

/// A property/value pair attached to the document itself
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Annotation {
    pub property: Iri,
    pub value: AnnotationValue,
}

impl Annotation {
    pub fn new(property: impl Into<Iri>, value: impl Into<AnnotationValue>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Annotation({} {})", self.property, self.value)
    }
}

/// Identity of the document: its IRI and optional version IRI
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct DocumentIri {
    pub iri: Option<Iri>,
    pub version: Option<Iri>,
}

impl fmt::Display for DocumentIri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.iri, &self.version) {
            (Some(iri), Some(version)) => write!(f, "{} {}", iri, version),
            (Some(iri), None) => write!(f, "{}", iri),
            _ => write!(f, "anonymous"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_form_uses_fragment() {
        let iri = Iri::new("http://example.org/onto#Pizza");
        assert_eq!(iri.short_form(), "Pizza");
    }

    #[test]
    fn test_short_form_uses_last_segment() {
        let iri = Iri::new("http://example.org/onto/Topping/");
        assert_eq!(iri.short_form(), "Topping");
    }

    #[test]
    fn test_short_form_falls_back_to_full_iri() {
        let iri = Iri::new("urn:x");
        assert_eq!(iri.short_form(), "urn:x");
    }

    #[test]
    fn test_entity_kind_roundtrip() {
        for value in 0..=5u8 {
            let kind = EntityKind::from_u8(value).unwrap();
            assert_eq!(kind.as_u8(), value);
        }
        assert!(EntityKind::from_u8(6).is_none());
    }

    #[test]
    fn test_literal_display() {
        assert_eq!(Literal::tagged("Margherita", "en").to_string(), "\"Margherita\"@en");
        assert_eq!(Literal::plain("a \"b\"").to_string(), "\"a \\\"b\\\"\"");
    }
}
