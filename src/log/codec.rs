//! Revision chunk body codec
//!
//! Body layout:
//! - Revision Number (u64 LE)
//! - Timestamp (i64 LE, milliseconds since epoch)
//! - Author (u32 LE length + UTF-8)
//! - Description (u32 LE length + UTF-8)
//! - Change Count (u32 LE)
//! - Changes (tag u8 + change payload), in revision order
//!
//! Decoding routes every string and statement through the load's interners.

use std::io::{self, Write};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::intern::LoadInterners;
use crate::revision::{Revision, RevisionNumber, UserId};
use crate::statement::{
    Annotation, AnnotationValue, Change, ChangeType, DocumentIri, Entity, EntityKind, Iri,
    Literal, Statement, StatementKind,
};

const VALUE_IRI: u8 = 0;
const VALUE_LITERAL: u8 = 1;

/// Serialize a revision into a chunk body
pub fn encode_revision(revision: &Revision) -> Vec<u8> {
    let mut buf = Vec::with_capacity(64 + revision.change_count() * 64);
    // Writing into a Vec cannot fail.
    let _ = write_revision(&mut buf, revision);
    buf
}

fn write_revision<W: Write>(w: &mut W, revision: &Revision) -> io::Result<()> {
    w.write_all(&revision.number().value().to_le_bytes())?;
    w.write_all(&revision.timestamp_millis().to_le_bytes())?;
    write_str(w, revision.author().as_str())?;
    write_str(w, revision.description())?;
    w.write_all(&(revision.change_count() as u32).to_le_bytes())?;
    for change in revision.changes() {
        write_change(w, change)?;
    }
    Ok(())
}

fn write_str<W: Write>(w: &mut W, value: &str) -> io::Result<()> {
    w.write_all(&(value.len() as u32).to_le_bytes())?;
    w.write_all(value.as_bytes())
}

fn write_iri<W: Write>(w: &mut W, iri: &Iri) -> io::Result<()> {
    write_str(w, iri.as_str())
}

fn write_optional_iri<W: Write>(w: &mut W, iri: Option<&Iri>) -> io::Result<()> {
    match iri {
        Some(iri) => {
            w.write_all(&[1])?;
            write_iri(w, iri)
        }
        None => w.write_all(&[0]),
    }
}

fn write_literal<W: Write>(w: &mut W, literal: &Literal) -> io::Result<()> {
    write_str(w, &literal.lexical)?;
    match literal.language {
        Some(ref language) => {
            w.write_all(&[1])?;
            write_str(w, language)
        }
        None => w.write_all(&[0]),
    }
}

fn write_value<W: Write>(w: &mut W, value: &AnnotationValue) -> io::Result<()> {
    match value {
        AnnotationValue::Iri(iri) => {
            w.write_all(&[VALUE_IRI])?;
            write_iri(w, iri)
        }
        AnnotationValue::Literal(literal) => {
            w.write_all(&[VALUE_LITERAL])?;
            write_literal(w, literal)
        }
    }
}

fn write_annotation<W: Write>(w: &mut W, annotation: &Annotation) -> io::Result<()> {
    write_iri(w, &annotation.property)?;
    write_value(w, &annotation.value)
}

fn write_change<W: Write>(w: &mut W, change: &Change) -> io::Result<()> {
    w.write_all(&[change.change_type().as_u8()])?;
    match change {
        Change::AddStatement(statement) | Change::RemoveStatement(statement) => {
            write_statement(w, statement)
        }
        Change::AddDocumentAnnotation(annotation) | Change::RemoveDocumentAnnotation(annotation) => {
            write_annotation(w, annotation)
        }
        Change::SetDocumentId(id) => {
            write_optional_iri(w, id.iri.as_ref())?;
            write_optional_iri(w, id.version.as_ref())
        }
        Change::AddImport(iri) | Change::RemoveImport(iri) => write_iri(w, iri),
    }
}

fn write_statement<W: Write>(w: &mut W, statement: &Statement) -> io::Result<()> {
    w.write_all(&[statement.kind().as_u8()])?;
    match statement {
        Statement::Declaration(entity) => {
            w.write_all(&[entity.kind.as_u8()])?;
            write_iri(w, &entity.iri)
        }
        Statement::AnnotationAssertion {
            subject,
            property,
            value,
        } => {
            write_iri(w, subject)?;
            write_iri(w, property)?;
            write_value(w, value)
        }
        Statement::SubClassOf {
            sub_class,
            super_class,
        } => {
            write_iri(w, sub_class)?;
            write_iri(w, super_class)
        }
        Statement::EquivalentClasses(classes) => {
            w.write_all(&(classes.len() as u32).to_le_bytes())?;
            for class in classes {
                write_iri(w, class)?;
            }
            Ok(())
        }
        Statement::ClassAssertion { class, individual } => {
            write_iri(w, class)?;
            write_iri(w, individual)
        }
        Statement::SubObjectPropertyOf {
            sub_property,
            super_property,
        } => {
            write_iri(w, sub_property)?;
            write_iri(w, super_property)
        }
        Statement::ObjectPropertyAssertion {
            property,
            subject,
            object,
        } => {
            write_iri(w, property)?;
            write_iri(w, subject)?;
            write_iri(w, object)
        }
        Statement::DataPropertyAssertion {
            property,
            subject,
            value,
        } => {
            write_iri(w, property)?;
            write_iri(w, subject)?;
            write_literal(w, value)
        }
    }
}

/// Deserialize a revision from a chunk body.
///
/// Fails on truncated or malformed bodies, unknown tags, or trailing bytes.
pub fn decode_revision(body: &[u8], interners: &mut LoadInterners) -> io::Result<Revision> {
    let mut r = BodyReader::new(body, interners);

    let number = RevisionNumber::new(r.read_u64()?);
    let millis = r.read_i64()?;
    let timestamp = DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| invalid(format!("Timestamp out of range: {}", millis)))?;
    let author = UserId::from_shared(r.read_shared_str()?);
    let description = r.read_shared_str()?;

    let change_count = r.read_u32()? as usize;
    // Every change is at least two bytes; cap the reservation by what is left.
    let mut changes = Vec::with_capacity(change_count.min(r.remaining() / 2));
    for _ in 0..change_count {
        changes.push(r.read_change()?);
    }

    if r.remaining() != 0 {
        return Err(invalid(format!(
            "{} trailing bytes after revision {}",
            r.remaining(),
            number.value()
        )));
    }

    Ok(Revision::new(author, number, changes, timestamp, description))
}

fn invalid(message: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.into())
}

struct BodyReader<'a, 'i> {
    data: &'a [u8],
    position: usize,
    interners: &'i mut LoadInterners,
}

impl<'a, 'i> BodyReader<'a, 'i> {
    fn new(data: &'a [u8], interners: &'i mut LoadInterners) -> Self {
        Self {
            data,
            position: 0,
            interners,
        }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    fn take(&mut self, len: usize) -> io::Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "Revision body truncated: need {} bytes at {}, have {}",
                    len,
                    self.position,
                    self.remaining()
                ),
            ));
        }
        let slice = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    fn read_u8(&mut self) -> io::Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_u32(&mut self) -> io::Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_u64(&mut self) -> io::Result<u64> {
        let b = self.take(8)?;
        Ok(u64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
    }

    fn read_i64(&mut self) -> io::Result<i64> {
        let b = self.take(8)?;
        Ok(i64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
    }

    fn read_str(&mut self) -> io::Result<&'a str> {
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes).map_err(|e| invalid(format!("Invalid UTF-8: {}", e)))
    }

    fn read_shared_str(&mut self) -> io::Result<Arc<str>> {
        let value = self.read_str()?;
        Ok(self.interners.string(value))
    }

    fn read_iri(&mut self) -> io::Result<Iri> {
        let value = self.read_str()?;
        Ok(self.interners.iri(value))
    }

    fn read_flag(&mut self) -> io::Result<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(invalid(format!("Invalid flag byte: {}", other))),
        }
    }

    fn read_optional_iri(&mut self) -> io::Result<Option<Iri>> {
        if self.read_flag()? {
            Ok(Some(self.read_iri()?))
        } else {
            Ok(None)
        }
    }

    fn read_literal(&mut self) -> io::Result<Literal> {
        let lexical = self.read_shared_str()?;
        let language = if self.read_flag()? {
            Some(self.read_shared_str()?)
        } else {
            None
        };
        Ok(Literal { lexical, language })
    }

    fn read_value(&mut self) -> io::Result<AnnotationValue> {
        match self.read_u8()? {
            VALUE_IRI => Ok(AnnotationValue::Iri(self.read_iri()?)),
            VALUE_LITERAL => Ok(AnnotationValue::Literal(self.read_literal()?)),
            other => Err(invalid(format!("Invalid annotation value tag: {}", other))),
        }
    }

    fn read_annotation(&mut self) -> io::Result<Annotation> {
        let property = self.read_iri()?;
        let value = self.read_value()?;
        Ok(Annotation { property, value })
    }

    fn read_change(&mut self) -> io::Result<Change> {
        let tag = self.read_u8()?;
        let change_type =
            ChangeType::from_u8(tag).ok_or_else(|| invalid(format!("Invalid change type: {}", tag)))?;
        let change = match change_type {
            ChangeType::AddStatement => {
                let statement = self.read_statement()?;
                Change::AddStatement(self.interners.statement(statement))
            }
            ChangeType::RemoveStatement => {
                let statement = self.read_statement()?;
                Change::RemoveStatement(self.interners.statement(statement))
            }
            ChangeType::AddDocumentAnnotation => {
                Change::AddDocumentAnnotation(self.read_annotation()?)
            }
            ChangeType::RemoveDocumentAnnotation => {
                Change::RemoveDocumentAnnotation(self.read_annotation()?)
            }
            ChangeType::SetDocumentId => {
                let iri = self.read_optional_iri()?;
                let version = self.read_optional_iri()?;
                Change::SetDocumentId(DocumentIri { iri, version })
            }
            ChangeType::AddImport => Change::AddImport(self.read_iri()?),
            ChangeType::RemoveImport => Change::RemoveImport(self.read_iri()?),
        };
        Ok(change)
    }

    fn read_statement(&mut self) -> io::Result<Statement> {
        let tag = self.read_u8()?;
        let kind = StatementKind::from_u8(tag)
            .ok_or_else(|| invalid(format!("Invalid statement kind: {}", tag)))?;
        let statement = match kind {
            StatementKind::Declaration => {
                let entity_tag = self.read_u8()?;
                let entity_kind = EntityKind::from_u8(entity_tag)
                    .ok_or_else(|| invalid(format!("Invalid entity kind: {}", entity_tag)))?;
                let iri = self.read_iri()?;
                Statement::Declaration(Entity {
                    kind: entity_kind,
                    iri,
                })
            }
            StatementKind::AnnotationAssertion => Statement::AnnotationAssertion {
                subject: self.read_iri()?,
                property: self.read_iri()?,
                value: self.read_value()?,
            },
            StatementKind::SubClassOf => Statement::SubClassOf {
                sub_class: self.read_iri()?,
                super_class: self.read_iri()?,
            },
            StatementKind::EquivalentClasses => {
                let count = self.read_u32()? as usize;
                let mut classes = Vec::with_capacity(count.min(self.remaining() / 4));
                for _ in 0..count {
                    classes.push(self.read_iri()?);
                }
                Statement::EquivalentClasses(classes)
            }
            StatementKind::ClassAssertion => Statement::ClassAssertion {
                class: self.read_iri()?,
                individual: self.read_iri()?,
            },
            StatementKind::SubObjectPropertyOf => Statement::SubObjectPropertyOf {
                sub_property: self.read_iri()?,
                super_property: self.read_iri()?,
            },
            StatementKind::ObjectPropertyAssertion => Statement::ObjectPropertyAssertion {
                property: self.read_iri()?,
                subject: self.read_iri()?,
                object: self.read_iri()?,
            },
            StatementKind::DataPropertyAssertion => Statement::DataPropertyAssertion {
                property: self.read_iri()?,
                subject: self.read_iri()?,
                value: self.read_literal()?,
            },
        };
        Ok(statement)
    }
}
