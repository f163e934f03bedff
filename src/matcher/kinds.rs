//! One matcher per recognised statement kind

use super::matchers::StatementMatcher;
use super::names::{declared_kind, display_name, joined, literal_text, value_text};
use super::summary::{ChangeSummary, SummaryKind};
use crate::statement::{Change, Iri, Statement, StatementKind};

/// The matcher for statements of `kind`.
pub fn statement_matcher(kind: StatementKind) -> &'static dyn StatementMatcher {
    match kind {
        StatementKind::Declaration => &DeclarationMatcher,
        StatementKind::AnnotationAssertion => &AnnotationAssertionMatcher,
        StatementKind::SubClassOf => &SubClassOfMatcher,
        StatementKind::EquivalentClasses => &EquivalentClassesMatcher,
        StatementKind::ClassAssertion => &ClassAssertionMatcher,
        StatementKind::SubObjectPropertyOf => &SubObjectPropertyOfMatcher,
        StatementKind::ObjectPropertyAssertion => &ObjectPropertyAssertionMatcher,
        StatementKind::DataPropertyAssertion => &DataPropertyAssertionMatcher,
    }
}

/// "Created class Pizza" when `subject` is declared in the batch, else the
/// subject's display name.
fn created_prefix(subject: &Iri, batch: &[Change]) -> Option<String> {
    declared_kind(batch, subject)
        .map(|kind| format!("Created {} {}", kind.noun(), display_name(subject, batch)))
}

pub struct DeclarationMatcher;

impl StatementMatcher for DeclarationMatcher {
    fn kind(&self) -> StatementKind {
        StatementKind::Declaration
    }

    fn describe_added(&self, statement: &Statement, _batch: &[Change]) -> Option<ChangeSummary> {
        match statement {
            Statement::Declaration(entity) => Some(ChangeSummary::about(
                SummaryKind::EntityCreated,
                &entity.iri,
                format!("Created {} {}", entity.kind.noun(), entity.iri.short_form()),
            )),
            _ => None,
        }
    }

    fn describe_removed(&self, statement: &Statement) -> Option<ChangeSummary> {
        match statement {
            Statement::Declaration(entity) => Some(ChangeSummary::about(
                SummaryKind::EntityDeleted,
                &entity.iri,
                format!("Deleted {} {}", entity.kind.noun(), entity.iri.short_form()),
            )),
            _ => None,
        }
    }
}

pub struct AnnotationAssertionMatcher;

impl StatementMatcher for AnnotationAssertionMatcher {
    fn kind(&self) -> StatementKind {
        StatementKind::AnnotationAssertion
    }

    fn describe_added(&self, statement: &Statement, _batch: &[Change]) -> Option<ChangeSummary> {
        match statement {
            Statement::AnnotationAssertion {
                subject,
                property,
                value,
            } => Some(ChangeSummary::about(
                SummaryKind::AnnotationAdded,
                subject,
                format!(
                    "Added {} {} to {}",
                    property.short_form(),
                    value_text(value),
                    subject.short_form()
                ),
            )),
            _ => None,
        }
    }

    fn describe_removed(&self, statement: &Statement) -> Option<ChangeSummary> {
        match statement {
            Statement::AnnotationAssertion {
                subject,
                property,
                value,
            } => Some(ChangeSummary::about(
                SummaryKind::AnnotationRemoved,
                subject,
                format!(
                    "Removed {} {} from {}",
                    property.short_form(),
                    value_text(value),
                    subject.short_form()
                ),
            )),
            _ => None,
        }
    }
}

pub struct SubClassOfMatcher;

impl StatementMatcher for SubClassOfMatcher {
    fn kind(&self) -> StatementKind {
        StatementKind::SubClassOf
    }

    fn allows_inline_declarations(&self) -> bool {
        true
    }

    fn describe_added(&self, statement: &Statement, batch: &[Change]) -> Option<ChangeSummary> {
        let Statement::SubClassOf {
            sub_class,
            super_class,
        } = statement
        else {
            return None;
        };
        let text = match created_prefix(sub_class, batch) {
            Some(created) => format!("{} as a subclass of {}", created, display_name(super_class, batch)),
            None => format!(
                "Added {} as a parent of {}",
                display_name(super_class, batch),
                display_name(sub_class, batch)
            ),
        };
        Some(ChangeSummary::about(SummaryKind::ParentAdded, sub_class, text))
    }

    fn describe_removed(&self, statement: &Statement) -> Option<ChangeSummary> {
        let Statement::SubClassOf {
            sub_class,
            super_class,
        } = statement
        else {
            return None;
        };
        Some(ChangeSummary::about(
            SummaryKind::ParentRemoved,
            sub_class,
            format!(
                "Removed {} as a parent of {}",
                super_class.short_form(),
                sub_class.short_form()
            ),
        ))
    }
}

pub struct EquivalentClassesMatcher;

impl StatementMatcher for EquivalentClassesMatcher {
    fn kind(&self) -> StatementKind {
        StatementKind::EquivalentClasses
    }

    fn describe_added(&self, statement: &Statement, _batch: &[Change]) -> Option<ChangeSummary> {
        let Statement::EquivalentClasses(classes) = statement else {
            return None;
        };
        let (first, rest) = classes.split_first()?;
        Some(ChangeSummary::about(
            SummaryKind::EquivalenceAdded,
            first,
            format!("Made {} equivalent to {}", first.short_form(), joined(rest)),
        ))
    }

    fn describe_removed(&self, statement: &Statement) -> Option<ChangeSummary> {
        let Statement::EquivalentClasses(classes) = statement else {
            return None;
        };
        let first = classes.first()?;
        Some(ChangeSummary::about(
            SummaryKind::EquivalenceRemoved,
            first,
            format!("Removed equivalence between {}", joined(classes)),
        ))
    }
}

pub struct ClassAssertionMatcher;

impl StatementMatcher for ClassAssertionMatcher {
    fn kind(&self) -> StatementKind {
        StatementKind::ClassAssertion
    }

    fn allows_inline_declarations(&self) -> bool {
        true
    }

    fn describe_added(&self, statement: &Statement, batch: &[Change]) -> Option<ChangeSummary> {
        let Statement::ClassAssertion { class, individual } = statement else {
            return None;
        };
        let text = match created_prefix(individual, batch) {
            Some(created) => format!("{} of type {}", created, display_name(class, batch)),
            None => format!(
                "Added type {} to {}",
                display_name(class, batch),
                display_name(individual, batch)
            ),
        };
        Some(ChangeSummary::about(SummaryKind::TypeAdded, individual, text))
    }

    fn describe_removed(&self, statement: &Statement) -> Option<ChangeSummary> {
        let Statement::ClassAssertion { class, individual } = statement else {
            return None;
        };
        Some(ChangeSummary::about(
            SummaryKind::TypeRemoved,
            individual,
            format!(
                "Removed type {} from {}",
                class.short_form(),
                individual.short_form()
            ),
        ))
    }
}

pub struct SubObjectPropertyOfMatcher;

impl StatementMatcher for SubObjectPropertyOfMatcher {
    fn kind(&self) -> StatementKind {
        StatementKind::SubObjectPropertyOf
    }

    fn allows_inline_declarations(&self) -> bool {
        true
    }

    fn describe_added(&self, statement: &Statement, batch: &[Change]) -> Option<ChangeSummary> {
        let Statement::SubObjectPropertyOf {
            sub_property,
            super_property,
        } = statement
        else {
            return None;
        };
        let text = match created_prefix(sub_property, batch) {
            Some(created) => format!(
                "{} as a sub property of {}",
                created,
                display_name(super_property, batch)
            ),
            None => format!(
                "Added {} as a super property of {}",
                display_name(super_property, batch),
                display_name(sub_property, batch)
            ),
        };
        Some(ChangeSummary::about(SummaryKind::SuperPropertyAdded, sub_property, text))
    }

    fn describe_removed(&self, statement: &Statement) -> Option<ChangeSummary> {
        let Statement::SubObjectPropertyOf {
            sub_property,
            super_property,
        } = statement
        else {
            return None;
        };
        Some(ChangeSummary::about(
            SummaryKind::SuperPropertyRemoved,
            sub_property,
            format!(
                "Removed {} as a super property of {}",
                super_property.short_form(),
                sub_property.short_form()
            ),
        ))
    }
}

pub struct ObjectPropertyAssertionMatcher;

impl StatementMatcher for ObjectPropertyAssertionMatcher {
    fn kind(&self) -> StatementKind {
        StatementKind::ObjectPropertyAssertion
    }

    fn describe_added(&self, statement: &Statement, _batch: &[Change]) -> Option<ChangeSummary> {
        let Statement::ObjectPropertyAssertion {
            property,
            subject,
            object,
        } = statement
        else {
            return None;
        };
        Some(ChangeSummary::about(
            SummaryKind::RelationshipAdded,
            subject,
            format!(
                "Added {} {} to {}",
                property.short_form(),
                object.short_form(),
                subject.short_form()
            ),
        ))
    }

    fn describe_removed(&self, statement: &Statement) -> Option<ChangeSummary> {
        let Statement::ObjectPropertyAssertion {
            property,
            subject,
            object,
        } = statement
        else {
            return None;
        };
        Some(ChangeSummary::about(
            SummaryKind::RelationshipRemoved,
            subject,
            format!(
                "Removed {} {} from {}",
                property.short_form(),
                object.short_form(),
                subject.short_form()
            ),
        ))
    }
}

pub struct DataPropertyAssertionMatcher;

impl StatementMatcher for DataPropertyAssertionMatcher {
    fn kind(&self) -> StatementKind {
        StatementKind::DataPropertyAssertion
    }

    fn describe_added(&self, statement: &Statement, _batch: &[Change]) -> Option<ChangeSummary> {
        let Statement::DataPropertyAssertion {
            property,
            subject,
            value,
        } = statement
        else {
            return None;
        };
        Some(ChangeSummary::about(
            SummaryKind::PropertyValueAdded,
            subject,
            format!(
                "Added {} {} to {}",
                property.short_form(),
                literal_text(value),
                subject.short_form()
            ),
        ))
    }

    fn describe_removed(&self, statement: &Statement) -> Option<ChangeSummary> {
        let Statement::DataPropertyAssertion {
            property,
            subject,
            value,
        } = statement
        else {
            return None;
        };
        Some(ChangeSummary::about(
            SummaryKind::PropertyValueRemoved,
            subject,
            format!(
                "Removed {} {} from {}",
                property.short_form(),
                literal_text(value),
                subject.short_form()
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::matchers::ChangeMatcher;
    use crate::statement::{Entity, EntityKind, Literal};

    const PIZZA: &str = "http://ex.org#Pizza";
    const FOOD: &str = "http://ex.org#Food";

    #[test]
    fn test_dispatch_is_exhaustive() {
        for kind in StatementKind::ALL {
            assert_eq!(statement_matcher(kind).kind(), kind);
        }
    }

    #[test]
    fn test_inline_opt_ins() {
        let opted: Vec<StatementKind> = StatementKind::ALL
            .into_iter()
            .filter(|kind| statement_matcher(*kind).allows_inline_declarations())
            .collect();
        assert_eq!(
            opted,
            vec![
                StatementKind::SubClassOf,
                StatementKind::ClassAssertion,
                StatementKind::SubObjectPropertyOf
            ]
        );
    }

    #[test]
    fn test_sub_class_of_added() {
        let batch = vec![Change::add(Statement::sub_class_of(PIZZA, FOOD))];
        let summary = SubClassOfMatcher.describe(&batch).unwrap();
        assert_eq!(summary.kind, SummaryKind::ParentAdded);
        assert_eq!(summary.text, "Added Food as a parent of Pizza");
        assert_eq!(summary.subject.unwrap().as_str(), PIZZA);
    }

    #[test]
    fn test_sub_class_of_with_inline_creation() {
        let batch = vec![
            Change::add(Statement::declaration(Entity::class(PIZZA))),
            Change::add(Statement::label(PIZZA, Literal::plain("Pizza pie"))),
            Change::add(Statement::sub_class_of(PIZZA, FOOD)),
        ];
        let summary = SubClassOfMatcher.describe(&batch).unwrap();
        assert_eq!(summary.text, "Created class Pizza pie as a subclass of Food");
        assert_eq!(summary.changes.len(), 3);
    }

    #[test]
    fn test_sub_class_of_removed() {
        let batch = vec![Change::remove(Statement::sub_class_of(PIZZA, FOOD))];
        let summary = SubClassOfMatcher.describe(&batch).unwrap();
        assert_eq!(summary.text, "Removed Food as a parent of Pizza");
    }

    #[test]
    fn test_class_assertion_with_inline_individual() {
        let batch = vec![
            Change::add(Statement::declaration(Entity::individual("http://ex.org#p1"))),
            Change::add(Statement::class_assertion(PIZZA, "http://ex.org#p1")),
        ];
        let summary = ClassAssertionMatcher.describe(&batch).unwrap();
        assert_eq!(summary.text, "Created individual p1 of type Pizza");
    }

    #[test]
    fn test_declaration_matcher_declines_batches() {
        let batch = vec![
            Change::add(Statement::declaration(Entity::class(PIZZA))),
            Change::add(Statement::label(PIZZA, Literal::plain("Pizza"))),
        ];
        assert!(DeclarationMatcher.describe(&batch).is_none());
        assert!(DeclarationMatcher.describe(&batch[..1]).is_some());
    }

    #[test]
    fn test_declaration_removed() {
        let batch = vec![Change::remove(Statement::declaration(Entity::new(
            EntityKind::ObjectProperty,
            "http://ex.org#hasTopping",
        )))];
        let summary = DeclarationMatcher.describe(&batch).unwrap();
        assert_eq!(summary.kind, SummaryKind::EntityDeleted);
        assert_eq!(summary.text, "Deleted object property hasTopping");
    }

    #[test]
    fn test_annotation_added() {
        let batch = vec![Change::add(Statement::label(PIZZA, Literal::plain("Pizza")))];
        let summary = AnnotationAssertionMatcher.describe(&batch).unwrap();
        assert_eq!(summary.text, "Added label \"Pizza\" to Pizza");
    }

    #[test]
    fn test_equivalent_classes() {
        let statement = Statement::EquivalentClasses(vec![
            Iri::new(PIZZA),
            Iri::new("http://ex.org#Pie"),
            Iri::new(FOOD),
        ]);
        let summary = EquivalentClassesMatcher
            .describe(&[Change::add(statement.clone())])
            .unwrap();
        assert_eq!(summary.text, "Made Pizza equivalent to Pie, Food");

        let summary = EquivalentClassesMatcher
            .describe(&[Change::remove(statement)])
            .unwrap();
        assert_eq!(summary.text, "Removed equivalence between Pizza, Pie, Food");
    }

    #[test]
    fn test_property_assertions() {
        let object = Statement::ObjectPropertyAssertion {
            property: Iri::new("http://ex.org#hasTopping"),
            subject: Iri::new("http://ex.org#p1"),
            object: Iri::new("http://ex.org#t1"),
        };
        let summary = ObjectPropertyAssertionMatcher
            .describe(&[Change::add(object)])
            .unwrap();
        assert_eq!(summary.text, "Added hasTopping t1 to p1");

        let data = Statement::DataPropertyAssertion {
            property: Iri::new("http://ex.org#calories"),
            subject: Iri::new("http://ex.org#p1"),
            value: Literal::plain("300"),
        };
        let summary = DataPropertyAssertionMatcher
            .describe(&[Change::remove(data)])
            .unwrap();
        assert_eq!(summary.text, "Removed calories \"300\" from p1");
    }
}
