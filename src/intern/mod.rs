//! Interning of repeated values during history replay
//!
//! A change history repeats the same statements, authors and descriptions
//! many times. Replay folds structurally-equal values onto one shared
//! `Arc` so that each distinct value is held in memory once.
//!
//! Interners are scoped to a single load: they are created by the replay,
//! consulted for every decoded value, and dropped when the replay returns.
//! There is no process-wide cache and no dedup against revisions appended
//! later.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

use crate::statement::{Iri, Statement};

/// Deduplicating cache mapping a value to its canonical shared instance.
///
/// Interning never fails: a miss simply makes the value canonical.
#[derive(Debug)]
pub struct Interner<T: ?Sized> {
    canonical: HashSet<Arc<T>>,
    lookups: u64,
}

impl<T: ?Sized + Eq + Hash> Interner<T> {
    pub fn new() -> Self {
        Self {
            canonical: HashSet::new(),
            lookups: 0,
        }
    }

    /// Returns the canonical instance equal to `value`, registering `value`
    /// as canonical if none exists yet.
    pub fn intern(&mut self, value: Arc<T>) -> Arc<T> {
        self.lookups += 1;
        if let Some(existing) = self.canonical.get(&*value) {
            return Arc::clone(existing);
        }
        self.canonical.insert(Arc::clone(&value));
        value
    }

    /// Like `intern`, but only allocates on a miss.
    pub fn intern_ref<Q>(&mut self, value: &Q) -> Arc<T>
    where
        Q: ?Sized + Eq + Hash,
        Arc<T>: Borrow<Q> + for<'a> From<&'a Q>,
    {
        self.lookups += 1;
        if let Some(existing) = self.canonical.get(value) {
            return Arc::clone(existing);
        }
        let shared: Arc<T> = Arc::from(value);
        self.canonical.insert(Arc::clone(&shared));
        shared
    }

    /// Number of distinct canonical values
    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }

    /// Number of intern calls served, hits and misses alike
    pub fn lookups(&self) -> u64 {
        self.lookups
    }
}

impl<T: ?Sized + Eq + Hash> Default for Interner<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The interners used by one replay of a change history.
#[derive(Debug, Default)]
pub struct LoadInterners {
    /// IRIs, literal text, descriptions and author names
    pub strings: Interner<str>,
    /// Whole statements
    pub statements: Interner<Statement>,
}

impl LoadInterners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string
    pub fn string(&mut self, value: &str) -> Arc<str> {
        self.strings.intern_ref(value)
    }

    /// Intern an IRI's text
    pub fn iri(&mut self, value: &str) -> Iri {
        Iri::from_shared(self.string(value))
    }

    /// Intern a statement
    pub fn statement(&mut self, statement: Statement) -> Arc<Statement> {
        self.statements.intern(Arc::new(statement))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::Entity;

    #[test]
    fn test_intern_returns_same_instance_for_equal_values() {
        let mut interner: Interner<Statement> = Interner::new();
        let a = interner.intern(Arc::new(Statement::sub_class_of("http://ex.org#A", "http://ex.org#B")));
        let b = interner.intern(Arc::new(Statement::sub_class_of("http://ex.org#A", "http://ex.org#B")));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(interner.len(), 1);
        assert_eq!(interner.lookups(), 2);
    }

    #[test]
    fn test_intern_keeps_distinct_values_apart() {
        let mut interner: Interner<Statement> = Interner::new();
        let a = interner.intern(Arc::new(Statement::declaration(Entity::class("http://ex.org#A"))));
        let b = interner.intern(Arc::new(Statement::declaration(Entity::class("http://ex.org#B"))));
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn test_intern_ref_for_strings() {
        let mut interner: Interner<str> = Interner::new();
        let a = interner.intern_ref("alice");
        let owned = String::from("alice");
        let b = interner.intern_ref(owned.as_str());
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(&*a, "alice");
    }

    #[test]
    fn test_load_interners_share_iri_text() {
        let mut interners = LoadInterners::new();
        let a = interners.iri("http://ex.org#A");
        let b = interners.iri("http://ex.org#A");
        assert!(Arc::ptr_eq(a.as_shared(), b.as_shared()));
    }

    #[test]
    fn test_separate_loads_do_not_share_instances() {
        let mut first = LoadInterners::new();
        let mut second = LoadInterners::new();
        let a = first.string("same");
        let b = second.string("same");
        assert_eq!(a, b);
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
