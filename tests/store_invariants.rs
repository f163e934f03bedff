//! Revision Store Invariant Tests
//!
//! Tests for:
//! - Monotonic numbering and exact lookup
//! - Rejected appends leave the history untouched
//! - HEAD resolves to the latest revision
//! - The first revision is durable before the append returns
//! - Readers never observe a partially applied append

use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use chrono::{TimeZone, Utc};
use revstore::log::read_all;
use revstore::revision::{Revision, RevisionNumber, UserId};
use revstore::statement::{Change, Entity, Literal, Statement};
use revstore::store::{RevisionStore, StoreError};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn create_temp_data_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

fn create_store(temp_dir: &TempDir) -> RevisionStore {
    RevisionStore::new(
        "test-document",
        temp_dir
            .path()
            .join("documents")
            .join("test-document")
            .join("change-data")
            .join("change-data.binary"),
    )
}

fn create_revision(number: u64) -> Revision {
    let class = format!("http://example.org/pizza#Pizza{}", number);
    Revision::new(
        UserId::new("alice"),
        RevisionNumber::new(number),
        vec![
            Change::add(Statement::declaration(Entity::class(class.as_str()))),
            Change::add(Statement::label(class.as_str(), Literal::plain(format!("Pizza {}", number)))),
        ],
        Utc.timestamp_millis_opt(1_700_000_000_000 + number as i64 * 1_000)
            .unwrap(),
        format!("Create pizza {}", number),
    )
}

// =============================================================================
// Monotonic Numbering
// =============================================================================

/// Current number tracks the last append and every appended number is
/// retrievable exactly.
#[test]
fn test_every_appended_revision_is_retrievable() {
    let temp_dir = create_temp_data_dir();
    let store = create_store(&temp_dir);

    let numbers = [1u64, 2, 3, 5, 8, 13, 21, 34];
    for &n in &numbers {
        store.add_revision(create_revision(n)).expect("increasing append must succeed");
        assert_eq!(store.get_current_revision_number().value(), n);
    }

    for &n in &numbers {
        let found = store
            .get_revision(RevisionNumber::new(n))
            .expect("appended revision must be found");
        assert_eq!(*found, create_revision(n));
    }

    // Gaps are not filled in
    assert!(store.get_revision(RevisionNumber::new(4)).is_none());
    assert!(store.get_revision(RevisionNumber::new(35)).is_none());
    store.dispose();
}

/// Appending a number at or below the current one fails and changes nothing.
#[test]
fn test_ordering_violation_never_mutates_state() {
    let temp_dir = create_temp_data_dir();
    let store = create_store(&temp_dir);
    for n in 1..=3 {
        store.add_revision(create_revision(n)).unwrap();
    }

    let before = store.get_revisions();
    for n in [0, 1, 3] {
        let err = store.add_revision(create_revision(n)).unwrap_err();
        assert_eq!(err, StoreError::OrderingViolation { attempted: n, current: 3 });
        assert_eq!(store.get_revisions(), before);
    }
    assert_eq!(store.get_current_revision_number().value(), 3);
}

/// add_changes refuses to reuse a number once no greater one is left.
#[test]
fn test_add_changes_never_repeats_a_number() {
    let temp_dir = create_temp_data_dir();
    let store = create_store(&temp_dir);
    let last = u64::MAX - 1;
    store.add_revision(create_revision(last)).unwrap();

    let err = store
        .add_changes(UserId::new("bob"), Vec::new(), "one too many")
        .unwrap_err();
    assert_eq!(err, StoreError::OrderingViolation { attempted: last, current: last });

    let numbers: Vec<u64> = store.get_revisions().iter().map(|r| r.number().value()).collect();
    assert_eq!(numbers, vec![last]);
}

// =============================================================================
// HEAD Resolution
// =============================================================================

/// HEAD is none on an empty store and the last revision otherwise.
#[test]
fn test_head_equals_last_revision() {
    let temp_dir = create_temp_data_dir();
    let store = create_store(&temp_dir);
    assert!(store.get_revision(RevisionNumber::HEAD).is_none());

    for n in 1..=5 {
        store.add_revision(create_revision(n)).unwrap();
        let head = store.get_revision(RevisionNumber::HEAD).unwrap();
        let revisions = store.get_revisions();
        assert!(Arc::ptr_eq(&head, revisions.last().unwrap()));
    }
}

// =============================================================================
// First-Revision Durability
// =============================================================================

/// The first revision is on disk before add_revision returns: a second store
/// loading the same file sees it while the first store is still alive.
#[test]
fn test_first_revision_persisted_synchronously() {
    let temp_dir = create_temp_data_dir();
    let store = create_store(&temp_dir);
    store.add_revision(create_revision(1)).unwrap();

    let second = create_store(&temp_dir);
    let report = second.load();
    assert!(report.is_complete());
    assert_eq!(report.revisions_loaded, 1);
    assert_eq!(*second.get_revision(RevisionNumber::new(1)).unwrap(), create_revision(1));

    drop(second);
    drop(store);
}

/// The trigger is an empty store, not revision number 1.
#[test]
fn test_first_append_synchronous_even_above_one() {
    let temp_dir = create_temp_data_dir();
    let store = create_store(&temp_dir);
    store.add_revision(create_revision(40)).unwrap();

    let on_disk = read_all(store.history_path()).unwrap();
    assert_eq!(on_disk.len(), 1);
    assert_eq!(on_disk[0].number().value(), 40);
}

/// Later revisions are written by the background worker, in order.
#[test]
fn test_background_persistence_preserves_order() {
    let temp_dir = create_temp_data_dir();
    let store = create_store(&temp_dir);
    for n in 1..=50 {
        store.add_revision(create_revision(n)).unwrap();
    }
    store.dispose();

    let numbers: Vec<u64> = read_all(store.history_path())
        .unwrap()
        .iter()
        .map(|r| r.number().value())
        .collect();
    assert_eq!(numbers, (1..=50).collect::<Vec<_>>());
}

// =============================================================================
// Persistence Failures
// =============================================================================

/// A history path that cannot be written loses durability, not revisions:
/// the synchronous first write and the background writes both fail, and every
/// append still succeeds in memory.
#[test]
fn test_failed_persistence_keeps_in_memory_history() {
    let temp_dir = create_temp_data_dir();
    let store = create_store(&temp_dir);
    fs::create_dir_all(store.history_path()).expect("Failed to block history path");

    let first = store.add_revision(create_revision(1));
    assert!(first.is_ok());
    assert_eq!(store.get_current_revision_number().value(), 1);

    for n in 2..=4 {
        store.add_revision(create_revision(n)).expect("append must not fail on I/O");
    }
    store.dispose();

    assert_eq!(store.get_current_revision_number().value(), 4);
    assert_eq!(*store.get_revision(RevisionNumber::new(3)).unwrap(), create_revision(3));
    assert!(store.history_path().is_dir());
}

/// A failed background write does not roll back the append that queued it,
/// and the worker keeps going for later revisions.
#[test]
fn test_failed_background_write_is_not_rolled_back() {
    let temp_dir = create_temp_data_dir();
    let store = create_store(&temp_dir);
    store.add_revision(create_revision(1)).unwrap();

    // Replace the history file with a directory so the worker cannot open it.
    fs::remove_file(store.history_path()).unwrap();
    fs::create_dir(store.history_path()).unwrap();

    store.add_revision(create_revision(2)).unwrap();
    store.add_revision(create_revision(3)).unwrap();
    store.dispose();

    let numbers: Vec<u64> = store.get_revisions().iter().map(|r| r.number().value()).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}

// =============================================================================
// Snapshot Isolation
// =============================================================================

/// Concurrent readers see either the old or the new history, never a torn
/// one: every snapshot is a gap-free prefix 1..=k.
#[test]
fn test_concurrent_readers_never_see_torn_history() {
    let temp_dir = create_temp_data_dir();
    let store = Arc::new(create_store(&temp_dir));
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut observations = 0u64;
                while !done.load(Ordering::Acquire) {
                    let snapshot = store.get_revisions();
                    for (i, revision) in snapshot.iter().enumerate() {
                        assert_eq!(revision.number().value(), i as u64 + 1);
                    }
                    let current = store.get_current_revision_number().value();
                    assert!(current >= snapshot.len() as u64);
                    if let Some(head) = store.get_revision(RevisionNumber::HEAD) {
                        assert!(head.number().value() >= snapshot.len() as u64);
                    }
                    observations += 1;
                }
                observations
            })
        })
        .collect();

    for n in 1..=200 {
        store.add_revision(create_revision(n)).unwrap();
    }
    done.store(true, Ordering::Release);

    for reader in readers {
        let observations = reader.join().expect("reader panicked");
        assert!(observations > 0);
    }
    assert_eq!(store.len(), 200);
}

/// Concurrent add_changes calls get distinct consecutive numbers.
#[test]
fn test_concurrent_add_changes_assigns_unique_numbers() {
    let temp_dir = create_temp_data_dir();
    let store = Arc::new(create_store(&temp_dir));

    let writers: Vec<_> = (0..4)
        .map(|w| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..25 {
                    store.add_changes(
                        UserId::new(format!("writer-{}", w)),
                        vec![Change::add(Statement::declaration(Entity::class(
                            format!("http://example.org#W{}I{}", w, i).as_str(),
                        )))],
                        "concurrent edit",
                    )
                    .expect("numbering is not exhausted");
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    let numbers: Vec<u64> = store.get_revisions().iter().map(|r| r.number().value()).collect();
    assert_eq!(numbers, (1..=100).collect::<Vec<_>>());
}
