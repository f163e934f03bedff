//! In-memory revision history backed by the revision log
//!
//! Readers take a read lock just long enough to clone the current snapshot
//! pointer; every append swaps in a new immutable snapshot under the write
//! lock. A snapshot obtained earlier never changes.
//!
//! Persistence:
//! - The first revision appended to an empty store is written synchronously,
//!   inside the write lock, before the append returns
//! - Every later revision is queued for the single background worker
//! - A failed write is logged; the in-memory append stands

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockWriteGuard};

use chrono::Utc;

use super::errors::{StoreError, StoreResult};
use super::persistence::PersistenceWorker;
use crate::config::StoreConfig;
use crate::intern::LoadInterners;
use crate::log::{append_revision, LogError, RevisionLogReader};
use crate::observability::{log_event, Event, ObservationScope};
use crate::revision::{Revision, RevisionNumber, UserId};
use crate::statement::Change;

type Snapshot = Arc<[Arc<Revision>]>;

/// Outcome of replaying the history file
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Revisions now held in memory
    pub revisions_loaded: usize,
    /// Chunks of unknown type that were stepped over
    pub skipped_chunks: u64,
    /// Why replay stopped early, if it did
    pub error: Option<LogError>,
    /// True when the history file did not exist and its directory was created
    pub created_directories: bool,
}

impl LoadReport {
    /// True when the whole file was replayed
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

enum WorkerState {
    Idle,
    Running(PersistenceWorker),
    Disposed,
}

/// The revision history of one document.
pub struct RevisionStore {
    document_id: Arc<str>,
    history_path: PathBuf,
    revisions: RwLock<Snapshot>,
    worker: Mutex<WorkerState>,
}

impl RevisionStore {
    /// Creates an empty store for the history file at `history_path`.
    ///
    /// Nothing is read until `load` is called.
    pub fn new(document_id: impl Into<Arc<str>>, history_path: impl Into<PathBuf>) -> Self {
        Self {
            document_id: document_id.into(),
            history_path: history_path.into(),
            revisions: RwLock::new(Arc::from(Vec::new())),
            worker: Mutex::new(WorkerState::Idle),
        }
    }

    /// Creates an empty store for the document named by `config`.
    pub fn open(config: &StoreConfig) -> Self {
        Self::new(config.document_id.to_string(), config.history_path())
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn history_path(&self) -> &Path {
        &self.history_path
    }

    fn snapshot(&self) -> Snapshot {
        // The guarded value is only ever replaced whole, so a poisoned lock
        // still holds a consistent snapshot.
        let guard = self.revisions.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, Snapshot> {
        self.revisions.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Looks up a revision by exact number, or the latest one for `HEAD`.
    pub fn get_revision(&self, number: RevisionNumber) -> Option<Arc<Revision>> {
        let revisions = self.snapshot();
        find_revision(&revisions, number).cloned()
    }

    /// The current history, oldest first.
    ///
    /// Later appends do not show up in the returned snapshot.
    pub fn get_revisions(&self) -> Snapshot {
        self.snapshot()
    }

    /// Number of the latest revision, or zero if there is none.
    pub fn get_current_revision_number(&self) -> RevisionNumber {
        current_number(&self.snapshot())
    }

    /// Revisions numbered strictly after `number`, oldest first.
    pub fn get_revisions_after(&self, number: RevisionNumber) -> Vec<Arc<Revision>> {
        let revisions = self.snapshot();
        let start = revisions.partition_point(|r| r.number() <= number);
        revisions[start..].to_vec()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Appends a revision.
    ///
    /// # Errors
    ///
    /// - `OrderingViolation` if its number is not greater than the current one
    /// - `HeadNotAppendable` if its number is the `HEAD` sentinel
    ///
    /// A failed append leaves the history untouched. Persistence failures are
    /// logged and never reported here.
    pub fn add_revision(&self, revision: Revision) -> StoreResult<Arc<Revision>> {
        let mut guard = self.write_guard();
        check_appendable(revision.number(), current_number(&guard))?;

        let revision = Arc::new(revision);
        self.append_locked(&mut guard, Arc::clone(&revision));
        Ok(revision)
    }

    /// Appends a batch of changes as the next revision, stamped now.
    ///
    /// # Errors
    ///
    /// `OrderingViolation` once the numbering is exhausted and no greater
    /// number is left to assign.
    pub fn add_changes(
        &self,
        author: UserId,
        changes: Vec<Change>,
        description: impl Into<Arc<str>>,
    ) -> StoreResult<Arc<Revision>> {
        let mut guard = self.write_guard();
        let current = current_number(&guard);
        let number = current.next();
        check_appendable(number, current)?;

        let revision = Arc::new(Revision::new(
            author,
            number,
            changes,
            Utc::now(),
            description,
        ));
        self.append_locked(&mut guard, Arc::clone(&revision));
        Ok(revision)
    }

    fn append_locked(&self, guard: &mut RwLockWriteGuard<'_, Snapshot>, revision: Arc<Revision>) {
        let was_empty = guard.is_empty();

        let mut next: Vec<Arc<Revision>> = Vec::with_capacity(guard.len() + 1);
        next.extend(guard.iter().cloned());
        next.push(Arc::clone(&revision));
        **guard = Arc::from(next);

        if was_empty {
            self.persist_now(&revision);
        } else {
            self.persist_later(revision);
        }
    }

    fn persist_now(&self, revision: &Revision) {
        let number = revision.number().to_string();

        if self.is_disposed() {
            self.log_skipped(&number);
            return;
        }

        match append_revision(&self.history_path, revision) {
            Ok(()) => log_event(
                Event::FirstRevisionPersisted,
                &[("document_id", self.document_id()), ("revision", &number)],
            ),
            Err(e) => log_event(
                Event::RevisionPersistFailed,
                &[
                    ("document_id", self.document_id()),
                    ("error", &e.to_string()),
                    ("revision", &number),
                ],
            ),
        }
    }

    fn persist_later(&self, revision: Arc<Revision>) {
        let number = revision.number().to_string();
        let mut state = self.worker.lock().unwrap_or_else(PoisonError::into_inner);

        if matches!(*state, WorkerState::Idle) {
            match PersistenceWorker::spawn(Arc::clone(&self.document_id), self.history_path.clone())
            {
                Ok(worker) => *state = WorkerState::Running(worker),
                Err(e) => {
                    log_event(
                        Event::RevisionPersistFailed,
                        &[
                            ("document_id", self.document_id()),
                            ("error", &format!("failed to start persistence worker: {}", e)),
                            ("revision", &number),
                        ],
                    );
                    return;
                }
            }
        }

        match *state {
            WorkerState::Running(ref worker) => match worker.submit(revision) {
                Ok(()) => log_event(
                    Event::RevisionQueued,
                    &[("document_id", self.document_id()), ("revision", &number)],
                ),
                Err(_) => self.log_skipped(&number),
            },
            WorkerState::Idle | WorkerState::Disposed => self.log_skipped(&number),
        }
    }

    fn log_skipped(&self, number: &str) {
        log_event(
            Event::RevisionPersistSkipped,
            &[
                ("document_id", self.document_id()),
                ("reason", "store disposed"),
                ("revision", number),
            ],
        );
    }

    fn is_disposed(&self) -> bool {
        let state = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
        matches!(*state, WorkerState::Disposed)
    }

    /// Replays the history file into memory, replacing the current history.
    ///
    /// A missing file is a new document: its directory is created and the
    /// store stays empty. A corrupt chunk stops the replay; revisions read
    /// before it are kept. Neither case is an error.
    pub fn load(&self) -> LoadReport {
        let mut guard = self.write_guard();
        let mut report = LoadReport::default();

        if !self.history_path.exists() {
            if let Some(parent) = self.history_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    match fs::create_dir_all(parent) {
                        Ok(()) => {
                            report.created_directories = true;
                            log_event(
                                Event::HistoryDirCreated,
                                &[
                                    ("document_id", self.document_id()),
                                    ("path", &parent.display().to_string()),
                                ],
                            );
                        }
                        Err(e) => log_event(
                            Event::HistoryLoadFailed,
                            &[
                                ("document_id", self.document_id()),
                                ("error", &e.to_string()),
                                ("path", &parent.display().to_string()),
                            ],
                        ),
                    }
                }
            }
            *guard = Arc::from(Vec::new());
            return report;
        }

        let path = self.history_path.display().to_string();
        let scope = ObservationScope::with_fields(
            "HISTORY_LOAD",
            &[("document_id", self.document_id()), ("path", &path)],
        );

        let mut interners = LoadInterners::new();
        let mut revisions: Vec<Arc<Revision>> = Vec::new();

        match RevisionLogReader::open(&self.history_path)
            .map(|reader| reader.for_document(Arc::clone(&self.document_id)))
        {
            Ok(mut reader) => {
                loop {
                    match reader.read_next(&mut interners) {
                        Ok(Some(revision)) => {
                            let previous = revisions
                                .last()
                                .map(|r| r.number())
                                .unwrap_or(RevisionNumber::ZERO);
                            if revision.number() <= previous || revision.number().is_head() {
                                report.error = Some(LogError::corruption_at_revision(
                                    revision.number().value(),
                                    format!(
                                        "Revision number does not follow previous revision {}",
                                        previous.value()
                                    ),
                                ));
                                break;
                            }
                            revisions.push(Arc::new(revision));
                        }
                        Ok(None) => break,
                        Err(e) => {
                            report.error = Some(e);
                            break;
                        }
                    }
                }
                report.skipped_chunks = reader.skipped_chunks();
            }
            Err(e) => report.error = Some(e),
        }

        report.revisions_loaded = revisions.len();
        *guard = Arc::from(revisions);
        drop(guard);

        let loaded = report.revisions_loaded.to_string();
        let skipped = report.skipped_chunks.to_string();
        let statements = interners.statements.len().to_string();
        let fields = [
            ("revisions", loaded.as_str()),
            ("skipped_chunks", skipped.as_str()),
            ("unique_statements", statements.as_str()),
        ];
        match report.error {
            Some(ref e) => scope.fail_with_fields(&e.to_string(), &fields),
            None => scope.complete_with_fields(&fields),
        }

        report
    }

    /// Stops accepting background persistence work.
    ///
    /// Revisions already queued are written before this returns. The history
    /// stays readable. Calling it again does nothing.
    pub fn dispose(&self) {
        let previous = {
            let mut state = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
            if matches!(*state, WorkerState::Disposed) {
                return;
            }
            std::mem::replace(&mut *state, WorkerState::Disposed)
        };

        if let WorkerState::Running(mut worker) = previous {
            worker.shutdown();
        }

        log_event(Event::StoreDisposed, &[("document_id", self.document_id())]);
    }
}

impl Drop for RevisionStore {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// A revision numbered `number` may follow `current`.
fn check_appendable(number: RevisionNumber, current: RevisionNumber) -> StoreResult<()> {
    if number.is_head() {
        return Err(StoreError::HeadNotAppendable);
    }
    if number <= current {
        return Err(StoreError::ordering_violation(number, current));
    }
    Ok(())
}

fn current_number(revisions: &[Arc<Revision>]) -> RevisionNumber {
    revisions
        .last()
        .map(|r| r.number())
        .unwrap_or(RevisionNumber::ZERO)
}

/// Exact-match lookup over a history sorted by revision number.
fn find_revision(revisions: &[Arc<Revision>], number: RevisionNumber) -> Option<&Arc<Revision>> {
    let first = revisions.first()?;
    let last = revisions.last()?;

    if number.is_head() {
        return Some(last);
    }
    if number < first.number() {
        return None;
    }
    if number == last.number() {
        return Some(last);
    }

    revisions
        .binary_search_by(|r| r.number().cmp(&number))
        .ok()
        .map(|index| &revisions[index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::read_all;
    use crate::statement::{Entity, Statement};
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn revision(number: u64) -> Revision {
        Revision::new(
            UserId::new("dave"),
            RevisionNumber::new(number),
            vec![Change::add(Statement::declaration(Entity::class(format!(
                "http://ex.org#C{}",
                number
            ))))],
            Utc.timestamp_millis_opt(1_700_000_000_000 + number as i64).unwrap(),
            format!("revision {}", number),
        )
    }

    fn new_store(temp_dir: &TempDir) -> RevisionStore {
        RevisionStore::new("doc-1", temp_dir.path().join("change-data").join("history.binary"))
    }

    #[test]
    fn test_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = new_store(&temp_dir);

        assert!(store.is_empty());
        assert_eq!(store.get_current_revision_number(), RevisionNumber::ZERO);
        assert!(store.get_revision(RevisionNumber::HEAD).is_none());
        assert!(store.get_revision(RevisionNumber::new(1)).is_none());
    }

    #[test]
    fn test_lookup_exact_match_only() {
        let temp_dir = TempDir::new().unwrap();
        let store = new_store(&temp_dir);
        for n in [2, 4, 6, 8] {
            store.add_revision(revision(n)).unwrap();
        }

        assert_eq!(store.get_revision(RevisionNumber::new(4)).unwrap().number().value(), 4);
        assert_eq!(store.get_revision(RevisionNumber::new(8)).unwrap().number().value(), 8);
        assert!(store.get_revision(RevisionNumber::new(1)).is_none());
        assert!(store.get_revision(RevisionNumber::new(5)).is_none());
        assert!(store.get_revision(RevisionNumber::new(9)).is_none());
        assert_eq!(store.get_revision(RevisionNumber::HEAD).unwrap().number().value(), 8);
    }

    #[test]
    fn test_ordering_violation_leaves_history_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let store = new_store(&temp_dir);
        store.add_revision(revision(1)).unwrap();
        store.add_revision(revision(2)).unwrap();
        let before = store.get_revisions();

        let err = store.add_revision(revision(2)).unwrap_err();
        assert_eq!(err, StoreError::OrderingViolation { attempted: 2, current: 2 });
        assert!(store.add_revision(revision(1)).is_err());

        assert_eq!(store.get_revisions(), before);
    }

    #[test]
    fn test_head_cannot_be_appended() {
        let temp_dir = TempDir::new().unwrap();
        let store = new_store(&temp_dir);
        let head = Revision::new(UserId::guest(), RevisionNumber::HEAD, Vec::new(), Utc::now(), "");
        assert_eq!(store.add_revision(head).unwrap_err(), StoreError::HeadNotAppendable);
        assert!(store.is_empty());
    }

    #[test]
    fn test_snapshot_unaffected_by_later_appends() {
        let temp_dir = TempDir::new().unwrap();
        let store = new_store(&temp_dir);
        store.add_revision(revision(1)).unwrap();

        let snapshot = store.get_revisions();
        store.add_revision(revision(2)).unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.get_revisions().len(), 2);
    }

    #[test]
    fn test_add_changes_assigns_next_number() {
        let temp_dir = TempDir::new().unwrap();
        let store = new_store(&temp_dir);
        store.add_revision(revision(5)).unwrap();

        let added = store
            .add_changes(UserId::new("erin"), Vec::new(), "next")
            .unwrap();
        assert_eq!(added.number().value(), 6);
        assert_eq!(added.author().as_str(), "erin");
        assert_eq!(store.get_current_revision_number().value(), 6);
    }

    #[test]
    fn test_revisions_after() {
        let temp_dir = TempDir::new().unwrap();
        let store = new_store(&temp_dir);
        for n in 1..=5 {
            store.add_revision(revision(n)).unwrap();
        }

        let after: Vec<u64> = store
            .get_revisions_after(RevisionNumber::new(3))
            .iter()
            .map(|r| r.number().value())
            .collect();
        assert_eq!(after, vec![4, 5]);
        assert!(store.get_revisions_after(RevisionNumber::new(5)).is_empty());
        assert_eq!(store.get_revisions_after(RevisionNumber::ZERO).len(), 5);
    }

    #[test]
    fn test_first_revision_is_on_disk_before_return() {
        let temp_dir = TempDir::new().unwrap();
        let store = new_store(&temp_dir);
        store.add_revision(revision(1)).unwrap();

        let on_disk = read_all(store.history_path()).unwrap();
        assert_eq!(on_disk, vec![revision(1)]);
    }

    #[test]
    fn test_dispose_drains_queue() {
        let temp_dir = TempDir::new().unwrap();
        let store = new_store(&temp_dir);
        for n in 1..=10 {
            store.add_revision(revision(n)).unwrap();
        }
        store.dispose();
        store.dispose();

        assert_eq!(read_all(store.history_path()).unwrap().len(), 10);
    }

    #[test]
    fn test_append_after_dispose_stays_in_memory() {
        let temp_dir = TempDir::new().unwrap();
        let store = new_store(&temp_dir);
        store.add_revision(revision(1)).unwrap();
        store.dispose();

        store.add_revision(revision(2)).unwrap();
        assert_eq!(store.get_current_revision_number().value(), 2);
        assert_eq!(read_all(store.history_path()).unwrap().len(), 1);
    }

    #[test]
    fn test_load_missing_file_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = new_store(&temp_dir);

        let report = store.load();
        assert!(report.created_directories);
        assert!(report.is_complete());
        assert_eq!(report.revisions_loaded, 0);
        assert!(temp_dir.path().join("change-data").is_dir());
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        {
            let store = new_store(&temp_dir);
            for n in 1..=4 {
                store.add_revision(revision(n)).unwrap();
            }
        }

        let reloaded = new_store(&temp_dir);
        let report = reloaded.load();
        assert!(report.is_complete());
        assert_eq!(report.revisions_loaded, 4);

        let expected: Vec<Revision> = (1..=4).map(revision).collect();
        let actual: Vec<Revision> = reloaded.get_revisions().iter().map(|r| (**r).clone()).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_find_revision_fast_path_and_search() {
        let revisions: Vec<Arc<Revision>> = (1..=100).map(|n| Arc::new(revision(n))).collect();
        assert_eq!(find_revision(&revisions, RevisionNumber::new(100)).unwrap().number().value(), 100);
        assert_eq!(find_revision(&revisions, RevisionNumber::new(37)).unwrap().number().value(), 37);
        assert!(find_revision(&revisions, RevisionNumber::ZERO).is_none());
        assert!(find_revision(&[], RevisionNumber::HEAD).is_none());
    }
}
