//! Background persistence of appended revisions
//!
//! A single worker thread drains an ordered queue and appends each revision to
//! the history file, so the file receives revisions in append order. Callers
//! enqueue and return without waiting for the disk.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::log::RevisionLogWriter;
use crate::observability::{log_event, Event};
use crate::revision::Revision;

const WORKER_THREAD_NAME: &str = "change-serializer";

/// Handle to the persistence worker of one store.
pub struct PersistenceWorker {
    sender: Option<UnboundedSender<Arc<Revision>>>,
    handle: Option<JoinHandle<()>>,
}

impl PersistenceWorker {
    /// Starts the worker thread for the history file at `path`.
    pub fn spawn(document_id: Arc<str>, path: PathBuf) -> io::Result<Self> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run(document_id, path, receiver))?;

        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
        })
    }

    /// Queues a revision for writing.
    ///
    /// Hands the revision back if the worker no longer accepts work.
    pub fn submit(&self, revision: Arc<Revision>) -> Result<(), Arc<Revision>> {
        match self.sender {
            Some(ref sender) => sender.send(revision).map_err(|e| e.0),
            None => Err(revision),
        }
    }

    /// Closes the queue and waits for the worker to drain it.
    ///
    /// Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            // A panicking worker has already lost its queue; nothing to recover.
            let _ = handle.join();
        }
    }
}

impl Drop for PersistenceWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run(document_id: Arc<str>, path: PathBuf, mut receiver: UnboundedReceiver<Arc<Revision>>) {
    let mut writer: Option<RevisionLogWriter> = None;
    let mut persisted: u64 = 0;
    let mut failed: u64 = 0;

    while let Some(revision) = receiver.blocking_recv() {
        let number = revision.number().to_string();

        if writer.is_none() {
            match RevisionLogWriter::open(&path) {
                Ok(opened) => writer = Some(opened),
                Err(e) => {
                    failed += 1;
                    log_event(
                        Event::RevisionPersistFailed,
                        &[
                            ("document_id", &*document_id),
                            ("error", &e.to_string()),
                            ("revision", &number),
                        ],
                    );
                    continue;
                }
            }
        }

        let result = match writer.as_mut() {
            Some(w) => w.append(&revision),
            None => continue,
        };

        match result {
            Ok(()) => {
                persisted += 1;
                log_event(
                    Event::RevisionPersisted,
                    &[("document_id", &*document_id), ("revision", &number)],
                );
            }
            Err(e) => {
                failed += 1;
                // Reopen on the next revision in case the handle went bad.
                writer = None;
                log_event(
                    Event::RevisionPersistFailed,
                    &[
                        ("document_id", &*document_id),
                        ("error", &e.to_string()),
                        ("revision", &number),
                    ],
                );
            }
        }
    }

    log_event(
        Event::PersistenceWorkerStopped,
        &[
            ("document_id", &*document_id),
            ("failed", &failed.to_string()),
            ("persisted", &persisted.to_string()),
        ],
    );
}
