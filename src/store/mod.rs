//! Revision store: the ordered, concurrently readable history of one document
//!
//! # Usage
//!
//! ```ignore
//! let store = RevisionStore::open(&config);
//! let report = store.load();
//! let revision = store.add_changes(author, changes, "Add pizza toppings")?;
//! let head = store.get_revision(RevisionNumber::HEAD);
//! store.dispose();
//! ```

mod errors;
mod persistence;
mod revision_store;

pub use errors::{StoreError, StoreResult};
pub use persistence::PersistenceWorker;
pub use revision_store::{LoadReport, RevisionStore};
