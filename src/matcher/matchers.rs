//! Matcher traits
//!
//! A matcher turns a batch of raw changes into one summary or declines.
//! Declining is normal control flow, not an error.

use super::inline::without_inline_declarations;
use super::summary::ChangeSummary;
use crate::statement::{Change, Statement, StatementKind};

/// Anything that can summarise a whole change batch.
pub trait ChangeMatcher: Send + Sync {
    fn describe(&self, batch: &[Change]) -> Option<ChangeSummary>;
}

/// A matcher for single-statement edits of one statement kind.
///
/// The batch must reduce to exactly one add or remove of a statement of
/// `kind()`. Matchers that allow inline declarations first discard the
/// declaration groups of entities created in the same batch.
pub trait StatementMatcher: Send + Sync {
    fn kind(&self) -> StatementKind;

    /// Whether declarations of entities created in the same batch are looked
    /// past when finding the core change
    fn allows_inline_declarations(&self) -> bool {
        false
    }

    /// Summary for an added statement. `batch` is the whole original batch.
    fn describe_added(&self, statement: &Statement, batch: &[Change]) -> Option<ChangeSummary>;

    /// Summary for a removed statement, from that statement alone.
    fn describe_removed(&self, statement: &Statement) -> Option<ChangeSummary>;
}

impl<M: StatementMatcher + ?Sized> ChangeMatcher for M {
    fn describe(&self, batch: &[Change]) -> Option<ChangeSummary> {
        let core = core_change(batch, self.allows_inline_declarations())?;
        let statement = core.statement()?;
        if statement.kind() != self.kind() {
            return None;
        }

        let summary = match core {
            Change::AddStatement(_) => self.describe_added(statement, batch)?,
            Change::RemoveStatement(_) => self.describe_removed(statement)?,
            _ => return None,
        };
        Some(summary.consuming(batch))
    }
}

/// The single change a batch reduces to, if it reduces to one.
fn core_change(batch: &[Change], inline_declarations: bool) -> Option<&Change> {
    if batch.len() == 1 {
        return batch.first();
    }
    if !inline_declarations {
        return None;
    }

    let remaining = without_inline_declarations(batch);
    match remaining.as_slice() {
        [only] => Some(*only),
        _ => None,
    }
}
