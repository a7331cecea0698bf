//! Diff-chain undo history over an externally owned interval collection.
//!
//! Instead of command objects or full snapshots, the history stores the
//! delta (added, removed) between consecutive snapshots the host records.
//! Memory grows with the total edit volume of the session; there is no cap
//! on the number of steps.

use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use log::debug;

use crate::interval::GenomicInterval;

/// Undo history built by diffing successive snapshots.
///
/// Membership tests use value equality (`PartialEq`) over plain lists, so
/// duplicates behave as list membership, not set membership.
#[derive(Debug, Clone)]
pub struct SnapshotUndo<T = GenomicInterval> {
    added: Vec<Vec<T>>,
    removed: Vec<Vec<T>>,
    previous: Option<Vec<T>>,
}

impl<T: Clone + PartialEq> SnapshotUndo<T> {
    pub fn new() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
            previous: None,
        }
    }

    /// Record the collection's current full state.
    ///
    /// The first call diffs against an empty collection, so the baseline can
    /// itself be undone. A snapshot identical to the previous one pushes no
    /// step. The snapshot is copied; later edits to the caller's collection
    /// do not affect the history.
    pub fn record_snapshot(&mut self, current: &[T]) {
        let (to_add, to_del) = match &self.previous {
            None => (current.to_vec(), Vec::new()),
            Some(previous) => (difference(current, previous), difference(previous, current)),
        };

        if to_add.is_empty() && to_del.is_empty() {
            debug!("Snapshot unchanged, no undo step recorded");
        } else {
            debug!(
                "Recorded undo step: +{} -{} (depth {})",
                to_add.len(),
                to_del.len(),
                self.added.len() + 1
            );
            self.added.push(to_add);
            self.removed.push(to_del);
        }

        self.previous = Some(current.to_vec());
    }

    /// Revert the most recent step and return the resulting collection.
    ///
    /// With no step left this is a no-op that returns the current state
    /// (`None` if no snapshot was ever recorded).
    pub fn undo(&mut self) -> Option<&[T]> {
        let (to_del, to_add) = match (self.added.pop(), self.removed.pop()) {
            (Some(to_del), Some(to_add)) => (to_del, to_add),
            _ => return self.previous.as_deref(),
        };

        let previous = self.previous.get_or_insert_with(Vec::new);
        previous.retain(|item| !to_del.contains(item));
        previous.extend(to_add);
        debug!("Undo applied, {} step(s) left", self.added.len());

        self.previous.as_deref()
    }

    /// Drop every recorded step. The last snapshot is kept.
    pub fn clear(&mut self) {
        self.added.clear();
        self.removed.clear();
    }

    /// True iff no snapshot has ever been recorded.
    pub fn is_empty(&self) -> bool {
        self.previous.is_none()
    }

    /// Number of steps that can be undone.
    pub fn depth(&self) -> usize {
        self.added.len()
    }

    /// The last snapshot as modified by any undo calls since.
    pub fn current(&self) -> Option<&[T]> {
        self.previous.as_deref()
    }
}

impl<T: Clone + PartialEq> Default for SnapshotUndo<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Items of `left` not contained in `right`.
fn difference<T: Clone + PartialEq>(left: &[T], right: &[T]) -> Vec<T> {
    left.iter()
        .filter(|item| !right.contains(item))
        .cloned()
        .collect()
}

/// Per-session owner of the single authoritative undo history.
///
/// The history is created on first access. `OnceLock` makes that creation
/// race-free, and the `Mutex` serializes access afterwards.
#[derive(Debug, Default)]
pub struct EditSession {
    history: OnceLock<Mutex<SnapshotUndo<GenomicInterval>>>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock and return the session's undo history.
    pub fn history(&self) -> MutexGuard<'_, SnapshotUndo<GenomicInterval>> {
        self.history
            .get_or_init(|| {
                debug!("Creating undo history for session");
                Mutex::new(SnapshotUndo::new())
            })
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// True once the history has been touched.
    pub fn has_history(&self) -> bool {
        self.history.get().is_some()
    }
}
