//! Linear snapshot history.
//!
//! Every user-visible edit goes through [`History::record_update`]: the
//! current [`Project`] is cloned (cheaply, see [`crate::doc`]), the mutation
//! is applied to the draft, and the draft becomes a new entry. Entries that
//! were recorded are never mutated afterwards, except that the entry a live
//! gesture created may be amended in place while that gesture continues.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::sync::Arc;

use tracing::debug;

use crate::doc::Project;
use crate::error::EditError;

/// Ordered project snapshots plus a cursor. The cursor always indexes a
/// valid entry.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Arc<Project>>,
    cursor: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Project::default())
    }
}

impl History {
    /// History with a single entry.
    #[must_use]
    pub fn new(initial: Project) -> Self {
        Self { entries: vec![Arc::new(initial)], cursor: 0 }
    }

    /// The project currently shown.
    #[must_use]
    pub fn current(&self) -> &Project {
        &self.entries[self.cursor]
    }

    /// Shared handle to the current snapshot, for readers that outlive a borrow.
    #[must_use]
    pub fn current_arc(&self) -> Arc<Project> {
        Arc::clone(&self.entries[self.cursor])
    }

    /// Apply `mutate` to a draft of the current project and push it as a new
    /// entry, discarding any redo entries.
    pub fn record_update(&mut self, mutate: impl FnOnce(&mut Project)) {
        let mut draft = self.current().clone();
        mutate(&mut draft);
        self.push(draft);
    }

    /// Like [`History::record_update`], but nothing is recorded when `mutate`
    /// fails.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `mutate`.
    pub fn try_record_update<T>(
        &mut self,
        mutate: impl FnOnce(&mut Project) -> Result<T, EditError>,
    ) -> Result<T, EditError> {
        let mut draft = self.current().clone();
        let out = mutate(&mut draft)?;
        self.push(draft);
        Ok(out)
    }

    /// Mutate the current entry in place. Used to fold the later frames of a
    /// gesture into the entry its first frame recorded.
    pub fn amend(&mut self, mutate: impl FnOnce(&mut Project)) {
        let entry = &mut self.entries[self.cursor];
        mutate(Arc::make_mut(entry));
    }

    /// Step back one entry. Returns `false` at the oldest entry.
    pub fn undo(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        debug!(cursor = self.cursor, len = self.entries.len(), "history: undo");
        true
    }

    /// Step forward one entry. Returns `false` at the newest entry.
    pub fn redo(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        debug!(cursor = self.cursor, len = self.entries.len(), "history: redo");
        true
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Replace the whole history with a single entry.
    pub fn reset(&mut self, project: Project) {
        self.entries = vec![Arc::new(project)];
        self.cursor = 0;
        debug!("history: reset");
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn push(&mut self, project: Project) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(Arc::new(project));
        self.cursor = self.entries.len() - 1;
        debug!(cursor = self.cursor, "history: record");
    }
}
