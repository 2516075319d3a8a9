//! Linear snapshot history with undo/redo.
//!
//! The manager only tracks the stack and cursor. Applying the cursor to the
//! raster (and sequencing asynchronous restores) is done by
//! [`restore::RestoreSequencer`] on behalf of the input state.

pub mod restore;
pub mod snapshot;

pub use restore::{
    RestoreCompletion, RestoreFailed, RestoreMode, RestoreOutcome, RestoreRequest,
    RestoreSequencer, RestoreWorker, RestoredFrame,
};
pub use snapshot::Snapshot;

/// Ordered log of full-surface snapshots plus a cursor.
///
/// `index() == -1` is the implicit empty canvas; it has no stack entry.
/// Entries above the cursor are redo states and are dropped by the next
/// [`record`](Self::record).
#[derive(Debug, Default)]
pub struct HistoryManager {
    stack: Vec<Snapshot>,
    /// Number of entries at or below the cursor (`index + 1`).
    applied: usize,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a committed state, discarding any redo branch.
    pub fn record(&mut self, snapshot: Snapshot) {
        self.stack.truncate(self.applied);
        self.stack.push(snapshot);
        self.applied = self.stack.len();
        log::debug!(
            "History record: index={} len={}",
            self.index(),
            self.stack.len()
        );
    }

    /// Steps the cursor back. Returns false at the empty state.
    pub fn undo(&mut self) -> bool {
        if self.applied == 0 {
            return false;
        }
        self.applied -= 1;
        true
    }

    /// Steps the cursor forward. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        if self.applied >= self.stack.len() {
            return false;
        }
        self.applied += 1;
        true
    }

    /// Empties the stack and returns to the empty state.
    pub fn clear(&mut self) {
        self.stack.clear();
        self.applied = 0;
    }

    /// Cursor position in `[-1, len - 1]`.
    pub fn index(&self) -> isize {
        self.applied as isize - 1
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    pub fn can_redo(&self) -> bool {
        self.applied < self.stack.len()
    }

    /// Snapshot under the cursor, or `None` for the empty state.
    pub fn current(&self) -> Option<&Snapshot> {
        self.applied.checked_sub(1).and_then(|i| self.stack.get(i))
    }

    /// Total encoded bytes held by the stack.
    pub fn memory_bytes(&self) -> usize {
        self.stack.iter().map(Snapshot::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::PixelFrame;

    fn snapshot(fill: u8) -> Snapshot {
        Snapshot::encode(&PixelFrame::from_raw(2, 2, 8, vec![fill; 16]).unwrap()).unwrap()
    }

    #[test]
    fn starts_at_empty_state() {
        let history = HistoryManager::new();
        assert_eq!(history.index(), -1);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.current().is_none());
    }

    #[test]
    fn undo_steps_back_to_empty_state() {
        let mut history = HistoryManager::new();
        history.record(snapshot(1));
        history.record(snapshot(2));
        assert_eq!(history.index(), 1);

        assert!(history.undo());
        assert_eq!(history.index(), 0);
        assert_eq!(history.current(), Some(&snapshot(1)));

        assert!(history.undo());
        assert_eq!(history.index(), -1);
        assert!(history.current().is_none());

        assert!(!history.undo());
        assert_eq!(history.index(), -1);
    }

    #[test]
    fn redo_is_noop_at_top() {
        let mut history = HistoryManager::new();
        history.record(snapshot(1));
        assert!(!history.redo());
        history.undo();
        assert!(history.redo());
        assert_eq!(history.index(), 0);
        assert!(!history.redo());
    }

    #[test]
    fn record_truncates_redo_branch() {
        let mut history = HistoryManager::new();
        history.record(snapshot(1));
        history.record(snapshot(2));
        history.record(snapshot(3));
        history.undo();
        history.undo();
        assert!(history.can_redo());

        history.record(snapshot(9));
        assert_eq!(history.len(), 2);
        assert_eq!(history.index(), 1);
        assert!(!history.can_redo());
        assert!(!history.redo());
        assert_eq!(history.current(), Some(&snapshot(9)));
    }

    #[test]
    fn record_from_empty_state_replaces_everything() {
        let mut history = HistoryManager::new();
        history.record(snapshot(1));
        history.undo();
        history.record(snapshot(5));
        assert_eq!(history.len(), 1);
        assert_eq!(history.index(), 0);
    }

    #[test]
    fn clear_resets_cursor() {
        let mut history = HistoryManager::new();
        history.record(snapshot(1));
        history.record(snapshot(2));
        history.clear();
        assert_eq!(history.index(), -1);
        assert!(history.is_empty());
        assert!(!history.can_redo());
        assert_eq!(history.memory_bytes(), 0);
    }
}
