//! Linear undo/redo history over forest snapshots.
//!
//! `History` keeps an ordered list of full-forest snapshots with a cursor
//! pointing at the snapshot that matches the live forest. Every successful
//! mutation records the resulting state; undo and redo just move the
//! cursor and hand back the snapshot to restore.
//!
//! Recording after an undo discards the abandoned redo tail, so the
//! history is always a single line, never a branching graph.

use crate::tree::TaskTree;

/// Snapshot-based linear history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    snapshots: Vec<TaskTree>,
    cursor: usize,
}

impl History {
    /// Start a history whose only snapshot is the given state.
    pub fn new(initial: TaskTree) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
        }
    }

    /// Rebuild a history from persisted parts.
    ///
    /// Returns `None` when the parts are unusable: no snapshots at all, or
    /// a cursor pointing past the end.
    pub fn from_parts(snapshots: Vec<TaskTree>, cursor: usize) -> Option<Self> {
        if snapshots.is_empty() || cursor >= snapshots.len() {
            return None;
        }
        Some(Self { snapshots, cursor })
    }

    /// Record the state reached by a successful mutation.
    ///
    /// Entries past the cursor (the redo tail) are dropped first.
    pub fn record(&mut self, state: TaskTree) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(state);
        self.cursor = self.snapshots.len() - 1;
    }

    /// Step back one snapshot, returning the state to restore.
    ///
    /// Returns `None` at the oldest snapshot.
    pub fn undo(&mut self) -> Option<&TaskTree> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.snapshots[self.cursor])
    }

    /// Step forward one snapshot, returning the state to restore.
    ///
    /// Returns `None` at the newest snapshot.
    pub fn redo(&mut self) -> Option<&TaskTree> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.snapshots[self.cursor])
    }

    /// Whether an undo step is available.
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Whether a redo step is available.
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Number of undo steps available from the current position.
    pub fn undo_steps(&self) -> usize {
        self.cursor
    }

    /// Number of redo steps available from the current position.
    pub fn redo_steps(&self) -> usize {
        self.snapshots.len() - 1 - self.cursor
    }

    /// Snapshot the cursor currently points at.
    pub fn current(&self) -> &TaskTree {
        &self.snapshots[self.cursor]
    }

    /// All snapshots, oldest first.
    pub fn snapshots(&self) -> &[TaskTree] {
        &self.snapshots
    }

    /// Cursor position within the snapshot list.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Drop everything except the current snapshot.
    pub fn reset(&mut self) {
        let current = self.snapshots.swap_remove(self.cursor);
        self.snapshots.clear();
        self.snapshots.push(current);
        self.cursor = 0;
    }
}
