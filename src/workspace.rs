//! Workspace facade coupling the live forest to its history.
//!
//! Commands never touch `TaskTree` and `History` separately; the
//! workspace funnels every mutation so that:
//! - History records the resulting state only when the mutation succeeds
//! - Failed operations leave forest, history, and revision untouched
//! - Undo and redo restore snapshots wholesale
//!
//! The revision counter is a coarse change signal: it bumps on every
//! state change (mutations, undo, redo) and on nothing else, so callers
//! can tell whether anything needs to be re-rendered or re-saved.

use crate::history::History;
use crate::models::TaskNode;
use crate::tree::TaskTree;
use crate::Result;

/// A task forest with its undo history and a change counter.
#[derive(Debug, Clone)]
pub struct Workspace {
    tree: TaskTree,
    history: History,
    revision: u64,
}

impl Workspace {
    /// Open a workspace over a forest with no prior history.
    pub fn new(tree: TaskTree) -> Self {
        let history = History::new(tree.clone());
        Self {
            tree,
            history,
            revision: 0,
        }
    }

    /// Open a workspace over a forest and a previously saved history.
    ///
    /// When the saved history does not end at the loaded forest (the two
    /// files were written out of step), the forest wins: its state is
    /// recorded on top so earlier snapshots stay reachable via undo.
    pub fn from_parts(tree: TaskTree, mut history: History) -> Self {
        if history.current() != &tree {
            history.record(tree.clone());
        }
        Self {
            tree,
            history,
            revision: 0,
        }
    }

    /// The live forest.
    pub fn tree(&self) -> &TaskTree {
        &self.tree
    }

    /// The undo history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Monotonic counter bumped on every state change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Create a task, returning its id.
    pub fn add_task(&mut self, label: &str, parent: Option<&str>) -> Result<String> {
        let id = self.tree.add_task(label, parent)?;
        self.commit();
        Ok(id)
    }

    /// Rename a task, returning the previous label.
    pub fn rename_task(&mut self, id: &str, new_label: &str) -> Result<String> {
        let previous = self.tree.rename_task(id, new_label)?;
        self.commit();
        Ok(previous)
    }

    /// Flip a task's completion state, returning the new state.
    pub fn toggle_task(&mut self, id: &str) -> Result<bool> {
        let completed = self.tree.toggle_task(id)?;
        self.commit();
        Ok(completed)
    }

    /// Delete a task with its subtree, returning the detached node.
    pub fn delete_task(&mut self, id: &str) -> Result<TaskNode> {
        let removed = self.tree.delete_task(id)?;
        self.commit();
        Ok(removed)
    }

    /// Reparent a task. A move to the current parent reports `false` and
    /// records nothing.
    pub fn move_task(&mut self, id: &str, new_parent: Option<&str>) -> Result<bool> {
        let moved = self.tree.move_task(id, new_parent)?;
        if moved {
            self.commit();
        }
        Ok(moved)
    }

    /// Step back one mutation. Returns `false` when there is nothing to
    /// undo; the forest is untouched in that case.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.tree = snapshot.clone();
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    /// Step forward one undone mutation. Returns `false` when there is
    /// nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.tree = snapshot.clone();
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    /// Drop all undo/redo steps, keeping the current forest.
    pub fn clear_history(&mut self) {
        self.history.reset();
    }

    fn commit(&mut self) {
        self.history.record(self.tree.clone());
        self.revision += 1;
    }
}
