//! Data models for grove entities.
//!
//! This module defines the core data structure:
//! - `TaskNode` - A single task with its ordered sub-tasks

use serde::{Deserialize, Serialize};

/// A single task in the forest.
///
/// A node owns its sub-tasks exclusively and appears in exactly one place:
/// the root list or one parent's `children`. Parentage is never stored on
/// the node - it is derived by traversal, so no back-references can go
/// stale when a node is moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskNode {
    /// Unique identifier (e.g., "gv-3fa2c1"), fixed for the node's lifetime
    pub id: String,

    /// Task label, non-empty after trimming
    pub label: String,

    /// Whether the task is marked complete
    #[serde(default)]
    pub completed: bool,

    /// Sub-tasks in stored order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TaskNode>,
}

impl TaskNode {
    /// Create a new incomplete task with no sub-tasks.
    pub fn new(id: String, label: String) -> Self {
        Self {
            id,
            label,
            completed: false,
            children: Vec::new(),
        }
    }

    /// Whether this task has sub-tasks.
    ///
    /// Presentation layers use this to decide whether a node gets an
    /// expand/collapse affordance.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Number of nodes in this subtree, counting the node itself.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(TaskNode::subtree_len)
            .sum::<usize>()
    }
}
