//! Ordered forest of tasks and the mutations over it.
//!
//! `TaskTree` owns the root-level tasks and implements every structural
//! operation the CLI exposes:
//! - Create, rename, toggle, and delete (subtree included)
//! - Reparenting moves with cycle rejection
//! - Ancestor-path lookup for revealing a deeply nested task
//!
//! All operations validate before touching the forest, so a failed call
//! leaves the tree exactly as it was.

use sha2::{Digest, Sha256};

use crate::models::TaskNode;
use crate::{Error, Result};

/// Prefix for generated task ids.
const ID_PREFIX: &str = "gv";

/// An ordered forest of tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskTree {
    roots: Vec<TaskNode>,
}

impl TaskTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self { roots: Vec::new() }
    }

    /// Build a tree from already-loaded root tasks.
    pub fn from_roots(roots: Vec<TaskNode>) -> Self {
        Self { roots }
    }

    /// Root-level tasks in stored order.
    pub fn roots(&self) -> &[TaskNode] {
        &self.roots
    }

    /// Consume the tree, yielding the root tasks for serialization.
    pub fn into_roots(self) -> Vec<TaskNode> {
        self.roots
    }

    /// Total number of tasks in the forest.
    pub fn len(&self) -> usize {
        self.roots.iter().map(TaskNode::subtree_len).sum()
    }

    /// Whether the forest holds no tasks at all.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Whether a task with this id exists anywhere in the forest.
    pub fn contains(&self, id: &str) -> bool {
        find_in(&self.roots, id).is_some()
    }

    /// Find a task by id.
    pub fn find(&self, id: &str) -> Option<&TaskNode> {
        find_in(&self.roots, id)
    }

    /// Find a task by id, mutably.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut TaskNode> {
        find_in_mut(&mut self.roots, id)
    }

    /// Direct children of a task, or the root tasks when `parent` is
    /// `None`, in display order.
    ///
    /// Presentation-only: the stored order is never touched.
    pub fn children(&self, parent: Option<&str>) -> Result<Vec<&TaskNode>> {
        match parent {
            Some(id) => {
                let node = self
                    .find(id)
                    .ok_or_else(|| Error::NotFound(id.to_string()))?;
                Ok(display_order(&node.children))
            }
            None => Ok(display_order(&self.roots)),
        }
    }

    /// Chain of tasks from a root down to (and including) the task itself.
    ///
    /// Returns `None` when the id is unknown. A root-level task yields a
    /// single-element path.
    pub fn path_to(&self, id: &str) -> Option<Vec<&TaskNode>> {
        let mut trail = Vec::new();
        if path_in(&self.roots, id, &mut trail) {
            Some(trail)
        } else {
            None
        }
    }

    /// Direct parent of a task.
    ///
    /// `None` means the id is unknown; `Some(None)` means the task sits at
    /// the root level.
    pub fn parent_of(&self, id: &str) -> Option<Option<&TaskNode>> {
        let path = self.path_to(id)?;
        if path.len() >= 2 {
            Some(Some(path[path.len() - 2]))
        } else {
            Some(None)
        }
    }

    /// Create a task and append it to the end of the parent's sub-tasks,
    /// or to the end of the root list when `parent` is `None`.
    ///
    /// Returns the id of the new task.
    pub fn add_task(&mut self, label: &str, parent: Option<&str>) -> Result<String> {
        let label = normalize_label(label)?;
        let id = self.fresh_id(&label);
        let node = TaskNode::new(id.clone(), label);

        match parent {
            Some(parent_id) => {
                let parent_node = self
                    .find_mut(parent_id)
                    .ok_or_else(|| Error::NotFound(parent_id.to_string()))?;
                parent_node.children.push(node);
            }
            None => self.roots.push(node),
        }

        Ok(id)
    }

    /// Replace a task's label, returning the previous one.
    pub fn rename_task(&mut self, id: &str, new_label: &str) -> Result<String> {
        let new_label = normalize_label(new_label)?;
        let node = self
            .find_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        Ok(std::mem::replace(&mut node.label, new_label))
    }

    /// Flip a task's completion state, returning the new state.
    ///
    /// Only the task itself changes; sub-tasks keep their own state.
    pub fn toggle_task(&mut self, id: &str) -> Result<bool> {
        let node = self
            .find_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        node.completed = !node.completed;
        Ok(node.completed)
    }

    /// Remove a task and its entire subtree, returning the detached node.
    pub fn delete_task(&mut self, id: &str) -> Result<TaskNode> {
        detach(&mut self.roots, id).ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Reparent a task under `new_parent`, or to the root level when
    /// `new_parent` is `None`. The subtree moves intact and lands at the
    /// end of its new sibling list.
    ///
    /// Returns `false` without touching the forest when the task already
    /// sits under the requested parent.
    pub fn move_task(&mut self, id: &str, new_parent: Option<&str>) -> Result<bool> {
        if !self.contains(id) {
            return Err(Error::NotFound(id.to_string()));
        }

        if let Some(target_id) = new_parent {
            if self.would_create_cycle(id, target_id) {
                return Err(Error::CycleDetected);
            }
            if !self.contains(target_id) {
                return Err(Error::NotFound(target_id.to_string()));
            }
        }

        let current_parent = self
            .parent_of(id)
            .and_then(|parent| parent.map(|node| node.id.clone()));
        if current_parent.as_deref() == new_parent {
            return Ok(false);
        }

        // Checks above guarantee both detach and reattach succeed.
        let Some(node) = detach(&mut self.roots, id) else {
            return Err(Error::NotFound(id.to_string()));
        };
        match new_parent {
            Some(parent_id) => {
                let Some(parent_node) = self.find_mut(parent_id) else {
                    // Unreachable: the target was verified to be outside
                    // the detached subtree.
                    self.roots.push(node);
                    return Err(Error::NotFound(parent_id.to_string()));
                };
                parent_node.children.push(node);
            }
            None => self.roots.push(node),
        }

        Ok(true)
    }

    /// Whether attaching `source` under `target` would create a cycle,
    /// i.e. the target is the source itself or lives inside its subtree.
    pub fn would_create_cycle(&self, source: &str, target: &str) -> bool {
        if source == target {
            return true;
        }
        match self.find(source) {
            Some(node) => find_in(&node.children, target).is_some(),
            None => false,
        }
    }

    /// Generate a task id that is unique within this forest, seeded by
    /// the new task's label.
    pub fn fresh_id(&self, seed: &str) -> String {
        let mut attempt = 0u64;
        loop {
            let id = generate_id(seed, attempt);
            if !self.contains(&id) {
                return id;
            }
            attempt += 1;
        }
    }
}

/// Sibling order for presentation: incomplete tasks first, then completed
/// ones, each group keeping its stored order.
pub fn display_order(nodes: &[TaskNode]) -> Vec<&TaskNode> {
    let mut ordered: Vec<&TaskNode> = nodes.iter().filter(|n| !n.completed).collect();
    ordered.extend(nodes.iter().filter(|n| n.completed));
    ordered
}

/// Trim a label and reject empty results.
fn normalize_label(label: &str) -> Result<String> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyLabel);
    }
    Ok(trimmed.to_string())
}

/// Generate a short hash-derived id (e.g., "gv-3fa2c1") from the label
/// seed, the current time, and the collision attempt counter.
fn generate_id(seed: &str, attempt: u64) -> String {
    let now = chrono::Utc::now();
    let nanos = now
        .timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros());

    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    hasher.update(nanos.to_le_bytes());
    hasher.update(attempt.to_le_bytes());
    let hash = hasher.finalize();

    let hex: String = hash.iter().take(3).map(|b| format!("{b:02x}")).collect();
    format!("{ID_PREFIX}-{hex}")
}

fn find_in<'a>(nodes: &'a [TaskNode], id: &str) -> Option<&'a TaskNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_in(&node.children, id) {
            return Some(found);
        }
    }
    None
}

fn find_in_mut<'a>(nodes: &'a mut [TaskNode], id: &str) -> Option<&'a mut TaskNode> {
    for node in nodes.iter_mut() {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_in_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Remove the node with this id from wherever it sits, returning it with
/// its subtree intact.
fn detach(nodes: &mut Vec<TaskNode>, id: &str) -> Option<TaskNode> {
    if let Some(pos) = nodes.iter().position(|n| n.id == id) {
        return Some(nodes.remove(pos));
    }
    for node in nodes.iter_mut() {
        if let Some(found) = detach(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

fn path_in<'a>(nodes: &'a [TaskNode], id: &str, trail: &mut Vec<&'a TaskNode>) -> bool {
    for node in nodes {
        trail.push(node);
        if node.id == id || path_in(&node.children, id, trail) {
            return true;
        }
        trail.pop();
    }
    false
}
