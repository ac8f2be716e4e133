//! On-disk document formats.
//!
//! Two JSON documents exist per list:
//! - `<list>.json` holds the forest: a version tag plus the root tasks
//! - `<list>.history.json` holds the undo history: version, cursor, and
//!   every snapshot as a full root list
//!
//! Loading validates before handing data to the rest of the crate: an
//! unsupported version or a duplicate id anywhere in the forest marks the
//! document corrupt. Unknown labels and completion flags are taken as-is.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::history::History;
use crate::models::TaskNode;
use crate::tree::TaskTree;
use crate::{Error, Result};

/// Format version written by this build.
pub const DOCUMENT_VERSION: u32 = 1;

/// Serialized forest for one list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDocument {
    pub version: u32,
    #[serde(default)]
    pub tasks: Vec<TaskNode>,
}

impl TaskDocument {
    /// Wrap a forest for serialization.
    pub fn from_tree(tree: &TaskTree) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            tasks: tree.roots().to_vec(),
        }
    }

    /// Validate the document and unwrap it into a forest.
    pub fn into_tree(self) -> Result<TaskTree> {
        if self.version != DOCUMENT_VERSION {
            return Err(Error::CorruptDocument(format!(
                "unsupported document version {}",
                self.version
            )));
        }
        let mut seen = HashSet::new();
        check_unique_ids(&self.tasks, &mut seen)?;
        Ok(TaskTree::from_roots(self.tasks))
    }
}

/// Serialized undo history for one list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryDocument {
    pub version: u32,
    pub cursor: usize,
    #[serde(default)]
    pub snapshots: Vec<Vec<TaskNode>>,
}

impl HistoryDocument {
    /// Wrap a history for serialization.
    pub fn from_history(history: &History) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            cursor: history.cursor(),
            snapshots: history
                .snapshots()
                .iter()
                .map(|tree| tree.roots().to_vec())
                .collect(),
        }
    }

    /// Unwrap into a history, or `None` when the shape is unusable
    /// (wrong version, duplicate ids inside a snapshot, no snapshots,
    /// cursor out of range).
    pub fn into_history(self) -> Option<History> {
        if self.version != DOCUMENT_VERSION {
            return None;
        }
        // Each snapshot is checked on its own: ids repeat across
        // snapshots but must be unique within one.
        for snapshot in &self.snapshots {
            let mut seen = HashSet::new();
            if check_unique_ids(snapshot, &mut seen).is_err() {
                return None;
            }
        }
        let snapshots = self
            .snapshots
            .into_iter()
            .map(TaskTree::from_roots)
            .collect();
        History::from_parts(snapshots, self.cursor)
    }
}

fn check_unique_ids<'a>(nodes: &'a [TaskNode], seen: &mut HashSet<&'a str>) -> Result<()> {
    for node in nodes {
        if !seen.insert(node.id.as_str()) {
            return Err(Error::CorruptDocument(format!(
                "duplicate task id {}",
                node.id
            )));
        }
        check_unique_ids(&node.children, seen)?;
    }
    Ok(())
}
