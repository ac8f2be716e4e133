//! Command implementations for the Grove CLI.
//!
//! Each function here is the business logic behind one subcommand: open
//! the list's workspace, apply the operation, persist on success, and
//! hand back a result struct that renders as JSON or human-readable
//! text. Failed operations persist nothing.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::GroveConfig;
use crate::models::TaskNode;
use crate::storage::DocumentStore;
use crate::tree::display_order;
use crate::workspace::Workspace;
use crate::{Error, Result};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| r#"{"error":"serialization failed"}"#.to_string())
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

fn checkbox(completed: bool) -> &'static str {
    if completed { "[x]" } else { "[ ]" }
}

/// Presentation view of a task. Children are in display order: open
/// tasks first, completed tasks last, stored order within each group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskView {
    pub id: String,
    pub label: String,
    pub completed: bool,
    pub has_children: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TaskView>,
}

impl TaskView {
    /// View of a whole subtree.
    fn deep(node: &TaskNode) -> Self {
        Self {
            id: node.id.clone(),
            label: node.label.clone(),
            completed: node.completed,
            has_children: node.has_children(),
            children: display_order(&node.children)
                .into_iter()
                .map(TaskView::deep)
                .collect(),
        }
    }

    /// View of a single node without its sub-tasks.
    fn shallow(node: &TaskNode) -> Self {
        Self {
            id: node.id.clone(),
            label: node.label.clone(),
            completed: node.completed,
            has_children: node.has_children(),
            children: Vec::new(),
        }
    }
}

fn render_tree(views: &[TaskView], depth: usize, out: &mut String) {
    for view in views {
        let indent = "  ".repeat(depth);
        out.push_str(&format!(
            "{indent}{} {} ({})\n",
            checkbox(view.completed),
            view.label,
            view.id
        ));
        render_tree(&view.children, depth + 1, out);
    }
}

/// Open a list's workspace, printing any recovery warnings to stderr.
fn open_list(store: &DocumentStore, list: &str) -> Result<Workspace> {
    let (workspace, warnings) = store.open(list)?;
    for warning in warnings {
        eprintln!("Warning: {warning}");
    }
    Ok(workspace)
}

// === add ===

/// Output of `gv add`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AddOutput {
    pub list: String,
    pub task: TaskView,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl Output for AddOutput {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        match &self.parent {
            Some(parent) => format!(
                "Added {} under {}: {}",
                self.task.id, parent, self.task.label
            ),
            None => format!("Added {}: {}", self.task.id, self.task.label),
        }
    }
}

pub fn add(data_dir: &Path, list: &str, label: &str, under: Option<&str>) -> Result<AddOutput> {
    let store = DocumentStore::new(data_dir.to_path_buf());
    let mut workspace = open_list(&store, list)?;

    let id = workspace.add_task(label, under)?;
    store.save(list, &workspace)?;

    let node = workspace
        .tree()
        .find(&id)
        .ok_or_else(|| Error::NotFound(id.clone()))?;
    Ok(AddOutput {
        list: list.to_string(),
        task: TaskView::shallow(node),
        parent: under.map(str::to_string),
    })
}

// === list ===

/// Output of `gv list`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListOutput {
    pub list: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub under: Option<String>,
    pub total: usize,
    pub tasks: Vec<TaskView>,
}

impl Output for ListOutput {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.tasks.is_empty() {
            return format!("{}: no tasks", self.list);
        }
        let mut out = format!("{}: {} task{}\n", self.list, self.total, plural(self.total));
        render_tree(&self.tasks, 0, &mut out);
        out.trim_end().to_string()
    }
}

pub fn list(data_dir: &Path, list: &str, under: Option<&str>) -> Result<ListOutput> {
    let store = DocumentStore::new(data_dir.to_path_buf());
    let workspace = open_list(&store, list)?;
    let tree = workspace.tree();

    match under {
        Some(id) => {
            let node = tree
                .find(id)
                .ok_or_else(|| Error::NotFound(id.to_string()))?;
            Ok(ListOutput {
                list: list.to_string(),
                under: Some(id.to_string()),
                total: node.subtree_len(),
                tasks: vec![TaskView::deep(node)],
            })
        }
        None => Ok(ListOutput {
            list: list.to_string(),
            under: None,
            total: tree.len(),
            tasks: display_order(tree.roots())
                .into_iter()
                .map(TaskView::deep)
                .collect(),
        }),
    }
}

// === show ===

/// Output of `gv show`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShowOutput {
    pub list: String,
    pub id: String,
    pub label: String,
    pub completed: bool,
    pub has_children: bool,
    pub subtree_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TaskView>,
}

impl Output for ShowOutput {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let status = if self.completed { "done" } else { "open" };
        let mut out = format!("{}: {} [{}]\n", self.id, self.label, status);
        if let Some(parent) = &self.parent {
            out.push_str(&format!("Parent: {parent}\n"));
        }
        let done = self.children.iter().filter(|c| c.completed).count();
        out.push_str(&format!(
            "Sub-tasks: {} direct ({} done), {} in subtree\n",
            self.children.len(),
            done,
            self.subtree_size - 1
        ));
        for child in &self.children {
            out.push_str(&format!(
                "  {} {} ({})\n",
                checkbox(child.completed),
                child.label,
                child.id
            ));
        }
        out.trim_end().to_string()
    }
}

pub fn show(data_dir: &Path, list: &str, id: &str) -> Result<ShowOutput> {
    let store = DocumentStore::new(data_dir.to_path_buf());
    let workspace = open_list(&store, list)?;
    let tree = workspace.tree();

    let node = tree
        .find(id)
        .ok_or_else(|| Error::NotFound(id.to_string()))?;
    let parent = tree.parent_of(id).flatten().map(|p| p.id.clone());
    let children = tree
        .children(Some(id))?
        .into_iter()
        .map(TaskView::shallow)
        .collect();
    Ok(ShowOutput {
        list: list.to_string(),
        id: node.id.clone(),
        label: node.label.clone(),
        completed: node.completed,
        has_children: node.has_children(),
        subtree_size: node.subtree_len(),
        parent,
        children,
    })
}

// === rename ===

/// Output of `gv rename`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RenameOutput {
    pub list: String,
    pub id: String,
    pub label: String,
    pub previous: String,
}

impl Output for RenameOutput {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Renamed {}: \"{}\" -> \"{}\"",
            self.id, self.previous, self.label
        )
    }
}

pub fn rename(data_dir: &Path, list: &str, id: &str, label: &str) -> Result<RenameOutput> {
    let store = DocumentStore::new(data_dir.to_path_buf());
    let mut workspace = open_list(&store, list)?;

    let previous = workspace.rename_task(id, label)?;
    store.save(list, &workspace)?;

    let node = workspace
        .tree()
        .find(id)
        .ok_or_else(|| Error::NotFound(id.to_string()))?;
    Ok(RenameOutput {
        list: list.to_string(),
        id: id.to_string(),
        label: node.label.clone(),
        previous,
    })
}

// === toggle ===

/// Output of `gv toggle`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleOutput {
    pub list: String,
    pub id: String,
    pub label: String,
    pub completed: bool,
}

impl Output for ToggleOutput {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.completed {
            format!("Completed {}: {}", self.id, self.label)
        } else {
            format!("Reopened {}: {}", self.id, self.label)
        }
    }
}

pub fn toggle(data_dir: &Path, list: &str, id: &str) -> Result<ToggleOutput> {
    let store = DocumentStore::new(data_dir.to_path_buf());
    let mut workspace = open_list(&store, list)?;

    let completed = workspace.toggle_task(id)?;
    store.save(list, &workspace)?;

    let node = workspace
        .tree()
        .find(id)
        .ok_or_else(|| Error::NotFound(id.to_string()))?;
    Ok(ToggleOutput {
        list: list.to_string(),
        id: id.to_string(),
        label: node.label.clone(),
        completed,
    })
}

// === delete ===

/// Output of `gv delete`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteOutput {
    pub list: String,
    pub id: String,
    pub label: String,
    pub removed: usize,
}

impl Output for DeleteOutput {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Deleted {}: {} ({} task{} removed)",
            self.id,
            self.label,
            self.removed,
            plural(self.removed)
        )
    }
}

pub fn delete(data_dir: &Path, list: &str, id: &str) -> Result<DeleteOutput> {
    let store = DocumentStore::new(data_dir.to_path_buf());
    let mut workspace = open_list(&store, list)?;

    let node = workspace.delete_task(id)?;
    store.save(list, &workspace)?;

    Ok(DeleteOutput {
        list: list.to_string(),
        id: id.to_string(),
        label: node.label.clone(),
        removed: node.subtree_len(),
    })
}

// === move ===

/// Output of `gv move`.
#[derive(Debug, Serialize, Deserialize)]
pub struct MoveOutput {
    pub list: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    pub moved: bool,
}

impl Output for MoveOutput {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        match (self.moved, &self.to) {
            (true, Some(to)) => format!("Moved {} under {}", self.id, to),
            (true, None) => format!("Moved {} to the top level", self.id),
            (false, _) => format!("{} is already there; nothing to move", self.id),
        }
    }
}

pub fn move_task(data_dir: &Path, list: &str, id: &str, to: Option<&str>) -> Result<MoveOutput> {
    let store = DocumentStore::new(data_dir.to_path_buf());
    let mut workspace = open_list(&store, list)?;

    let moved = workspace.move_task(id, to)?;
    if moved {
        store.save(list, &workspace)?;
    }

    Ok(MoveOutput {
        list: list.to_string(),
        id: id.to_string(),
        to: to.map(str::to_string),
        moved,
    })
}

// === path ===

/// Output of `gv path`.
#[derive(Debug, Serialize, Deserialize)]
pub struct PathOutput {
    pub list: String,
    pub id: String,
    pub depth: usize,
    pub path: Vec<TaskView>,
}

impl Output for PathOutput {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let chain: Vec<String> = self
            .path
            .iter()
            .map(|view| format!("{} ({})", view.label, view.id))
            .collect();
        chain.join(" > ")
    }
}

pub fn path(data_dir: &Path, list: &str, id: &str) -> Result<PathOutput> {
    let store = DocumentStore::new(data_dir.to_path_buf());
    let workspace = open_list(&store, list)?;

    let chain = workspace
        .tree()
        .path_to(id)
        .ok_or_else(|| Error::NotFound(id.to_string()))?;
    Ok(PathOutput {
        list: list.to_string(),
        id: id.to_string(),
        depth: chain.len(),
        path: chain.iter().map(|node| TaskView::shallow(node)).collect(),
    })
}

// === undo / redo ===

/// Output of `gv undo`.
#[derive(Debug, Serialize, Deserialize)]
pub struct UndoOutput {
    pub list: String,
    pub undone: bool,
    pub undo_remaining: usize,
    pub redo_remaining: usize,
}

impl Output for UndoOutput {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.undone {
            format!(
                "Undid last change ({} undo, {} redo available)",
                self.undo_remaining, self.redo_remaining
            )
        } else {
            "Nothing to undo".to_string()
        }
    }
}

pub fn undo(data_dir: &Path, list: &str) -> Result<UndoOutput> {
    let store = DocumentStore::new(data_dir.to_path_buf());
    let mut workspace = open_list(&store, list)?;

    let undone = workspace.undo();
    if undone {
        store.save(list, &workspace)?;
    }

    Ok(UndoOutput {
        list: list.to_string(),
        undone,
        undo_remaining: workspace.history().undo_steps(),
        redo_remaining: workspace.history().redo_steps(),
    })
}

/// Output of `gv redo`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RedoOutput {
    pub list: String,
    pub redone: bool,
    pub undo_remaining: usize,
    pub redo_remaining: usize,
}

impl Output for RedoOutput {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.redone {
            format!(
                "Redid last undone change ({} undo, {} redo available)",
                self.undo_remaining, self.redo_remaining
            )
        } else {
            "Nothing to redo".to_string()
        }
    }
}

pub fn redo(data_dir: &Path, list: &str) -> Result<RedoOutput> {
    let store = DocumentStore::new(data_dir.to_path_buf());
    let mut workspace = open_list(&store, list)?;

    let redone = workspace.redo();
    if redone {
        store.save(list, &workspace)?;
    }

    Ok(RedoOutput {
        list: list.to_string(),
        redone,
        undo_remaining: workspace.history().undo_steps(),
        redo_remaining: workspace.history().redo_steps(),
    })
}

// === history ===

/// Output of `gv history`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryOutput {
    pub list: String,
    pub snapshots: usize,
    pub cursor: usize,
    pub can_undo: bool,
    pub can_redo: bool,
}

impl Output for HistoryOutput {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let undo_steps = self.cursor;
        let redo_steps = self.snapshots - 1 - self.cursor;
        format!(
            "{}: {} snapshot{}, cursor {}\nUndo available: {}\nRedo available: {}",
            self.list,
            self.snapshots,
            plural(self.snapshots),
            self.cursor,
            if self.can_undo {
                format!("yes ({undo_steps} step{})", plural(undo_steps))
            } else {
                "no".to_string()
            },
            if self.can_redo {
                format!("yes ({redo_steps} step{})", plural(redo_steps))
            } else {
                "no".to_string()
            },
        )
    }
}

pub fn history(data_dir: &Path, list: &str) -> Result<HistoryOutput> {
    let store = DocumentStore::new(data_dir.to_path_buf());
    let workspace = open_list(&store, list)?;
    let history = workspace.history();

    Ok(HistoryOutput {
        list: list.to_string(),
        snapshots: history.snapshots().len(),
        cursor: history.cursor(),
        can_undo: history.can_undo(),
        can_redo: history.can_redo(),
    })
}

/// Output of `gv history clear`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryClearOutput {
    pub list: String,
    pub dropped: usize,
}

impl Output for HistoryClearOutput {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.dropped == 0 {
            format!("{}: history already clear", self.list)
        } else {
            format!(
                "{}: dropped {} snapshot{}",
                self.list,
                self.dropped,
                plural(self.dropped)
            )
        }
    }
}

pub fn history_clear(data_dir: &Path, list: &str) -> Result<HistoryClearOutput> {
    let store = DocumentStore::new(data_dir.to_path_buf());
    let mut workspace = open_list(&store, list)?;

    let dropped = workspace.history().snapshots().len() - 1;
    workspace.clear_history();
    store.save(list, &workspace)?;

    Ok(HistoryClearOutput {
        list: list.to_string(),
        dropped,
    })
}

// === system ===

/// Output of `gv system info`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SystemInfoOutput {
    pub version: String,
    pub commit: String,
    pub built: String,
    pub data_dir: String,
    pub config_path: String,
    pub list: String,
    pub lists: Vec<String>,
}

impl Output for SystemInfoOutput {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Version: {}\nCommit:  {}\nBuilt:   {}\nData:    {}\nConfig:  {}\nList:    {}\nLists:   {}",
            self.version,
            self.commit,
            self.built,
            self.data_dir,
            self.config_path,
            self.list,
            if self.lists.is_empty() {
                "none".to_string()
            } else {
                self.lists.join(", ")
            },
        )
    }
}

pub fn system_info(data_dir: &Path, list: &str) -> Result<SystemInfoOutput> {
    let store = DocumentStore::new(data_dir.to_path_buf());
    let lists = store.list_names()?;
    let config_path = GroveConfig::config_path()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    Ok(SystemInfoOutput {
        version: crate::cli::package_version().to_string(),
        commit: crate::cli::git_commit().to_string(),
        built: crate::cli::build_timestamp().to_string(),
        data_dir: data_dir.display().to_string(),
        config_path,
        list: list.to_string(),
        lists,
    })
}
