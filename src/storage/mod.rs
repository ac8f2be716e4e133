//! Persistence for task lists.
//!
//! Each list lives in a data directory as a pair of JSON files written
//! through a temp-file rename, so a crash never leaves a half-written
//! document behind:
//! - `<list>.json` - the forest
//! - `<list>.history.json` - the undo history sidecar
//!
//! The forest is always written before the history. If the process dies
//! between the two writes, the stale sidecar is reconciled against the
//! fresh forest on the next load instead of clobbering it.

pub mod document;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::history::History;
use crate::storage::document::{HistoryDocument, TaskDocument};
use crate::tree::TaskTree;
use crate::workspace::Workspace;
use crate::{Error, Result};

/// Resolve the data directory: `GV_DATA_DIR` override, else the platform
/// default (e.g., `~/.local/share/grove`).
pub fn data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("GV_DATA_DIR") {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let base = dirs::data_dir()
        .ok_or_else(|| Error::Other("could not determine platform data directory".to_string()))?;
    Ok(base.join("grove"))
}

/// Longest accepted list name; names become file stems.
const MAX_LIST_NAME_LEN: usize = 64;

/// Check that a list name is usable as a file stem.
///
/// Names are at most 64 characters, start with an ASCII letter or digit,
/// and continue with letters, digits, `-`, or `_`. Dots are excluded so a
/// list can never collide with another list's `.history` sidecar.
pub fn validate_list_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            name.len() <= MAX_LIST_NAME_LEN
                && first.is_ascii_alphanumeric()
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidListName(name.to_string()))
    }
}

/// File-backed store for task lists and their histories.
pub struct DocumentStore {
    dir: PathBuf,
}

impl DocumentStore {
    /// Create a store rooted at the given directory.
    ///
    /// The directory is created lazily on first save, not here.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Directory this store reads and writes.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a list's forest file.
    pub fn tasks_path(&self, list: &str) -> PathBuf {
        self.dir.join(format!("{list}.json"))
    }

    /// Path of a list's history sidecar.
    pub fn history_path(&self, list: &str) -> PathBuf {
        self.dir.join(format!("{list}.history.json"))
    }

    /// Open a list as a workspace, reconciling forest and history.
    ///
    /// Returns the workspace plus any recovery warnings the caller should
    /// surface. A missing forest file is an empty list; a corrupt one is
    /// replaced by an empty forest in memory and left untouched on disk
    /// until the next successful save.
    pub fn open(&self, list: &str) -> Result<(Workspace, Vec<String>)> {
        validate_list_name(list)?;
        let mut warnings = Vec::new();

        let (tree, warning) = self.load_tree(list)?;
        if let Some(warning) = warning {
            warnings.push(warning);
        }

        let (history, warning) = self.load_history(list)?;
        if let Some(warning) = warning {
            warnings.push(warning);
        }

        let workspace = match history {
            Some(history) => Workspace::from_parts(tree, history),
            None => Workspace::new(tree),
        };
        Ok((workspace, warnings))
    }

    /// Write a workspace back to disk, forest first.
    pub fn save(&self, list: &str, workspace: &Workspace) -> Result<()> {
        validate_list_name(list)?;

        let tasks = TaskDocument::from_tree(workspace.tree());
        write_atomic(
            &self.tasks_path(list),
            &serde_json::to_string_pretty(&tasks)?,
        )?;

        let history = HistoryDocument::from_history(workspace.history());
        write_atomic(
            &self.history_path(list),
            &serde_json::to_string_pretty(&history)?,
        )?;
        Ok(())
    }

    /// Names of all lists in this store, sorted.
    pub fn list_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(names),
            Err(err) => return Err(err.into()),
        };
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(stem) = name.strip_suffix(".json") {
                if validate_list_name(stem).is_ok() {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn load_tree(&self, list: &str) -> Result<(TaskTree, Option<String>)> {
        let path = self.tasks_path(list);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok((TaskTree::new(), None));
            }
            Err(err) => return Err(err.into()),
        };

        let parsed = serde_json::from_str::<TaskDocument>(&raw)
            .map_err(|err| Error::CorruptDocument(err.to_string()))
            .and_then(TaskDocument::into_tree);
        match parsed {
            Ok(tree) => Ok((tree, None)),
            Err(err) => Ok((
                TaskTree::new(),
                Some(format!(
                    "ignoring corrupt task document {}: {}",
                    path.display(),
                    err
                )),
            )),
        }
    }

    fn load_history(&self, list: &str) -> Result<(Option<History>, Option<String>)> {
        let path = self.history_path(list);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok((None, None)),
            Err(err) => return Err(err.into()),
        };

        let parsed = serde_json::from_str::<HistoryDocument>(&raw)
            .ok()
            .and_then(HistoryDocument::into_history);
        Ok(match parsed {
            Some(history) => (Some(history), None),
            None => (
                None,
                Some(format!(
                    "ignoring corrupt history file {}, starting fresh",
                    path.display()
                )),
            ),
        })
    }
}

/// Write file contents through a temp file in the same directory.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| Error::Other(format!("no parent directory for {}", path.display())))?;
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.persist(path).map_err(|err| Error::Io(err.error))?;
    Ok(())
}
