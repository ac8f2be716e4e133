//! Append-only log of CLI invocations.
//!
//! Every `gv` invocation appends one JSON line to `action.log` in the
//! data directory, giving a flat audit trail across lists: what ran,
//! against which list, whether it worked, and how long it took. Logging
//! is strictly best-effort: a failed write never fails the command that
//! triggered it. The config key `action_log = false` turns it off.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// File name of the log inside the data directory.
const LOG_FILE: &str = "action.log";

/// Longest argument recorded verbatim; anything longer is cut.
const MAX_ARG_CHARS: usize = 120;

/// One logged invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionEntry {
    /// RFC 3339 timestamp of when the invocation finished
    pub timestamp: String,
    /// List the invocation applied to
    pub list: String,
    /// Subcommand name (e.g., "add", "move", "undo")
    pub command: String,
    /// Raw command-line arguments, long values truncated
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Whether the command succeeded
    pub success: bool,
    /// Error message when it did not
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall-clock duration of the invocation
    pub duration_ms: u64,
}

impl ActionEntry {
    pub fn new(
        list: &str,
        command: &str,
        args: &[String],
        success: bool,
        error: Option<String>,
        duration: Duration,
    ) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            list: list.to_string(),
            command: command.to_string(),
            args: args.iter().map(|arg| truncate_arg(arg)).collect(),
            success,
            error,
            duration_ms: duration.as_millis() as u64,
        }
    }
}

/// Append an entry to the log under `data_dir`.
///
/// Returns the write error instead of failing the command; callers warn
/// and move on.
pub fn record(data_dir: &Path, entry: &ActionEntry) -> io::Result<()> {
    let line = serde_json::to_string(entry).map_err(io::Error::other)?;
    std::fs::create_dir_all(data_dir)?;
    let path = data_dir.join(LOG_FILE);
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    writeln!(file, "{line}")
}

fn truncate_arg(arg: &str) -> String {
    if arg.chars().count() <= MAX_ARG_CHARS {
        arg.to_string()
    } else {
        let cut: String = arg.chars().take(MAX_ARG_CHARS).collect();
        format!("{cut}...")
    }
}
