//! CLI argument definitions for Grove.

use clap::{Parser, Subcommand};

/// Grove - nested task lists with undo.
///
/// Tasks live in named lists and may carry sub-tasks to any depth.
/// Every change is undoable with `gv undo`.
#[derive(Parser, Debug)]
#[command(name = "gv")]
#[command(author, version, about = "A CLI tool for keeping nested task lists with undo", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Task list to operate on (default "inbox").
    /// Can also be set via GV_LIST environment variable.
    #[arg(short = 'l', long = "list", global = true, env = "GV_LIST")]
    pub list: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a task at the top level or under a parent task
    Add {
        /// Task label
        label: String,

        /// Parent task ID; omit to add at the top level
        #[arg(short = 'u', long)]
        under: Option<String>,
    },

    /// Render the list as an indented tree
    ///
    /// At every level, open tasks come first and completed tasks sink to
    /// the bottom; within each group the creation order is kept.
    List {
        /// Render only the subtree rooted at this task ID
        #[arg(short = 'u', long)]
        under: Option<String>,
    },

    /// Show one task with its direct sub-tasks
    Show {
        /// Task ID (e.g., gv-3fa2c1)
        id: String,
    },

    /// Rename a task
    Rename {
        /// Task ID
        id: String,

        /// New label
        label: String,
    },

    /// Toggle a task between open and completed
    Toggle {
        /// Task ID
        id: String,
    },

    /// Delete a task together with its entire subtree
    Delete {
        /// Task ID
        id: String,
    },

    /// Move a task (subtree included) under another task
    Move {
        /// Task ID to move
        id: String,

        /// New parent task ID; omit to move to the top level
        #[arg(short = 't', long)]
        to: Option<String>,
    },

    /// Show the chain of tasks from the top level down to a task
    Path {
        /// Task ID
        id: String,
    },

    /// Revert the most recent change to the list
    Undo,

    /// Reapply the most recently undone change
    Redo,

    /// Inspect or prune the undo history
    History {
        #[command(subcommand)]
        command: Option<HistoryCommands>,
    },

    /// System administration commands
    System {
        #[command(subcommand)]
        command: SystemCommands,
    },
}

/// History subcommands
#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// Drop every snapshot except the current one
    Clear,
}

/// System subcommands
#[derive(Subcommand, Debug)]
pub enum SystemCommands {
    /// Show data paths, known lists, and build information
    Info,
}

/// Package version from Cargo.
pub fn package_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Git commit hash baked in at build time.
pub fn git_commit() -> &'static str {
    env!("GV_GIT_COMMIT")
}

/// Build timestamp baked in at build time.
pub fn build_timestamp() -> &'static str {
    env!("GV_BUILD_TIMESTAMP")
}
