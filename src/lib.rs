//! Grove - a nested task list library with undo.
//!
//! This library provides the core functionality for the `gv` CLI tool:
//! an ordered forest of tasks (each task may carry sub-tasks), linear
//! undo/redo history over mutations, reparenting moves with cycle
//! detection, reveal paths, and JSON document persistence.

pub mod action_log;
pub mod cli;
pub mod commands;
pub mod config;
pub mod history;
pub mod models;
pub mod storage;
pub mod tree;
pub mod workspace;

/// Library-level error type for grove operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Task label cannot be empty")]
    EmptyLabel,

    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Cannot move a task into itself or its own subtree")]
    CycleDetected,

    #[error("Corrupt task document: {0}")]
    CorruptDocument(String),

    #[error("Invalid list name: {0}")]
    InvalidListName(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for grove operations.
pub type Result<T> = std::result::Result<T, Error>;
