//! Common test utilities for grove integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't pollute
//! the user's `~/.local/share/grove/` directory or read their config.

#![allow(dead_code)]

use assert_cmd::Command;
pub use tempfile::TempDir;

/// A test environment with isolated data storage.
///
/// Each `TestEnv` creates two temporary directories:
/// - `data_dir`: Holds grove's documents (via `GV_DATA_DIR` env var)
/// - `config_dir`: Holds a config file, if a test writes one (via `GV_CONFIG`)
///
/// The `gv()` method returns a `Command` that sets both env vars
/// per-invocation, making tests parallel-safe.
pub struct TestEnv {
    pub data_dir: TempDir,
    pub config_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with isolated directories.
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
            config_dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the gv binary with isolated data and config.
    ///
    /// `GV_CONFIG` points at a (usually absent) file inside the temp
    /// config dir so the developer's real config never leaks into tests.
    pub fn gv(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_gv"));
        cmd.env("GV_DATA_DIR", self.data_dir.path());
        cmd.env("GV_CONFIG", self.config_path());
        cmd.env_remove("GV_LIST");
        cmd
    }

    /// Get the path to the data directory.
    pub fn data_path(&self) -> &std::path::Path {
        self.data_dir.path()
    }

    /// Path of the config file inside the isolated config dir.
    pub fn config_path(&self) -> std::path::PathBuf {
        self.config_dir.path().join("config.toml")
    }

    /// Write a config file that subsequent `gv()` invocations will read.
    pub fn write_config(&self, contents: &str) {
        std::fs::write(self.config_path(), contents).unwrap();
    }

    /// Run `gv add` and return the new task's id.
    pub fn add_task(&self, label: &str, under: Option<&str>) -> String {
        let mut cmd = self.gv();
        cmd.arg("add").arg(label);
        if let Some(parent) = under {
            cmd.args(["--under", parent]);
        }
        let output = cmd.output().unwrap();
        assert!(
            output.status.success(),
            "gv add failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        extract_id(&String::from_utf8_lossy(&output.stdout))
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the first task id from JSON output like `{"task":{"id":"gv-xxxxxx",...}}`.
pub fn extract_id(stdout: &str) -> String {
    stdout
        .split("\"id\":\"")
        .nth(1)
        .expect("output should contain an id")
        .split('"')
        .next()
        .unwrap()
        .to_string()
}
