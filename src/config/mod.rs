//! User configuration.
//!
//! Settings come from a TOML file (default
//! `~/.config/grove/config.toml`, overridable with `GV_CONFIG`) and are
//! merged with command-line flags at resolution time. Precedence is
//! always flag, then environment, then config file, then built-in
//! default; clap handles the flag/environment half, this module handles
//! the rest.
//!
//! Config never blocks startup: a missing file means defaults, and a
//! malformed one means defaults plus a warning for the caller to print.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// List used when neither flag, environment, nor config names one.
pub const DEFAULT_LIST: &str = "inbox";

/// Output rendering selected for a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Human,
}

/// Contents of the config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroveConfig {
    /// Default output format (`-H` still forces human)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputFormat>,

    /// List opened when no `--list` is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_list: Option<String>,

    /// Whether invocations are appended to the action log (default true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_log: Option<bool>,
}

impl GroveConfig {
    /// Path of the config file, honoring `GV_CONFIG`.
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("GV_CONFIG") {
            if !path.is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        let base = dirs::config_dir().ok_or_else(|| {
            Error::Config("could not determine platform config directory".to_string())
        })?;
        Ok(base.join("grove").join("config.toml"))
    }

    /// Load the config from its resolved path.
    ///
    /// Never fails: problems degrade to defaults with a warning message.
    pub fn load() -> (Self, Option<String>) {
        match Self::config_path() {
            Ok(path) => Self::load_from(&path),
            Err(err) => (Self::default(), Some(err.to_string())),
        }
    }

    /// Load the config from an explicit path, degrading to defaults.
    pub fn load_from(path: &Path) -> (Self, Option<String>) {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return (Self::default(), None);
            }
            Err(err) => {
                return (
                    Self::default(),
                    Some(format!("could not read config {}: {}", path.display(), err)),
                );
            }
        };
        match toml::from_str(&raw) {
            Ok(config) => (config, None),
            Err(err) => (
                Self::default(),
                Some(format!(
                    "ignoring invalid config {}: {}",
                    path.display(),
                    err
                )),
            ),
        }
    }

    /// List name after applying precedence.
    pub fn resolve_list(&self, flag: Option<String>) -> String {
        flag.or_else(|| self.default_list.clone())
            .unwrap_or_else(|| DEFAULT_LIST.to_string())
    }

    /// Output format after applying precedence.
    pub fn resolve_output(&self, human_flag: bool) -> OutputFormat {
        if human_flag {
            OutputFormat::Human
        } else {
            self.output.unwrap_or_default()
        }
    }

    /// Whether the action log is enabled.
    pub fn action_log_enabled(&self) -> bool {
        self.action_log.unwrap_or(true)
    }
}
