//! Configuration management for StudyFlow tools
//!
//! The settings file is plain JSON. Every key is optional; anything missing
//! falls back to the classic pomodoro rhythm (25 / 5 / 15, long break every
//! 4 sessions). Values are not validated here, the timer checks them when
//! turning a `Config` into its settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Timer configuration as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Focus phase length (minutes)
    #[serde(default = "default_focus_duration")]
    pub focus_duration: u32,

    /// Short break length (minutes)
    #[serde(default = "default_break_duration")]
    pub break_duration: u32,

    /// Long break length (minutes)
    #[serde(default = "default_long_break_duration")]
    pub long_break_duration: u32,

    /// Completed focus phases between long breaks
    #[serde(default = "default_sessions_until_long_break")]
    pub sessions_until_long_break: u32,
}

fn default_focus_duration() -> u32 {
    25
}

fn default_break_duration() -> u32 {
    5
}

fn default_long_break_duration() -> u32 {
    15
}

fn default_sessions_until_long_break() -> u32 {
    4
}

impl Default for Config {
    fn default() -> Self {
        Self {
            focus_duration: default_focus_duration(),
            break_duration: default_break_duration(),
            long_break_duration: default_long_break_duration(),
            sessions_until_long_break: default_sessions_until_long_break(),
        }
    }
}

impl Config {
    /// Load config from file
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}
