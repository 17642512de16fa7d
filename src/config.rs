use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::session::FinishPolicy;

/// Countdown durations cycled in the picker.
pub const COUNTDOWN_PRESETS: &[u32] = &[60, 120, 300, 600];

/// Anything shorter than this is not a meaningful run.
pub const MIN_COUNTDOWN_SECS: u32 = 10;

pub const DEFAULT_COUNTDOWN_SECS: u32 = 300;

/// Substituted when a configured duration is below the floor.
const FALLBACK_COUNTDOWN_SECS: u32 = 60;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_repo_owner")]
    pub repo_owner: String,
    #[serde(default = "default_repo_name")]
    pub repo_name: String,
    #[serde(default = "default_repo_branch")]
    pub repo_branch: String,
    #[serde(default = "default_file_extension")]
    pub file_extension: String,
    #[serde(default = "default_countdown_secs")]
    pub countdown_secs: u32,
    #[serde(default = "default_finish")]
    pub finish: String,
    #[serde(default = "default_strip_comments")]
    pub strip_comments: bool,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_repo_owner() -> String {
    "acs-aburada".to_string()
}
fn default_repo_name() -> String {
    "oop-2025".to_string()
}
fn default_repo_branch() -> String {
    "main".to_string()
}
fn default_file_extension() -> String {
    ".cpp".to_string()
}
fn default_countdown_secs() -> u32 {
    DEFAULT_COUNTDOWN_SECS
}
fn default_finish() -> String {
    "countdown".to_string()
}
fn default_strip_comments() -> bool {
    true
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo_owner: default_repo_owner(),
            repo_name: default_repo_name(),
            repo_branch: default_repo_branch(),
            file_extension: default_file_extension(),
            countdown_secs: default_countdown_secs(),
            finish: default_finish(),
            strip_comments: default_strip_comments(),
            theme: default_theme(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    #[allow(dead_code)]
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("labtype")
            .join("config.toml")
    }

    /// Substitute defaults for out-of-range or unknown values after
    /// deserialization and CLI overrides. Bad input degrades, never errors.
    pub fn validate(&mut self) {
        if self.countdown_secs < MIN_COUNTDOWN_SECS {
            self.countdown_secs = FALLBACK_COUNTDOWN_SECS;
        }
        if !matches!(self.finish.as_str(), "countdown" | "complete") {
            self.finish = default_finish();
        }
        self.file_extension = self.file_extension.to_lowercase();
        if !self.file_extension.starts_with('.') {
            self.file_extension.insert(0, '.');
        }
    }

    pub fn finish_policy(&self) -> FinishPolicy {
        match self.finish.as_str() {
            "complete" => FinishPolicy::Complete,
            _ => FinishPolicy::Countdown,
        }
    }
}
