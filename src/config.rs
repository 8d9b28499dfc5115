//! Application configuration.
//!
//! The configuration is loaded from `$XDG_CONFIG_HOME/bspwmrc/config.json`.
//! Every section is optional and falls back to compiled-in defaults, so a
//! missing file simply means "use the defaults".
//!
//! # Example
//!
//! ```json
//! {
//!   "scratchpads": {
//!     "t": {
//!       "name": "keepassxc",
//!       "command": ["keepassxc"],
//!       "class_name": "keepassxc",
//!       "instance_name": "keepassxc"
//!     }
//!   },
//!   "battery": { "low_threshold": 0.15 },
//!   "session": { "launcher": ["dmenu_run"] }
//! }
//! ```

use crate::scratchpad::{default_registry, Registry};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
///
/// Every field is optional; a minimal `{}` file is valid and all sections
/// fall back to their compiled-in defaults.  A `scratchpads` section
/// replaces the built-in registry rather than extending it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Scratchpads by hotkey.
    #[serde(default = "default_registry")]
    pub scratchpads: Registry,

    /// Low-battery warning settings.
    #[serde(default)]
    pub battery: BatteryConfig,

    /// Commands run when the desktop is (re)configured.
    #[serde(default)]
    pub session: SessionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scratchpads: default_registry(),
            battery: BatteryConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryConfig {
    /// Charge ratio in `[0, 1]` below which `cron` warns.
    pub low_threshold: f64,
    /// How long battery notifications stay up (ms).
    pub notify_timeout_ms: u32,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            low_threshold: 0.1,
            notify_timeout_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Run in order after the daemons are reloaded; each must exit 0.
    pub setup_commands: Vec<Vec<String>>,
    /// Application launcher started by `run`.
    pub launcher: Vec<String>,
    /// How long the "desktop reloaded" notification stays up (ms).
    pub reload_timeout_ms: u32,
}

fn argv(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            setup_commands: vec![
                argv(&["setxkbmap", "custom"]),
                argv(&["xsetroot", "-cursor_name", "left_ptr"]),
                argv(&[
                    "feh",
                    "--bg-scale",
                    "/usr/share/backgrounds/ubuntu-default-greyscale-wallpaper.png",
                ]),
            ],
            launcher: argv(&[
                "rofi",
                "-show",
                "run",
                "-display-run",
                "",
                "-theme-str",
                "#window { border: 5; }",
            ]),
            reload_timeout_ms: 1000,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/bspwmrc`).
pub fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("bspwmrc")
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
