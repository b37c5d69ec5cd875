//! User configuration.
//!
//! Read from `$XDG_CONFIG_HOME/keycalc/config.toml` unless a path is given.
//! Every field is optional; a missing file means the defaults.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::calculator::DEFAULT_DIVISION_PRECISION;

/// Environment variable overriding `engine.division_precision`.
pub const PRECISION_ENV: &str = "KEYCALC_PRECISION";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub feedback: FeedbackConfig,
    pub display: DisplayConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Significant digits kept for quotients that do not terminate.
    pub division_precision: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            division_precision: DEFAULT_DIVISION_PRECISION,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Ring the terminal bell on every key press.
    pub bell: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Print the keypad when an interactive session starts.
    pub show_keypad: bool,
    /// Copy each `=` result to the clipboard.
    pub copy_on_equals: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_keypad: true,
            copy_on_equals: false,
        }
    }
}

impl Config {
    /// The default config file location, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("keycalc").join("config.toml"))
    }

    /// Load the config from `path`, or from [`Config::default_path`].
    ///
    /// A file that does not exist yields the defaults; a file that exists but
    /// cannot be read or parsed is an error.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) else {
            tracing::debug!("No config directory, using defaults");
            return Ok(Self::default());
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::parse(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        tracing::info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Parse a config from TOML text.
    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(self) -> Self {
        let precision = std::env::var(PRECISION_ENV).ok();
        self.with_precision_override(precision.as_deref())
    }

    /// Override the division precision from a textual value.
    /// Values that are not a positive integer are ignored with a warning.
    pub fn with_precision_override(mut self, value: Option<&str>) -> Self {
        if let Some(raw) = value {
            match raw.trim().parse::<u64>() {
                Ok(precision) if precision > 0 => self.engine.division_precision = precision,
                _ => tracing::warn!(value = %raw, "Ignoring invalid {}", PRECISION_ENV),
            }
        }
        self
    }
}
