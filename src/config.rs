//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/cluster-tool/cluster-tool.toml`
//! 3. Explicit config file: `--config <path>`
//! 4. Environment variables: `CLUSTER_TOOL_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::DEFAULT_MAX_HISTORY;

/// Snapshot files above this size are rejected (10 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 10 * 1024 * 1024;

const ENV_PREFIX: &str = "CLUSTER_TOOL";

/// Raw settings for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub max_history: Option<usize>,
    pub max_input_bytes: Option<u64>,
    pub pretty: Option<bool>,
}

/// Unified configuration for cluster-tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Number of undo snapshots kept (at least 1)
    pub max_history: usize,
    /// Largest snapshot file accepted, in bytes
    pub max_input_bytes: u64,
    /// Pretty-print exported JSON
    pub pretty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            pretty: true,
        }
    }
}

/// Get the XDG config directory for cluster-tool.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cluster-tool").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("cluster-tool.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            max_history: overlay.max_history.unwrap_or(self.max_history),
            max_input_bytes: overlay.max_input_bytes.unwrap_or(self.max_input_bytes),
            pretty: overlay.pretty.unwrap_or(self.pretty),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file, applied after the global one.
    ///   Unlike the global file it must exist.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = config_file {
            current = current.merge_with(&load_raw_settings(path)?);
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;
        Ok(current)
    }

    /// Apply CLUSTER_TOOL_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .map_err(config_err)?;

        let raw = RawSettings {
            max_history: config.get::<usize>("max_history").ok(),
            max_input_bytes: config.get::<u64>("max_input_bytes").ok(),
            pretty: config.get_bool("pretty").ok(),
        };
        Ok(settings.merge_with(&raw))
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.max_history == 0 {
            return Err(ApplicationError::Config {
                message: "max_history must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        format!(
            r#"# cluster-tool configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/cluster-tool/cluster-tool.toml
#   File:   --config <path>
#   Env:    {ENV_PREFIX}_* environment variables (e.g. {ENV_PREFIX}_MAX_HISTORY=20)

# Number of undo snapshots kept
# max_history = {DEFAULT_MAX_HISTORY}

# Largest snapshot file accepted, in bytes
# max_input_bytes = {DEFAULT_MAX_INPUT_BYTES}

# Pretty-print exported JSON
# pretty = true
"#
        )
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_default_settings_when_created_then_has_expected_limits() {
        let settings = Settings::default();
        assert_eq!(settings.max_history, 10);
        assert_eq!(settings.max_input_bytes, 10 * 1024 * 1024);
        assert!(settings.pretty);
    }

    #[test]
    fn test_merge_with_overrides_only_specified() {
        let base = Settings::default();
        let overlay = RawSettings {
            max_history: Some(3),
            ..Default::default()
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.max_history, 3);
        assert_eq!(merged.max_input_bytes, base.max_input_bytes);
        assert_eq!(merged.pretty, base.pretty);
    }

    #[test]
    fn test_validate_rejects_zero_history() {
        let settings = Settings {
            max_history: 0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ApplicationError::Config { .. })
        ));
    }

    #[test]
    fn test_template_parses_as_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.max_history.is_none());
    }

    #[test]
    fn test_to_toml_round_trips() {
        let settings = Settings {
            max_history: 4,
            max_input_bytes: 1024,
            pretty: false,
        };
        let text = settings.to_toml().unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }
}
