//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/timberyard/timberyard.toml`
//! 3. Local config: `<data_dir>/.timberyard.toml`
//! 4. Environment variables: `TIMBERYARD_*` prefix
//! 5. Explicit data directory (`--data-dir`)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::ValidationRules;

const APP_NAME: &str = "timberyard";

/// Where records are kept.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON documents under `data_dir`
    #[default]
    File,
    /// Process memory only; everything is lost on exit
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown storage backend: {other}")),
        }
    }
}

/// Payload validation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ValidationConfig {
    /// Accept `0` for numeric fields (diameter, length, price).
    /// Off by default: zero counts as an empty field.
    pub allow_zero: bool,
}

impl From<&ValidationConfig> for ValidationRules {
    fn from(config: &ValidationConfig) -> Self {
        ValidationRules {
            allow_zero: config.allow_zero,
        }
    }
}

/// Raw validation config for intermediate parsing (`None` = not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawValidationConfig {
    pub allow_zero: Option<bool>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_dir: Option<PathBuf>,
    pub storage: Option<StorageBackend>,
    pub validation: RawValidationConfig,
}

/// Unified configuration for timberyard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding `trees.json` and `timbers.json`
    pub data_dir: PathBuf,
    /// Storage backend
    pub storage: StorageBackend,
    /// Payload validation
    pub validation: ValidationConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage: StorageBackend::default(),
            validation: ValidationConfig::default(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.timberyard"))
}

/// Get the XDG config directory for timberyard.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("timberyard.toml"))
}

/// Get the path to the local config file in a data directory.
pub fn local_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(".timberyard.toml")
}

/// Expand `~`, `$VAR` and `${VAR}`; unknown variables leave the input unchanged.
fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
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
    pub fn tree_store_path(&self) -> PathBuf {
        self.data_dir.join("trees.json")
    }

    pub fn timber_store_path(&self) -> PathBuf {
        self.data_dir.join("timbers.json")
    }

    pub fn validation_rules(&self) -> ValidationRules {
        ValidationRules::from(&self.validation)
    }

    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_dir: overlay
                .data_dir
                .clone()
                .unwrap_or_else(|| self.data_dir.clone()),
            storage: overlay.storage.unwrap_or(self.storage),
            validation: ValidationConfig {
                allow_zero: overlay
                    .validation
                    .allow_zero
                    .unwrap_or(self.validation.allow_zero),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `data_dir` - Explicit data directory; wins over every other layer and
    ///   is also where the local config file is looked up.
    pub fn load(data_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        let local_dir = data_dir
            .map(expand_path)
            .unwrap_or_else(|| expand_path(&current.data_dir));
        let local_path = local_config_path(&local_dir);
        if local_path.exists() {
            let raw = load_raw_settings(&local_path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;

        if let Some(dir) = data_dir {
            current.data_dir = dir.to_path_buf();
        }
        current.data_dir = expand_path(&current.data_dir);

        Ok(current)
    }

    /// Apply TIMBERYARD_* environment variables as explicit overrides.
    ///
    /// Nested keys use `__`: `TIMBERYARD_VALIDATION__ALLOW_ZERO=true`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TIMBERYARD")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value(config.get_string("data_dir"))? {
            settings.data_dir = PathBuf::from(val);
        }
        if let Some(val) = env_value(config.get_string("storage"))? {
            settings.storage = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }
        if let Some(val) = env_value(config.get_bool("validation.allow_zero"))? {
            settings.validation.allow_zero = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# timberyard configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/timberyard/timberyard.toml
#   Local:  <data_dir>/.timberyard.toml
#   Env:    TIMBERYARD_* environment variables (nested keys use __)

# Directory holding trees.json and timbers.json
# data_dir = "~/.local/share/timberyard"

# Storage backend: "file" (durable) or "memory" (lost on exit)
# storage = "file"

[validation]
# Accept 0 for diameter, length and price.
# By default zero is treated as an empty field and rejected.
# allow_zero = false
"#
        .to_string()
    }
}

/// An unset variable is `None`; a set but unparseable one is an error.
fn env_value<T>(result: Result<T, ConfigError>) -> Result<Option<T>, ApplicationError> {
    match result {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
