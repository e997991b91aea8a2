//! Front-end configuration, read from `~/.excursion/config.yaml`.
//!
//! Every loader has two forms, like the rest of the crate's filesystem API:
//! - `fn_at(home: &Path, …)` — explicit home; used in tests with a temp dir
//! - `fn(…)` — derives home from `dirs::home_dir()`, delegates to `_at`
//!
//! A missing default config file is not an error; defaults apply.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Settings for the interactive front end. All fields are optional in YAML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExcursionConfig {
    /// Prompt shown before each command.
    pub prompt: String,
    /// Force colour on or off; `None` decides from the terminal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Directory of `.tera` files overriding the built-in messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_dir: Option<PathBuf>,
    /// Echo each command read from a script or pipe before its output.
    pub echo: bool,
}

impl Default for ExcursionConfig {
    fn default() -> Self {
        Self {
            prompt: "excursion> ".to_string(),
            color: None,
            log_level: "warn".to_string(),
            template_dir: None,
            echo: false,
        }
    }
}

/// `<home>/.excursion/config.yaml` — pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(".excursion").join("config.yaml")
}

/// Load `<home>/.excursion/config.yaml`, or defaults if the file is absent.
pub fn load_at(home: &Path) -> Result<ExcursionConfig, ConfigError> {
    let path = config_path_at(home);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file; using defaults");
        return Ok(ExcursionConfig::default());
    }
    load_from(&path)
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<ExcursionConfig, ConfigError> {
    load_at(&home()?)
}

/// Load an explicitly named config file. Unlike [`load_at`], absence is an error.
pub fn load_from(path: &Path) -> Result<ExcursionConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound { path: path.to_path_buf() });
    }
    let contents = std::fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(ExcursionConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn config_path_is_correct() {
        let home = TempDir::new().expect("tempdir");
        assert!(config_path_at(home.path()).ends_with(".excursion/config.yaml"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let home = TempDir::new().expect("tempdir");
        let config = load_at(home.path()).expect("load");
        assert_eq!(config, ExcursionConfig::default());
    }

    #[test]
    fn explicit_missing_file_is_not_found() {
        let home = TempDir::new().expect("tempdir");
        let err = load_from(&home.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }), "got: {err}");
    }

    #[test]
    fn defaults_serialize_without_optional_fields() {
        let yaml = serde_yaml::to_string(&ExcursionConfig::default()).expect("serialize");
        assert!(yaml.contains("prompt"));
        assert!(!yaml.contains("template_dir"));
    }
}
