use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TagpickConfig {
    pub version: u32,
    /// Vocabulary source identifier. Absent means the widget runs against
    /// the fallback vocabulary and saving new tags is disabled.
    pub source: Option<String>,
    /// Base directory for vocabulary table files. Defaults next to the
    /// config file when absent.
    pub store_dir: Option<PathBuf>,
    #[serde(default)]
    pub widget: WidgetConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WidgetConfig {
    #[serde(default = "default_multi_select")]
    pub multi_select: bool,
    #[serde(default)]
    pub tag_style: TagStyle,
    #[serde(default)]
    pub tag_appearance: TagAppearance,
    /// Theme name. Unrecognized values fall back to the default palette at
    /// render time; this is never a validation error.
    #[serde(default)]
    pub theme: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            multi_select: default_multi_select(),
            tag_style: TagStyle::default(),
            tag_appearance: TagAppearance::default(),
            theme: String::new(),
        }
    }
}

fn default_multi_select() -> bool {
    true
}

/// Shape of the chips in the selected row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagStyle {
    #[default]
    Rounded,
    Square,
}

/// Fill treatment of the chips in the selected row: a neutral fill, bare
/// text, or the theme's accent color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagAppearance {
    #[default]
    Filled,
    Outline,
    Brand,
}

impl Default for TagpickConfig {
    fn default() -> Self {
        Self {
            version: 1,
            source: None,
            store_dir: None,
            widget: WidgetConfig::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not resolve home directory for config path")]
    HomeDirectoryUnavailable,
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {message}")]
    Validation { message: String },
}

pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or(ConfigError::HomeDirectoryUnavailable)?;
    Ok(base_dirs
        .home_dir()
        .join(".config")
        .join("tagpick")
        .join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<TagpickConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: TagpickConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_config(&parsed)?;
    Ok(parsed)
}

/// A missing config file is the unconfigured-source case, not an error:
/// the widget still runs, against the fallback vocabulary. Malformed
/// configs are still rejected.
pub fn load_config_or_default(path: &Path) -> Result<TagpickConfig, ConfigError> {
    if !path.exists() {
        return Ok(TagpickConfig::default());
    }
    load_config(path)
}

pub fn validate_config(config: &TagpickConfig) -> Result<(), ConfigError> {
    if config.version != 1 {
        return Err(ConfigError::Validation {
            message: "version must be 1".to_string(),
        });
    }

    if let Some(source) = &config.source
        && source.trim().is_empty()
    {
        return Err(ConfigError::Validation {
            message: "source must be non-empty when set".to_string(),
        });
    }

    Ok(())
}
