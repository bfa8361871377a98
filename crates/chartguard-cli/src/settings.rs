use std::path::{Path, PathBuf};

use chartguard_contrast::{TextSize, WcagLevel};
use chartguard_validate::{ChartSchema, UrlPolicy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings file picked up from the working directory when `--config` is absent.
pub const DEFAULT_SETTINGS_FILE: &str = "chartguard.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WcagSettings {
    pub level: WcagLevel,
    pub size: TextSize,
}

/// Operator settings; every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub wcag: WcagSettings,
    pub url: UrlPolicy,
    pub limits: ChartSchema,
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Load settings from `path`, or from `chartguard.toml` when it exists.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, SettingsError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let fallback = PathBuf::from(DEFAULT_SETTINGS_FILE);
            if !fallback.exists() {
                tracing::debug!(event = "settings_defaulted");
                return Ok(Settings::default());
            }
            fallback
        }
    };

    let content = std::fs::read_to_string(&path).map_err(|source| SettingsError::Io {
        path: path.clone(),
        source,
    })?;
    let settings =
        Settings::from_toml_str(&content).map_err(|source| SettingsError::Toml {
            path: path.clone(),
            source,
        })?;
    tracing::debug!(event = "settings_loaded", path = %path.display());
    Ok(settings)
}
