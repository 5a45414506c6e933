//! Startup settings loaded from a TOML file.
//!
//! Every table and field is optional:
//!
//! ```toml
//! [quota]
//! max_files = 10
//! max_processes_per_hour = 50
//!
//! [assets]
//! impulses = "/srv/pedalrack/impulses"
//!
//! [presets]
//! dir = "/srv/pedalrack/presets"
//! ```

use pedalrack_quota::QuotaLimits;
use pedalrack_registry::AssetRoots;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::paths;

/// Asset directories file-valued parameters are confined to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    /// Impulse response directory for the convolution effect.
    pub impulses: PathBuf,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            impulses: paths::user_impulses_dir(),
        }
    }
}

impl AssetSettings {
    /// Registry asset roots for these settings.
    pub fn roots(&self) -> AssetRoots {
        AssetRoots {
            impulses: self.impulses.clone(),
        }
    }
}

/// Preset store location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetSettings {
    /// Directory holding one JSON record per preset.
    pub dir: PathBuf,
}

impl Default for PresetSettings {
    fn default() -> Self {
        Self {
            dir: paths::user_presets_dir(),
        }
    }
}

/// All settings, fixed for the life of the process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Per-client limits.
    pub quota: QuotaLimits,
    /// Asset directories.
    pub assets: AssetSettings,
    /// Preset store.
    pub presets: PresetSettings,
}

impl Settings {
    /// Parse settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TomlParse`] for malformed TOML or mistyped fields.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load settings from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let settings = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// Load settings from a file, falling back to defaults when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            Ok(Self::default())
        }
    }

    /// Render as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TomlSerialize`] if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write settings to a file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)?;
        }
        fs::write(path, self.to_toml()?).map_err(|e| ConfigError::write_file(path, e))
    }
}
