//! Preset persistence.
//!
//! Each preset is one pretty-printed JSON file named `<id>.json` inside the store
//! directory:
//!
//! ```json
//! {
//!   "id": "6f1c0c8e2b7d4e0f9a3b5c7d9e1f2a4b",
//!   "name": "Telephone",
//!   "description": "",
//!   "created_at": "2025-03-01T12:00:00Z",
//!   "effects": [
//!     { "type": "highpass", "params": { "cutoff_frequency_hz": 300 } },
//!     { "type": "lowpass", "params": { "cutoff_frequency_hz": 3400 } }
//!   ],
//!   "schema_version": 1
//! }
//! ```
//!
//! Effects are stored in request form, so every later resolution re-applies the
//! registry's current rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::ConfigError;
use crate::resolver::{ChainResolver, EffectChain, EffectRequest};

/// Current preset record layout.
pub const SCHEMA_VERSION: u32 = 1;

const PRESET_EXTENSION: &str = "json";

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// A stored, named effect chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Opaque identifier, 32 lowercase hex digits.
    pub id: String,
    /// Display name, never empty.
    pub name: String,
    /// Free-form description, empty when none was given.
    #[serde(default)]
    pub description: String,
    /// Creation time (UTC).
    pub created_at: DateTime<Utc>,
    /// The chain in request form.
    pub effects: Vec<EffectRequest>,
    /// Arbitrary client metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    /// Record layout version.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
}

impl Preset {
    /// Listing view of this preset.
    pub fn summary(&self) -> PresetSummary {
        PresetSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            created_at: self.created_at,
            effects_count: self.effects.len(),
        }
    }
}

/// One row of [`PresetStore::list`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresetSummary {
    /// Preset id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Number of effects in the chain.
    pub effects_count: usize,
}

/// Input to [`PresetStore::create`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewPreset {
    /// Display name.
    pub name: String,
    /// Chain in request form.
    pub effects: Vec<EffectRequest>,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional metadata object.
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

impl NewPreset {
    /// A preset with a name and chain.
    pub fn new(name: impl Into<String>, effects: Vec<EffectRequest>) -> Self {
        Self {
            name: name.into(),
            effects,
            description: None,
            metadata: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the metadata object.
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Directory-backed preset store.
///
/// Presets are validated against the resolver before they are written, so a
/// stored preset always resolved at the time it was created.
#[derive(Debug, Clone)]
pub struct PresetStore {
    dir: PathBuf,
    resolver: ChainResolver,
}

impl PresetStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CreateDir`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>, resolver: ChainResolver) -> Result<Self, ConfigError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
        Ok(Self { dir, resolver })
    }

    /// The store directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The resolver presets are validated with.
    pub fn resolver(&self) -> &ChainResolver {
        &self.resolver
    }

    /// Validate and persist a new preset.
    ///
    /// Nothing is written unless every effect resolves. The record is written to a
    /// temporary file and renamed into place.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyPresetName`] for a blank name
    /// - [`ConfigError::Validation`] if the chain does not resolve
    /// - I/O errors while writing
    pub fn create(&self, new: NewPreset) -> Result<Preset, ConfigError> {
        if new.name.trim().is_empty() {
            return Err(ConfigError::EmptyPresetName);
        }
        self.resolver.resolve_chain(&new.effects)?;

        let preset = Preset {
            id: Uuid::new_v4().simple().to_string(),
            name: new.name,
            description: new.description.unwrap_or_default(),
            created_at: Utc::now(),
            effects: new.effects,
            metadata: new.metadata.filter(|m| !m.is_empty()),
            schema_version: SCHEMA_VERSION,
        };

        let json = serde_json::to_string_pretty(&preset).map_err(ConfigError::JsonSerialize)?;
        let path = self.record_path(&preset.id);
        let staging = self.dir.join(format!(".{}.{PRESET_EXTENSION}.tmp", preset.id));
        fs::write(&staging, json).map_err(|e| ConfigError::write_file(&staging, e))?;
        if let Err(e) = fs::rename(&staging, &path) {
            let _ = fs::remove_file(&staging);
            return Err(ConfigError::write_file(&path, e));
        }

        tracing::info!(id = %preset.id, name = %preset.name, effects = preset.effects.len(), "preset created");
        Ok(preset)
    }

    /// Load a preset by id.
    ///
    /// # Errors
    ///
    /// [`ConfigError::PresetNotFound`] if no such preset exists.
    pub fn load(&self, id: &str) -> Result<Preset, ConfigError> {
        let path = self.path_of(id)?;
        read_preset(&path)
    }

    /// Load a preset and resolve its chain against the current registry.
    ///
    /// # Errors
    ///
    /// [`ConfigError::PresetNotFound`], or [`ConfigError::Validation`] if the stored
    /// chain no longer resolves.
    pub fn resolve(&self, id: &str) -> Result<EffectChain, ConfigError> {
        let preset = self.load(id)?;
        Ok(self.resolver.resolve_chain(&preset.effects)?)
    }

    /// Summaries of all readable presets, ordered by file name.
    ///
    /// Records that fail to parse are skipped. A missing directory lists as empty.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ReadFile`] if the directory exists but cannot be read.
    pub fn list(&self) -> Result<Vec<PresetSummary>, ConfigError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ConfigError::read_file(&self.dir, e)),
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().is_some_and(|ext| ext == PRESET_EXTENSION)
            })
            .collect();
        paths.sort();

        Ok(paths
            .iter()
            .filter_map(|path| match read_preset(path) {
                Ok(preset) => Some(preset.summary()),
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "skipping unreadable preset");
                    None
                }
            })
            .collect())
    }

    /// Delete a preset.
    ///
    /// # Errors
    ///
    /// [`ConfigError::PresetNotFound`] if no such preset exists.
    pub fn delete(&self, id: &str) -> Result<(), ConfigError> {
        let path = self.path_of(id)?;
        fs::remove_file(&path).map_err(|e| ConfigError::remove_file(&path, e))?;
        tracing::info!(id, "preset deleted");
        Ok(())
    }

    /// Path of the stored record, for serving it as a download.
    ///
    /// Ids that are not plain hex never map to a path.
    ///
    /// # Errors
    ///
    /// [`ConfigError::PresetNotFound`] if no such preset exists.
    pub fn path_of(&self, id: &str) -> Result<PathBuf, ConfigError> {
        if !is_preset_id(id) {
            return Err(ConfigError::PresetNotFound(id.to_string()));
        }
        let path = self.record_path(id);
        if path.is_file() {
            Ok(path)
        } else {
            Err(ConfigError::PresetNotFound(id.to_string()))
        }
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.{PRESET_EXTENSION}"))
    }
}

fn is_preset_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= 64 && id.bytes().all(|b| b.is_ascii_hexdigit())
}

fn read_preset(path: &Path) -> Result<Preset, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    serde_json::from_str(&contents).map_err(|e| ConfigError::json_parse(path, e))
}
