//! Request validation, presets, and settings for pedalrack.
//!
//! This crate turns client requests into engine-ready effect chains and keeps the
//! state around them.
//!
//! # Features
//!
//! - **Validation**: Per-type coercion, inclusive bounds, and sandboxed file references
//! - **Chain Resolution**: All-or-nothing resolution of ordered effect requests
//! - **Preset Store**: Named chains persisted as JSON records, re-validated on use
//! - **Gateway**: Quota check, resolution, and engine hand-off in one call
//! - **Settings**: TOML settings file with platform-specific default paths
//!
//! # Example
//!
//! ```rust,no_run
//! use pedalrack_config::{ChainResolver, EffectRequest, NewPreset, PresetStore, Settings};
//! use pedalrack_registry::EffectRegistry;
//! use std::sync::Arc;
//!
//! let settings = Settings::load_or_default(pedalrack_config::paths::default_settings_path())?;
//! let registry = Arc::new(EffectRegistry::builtin(&settings.assets.roots())?);
//! let store = PresetStore::open(&settings.presets.dir, ChainResolver::new(registry))?;
//!
//! let preset = store.create(NewPreset::new(
//!     "Slapback",
//!     vec![EffectRequest::new("delay").with_param("delay_seconds", 0.12)],
//! ))?;
//! let chain = store.resolve(&preset.id)?;
//! assert_eq!(chain.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod gateway;
mod resolver;
mod sandbox;
mod settings;
mod store;

/// Boundary to the audio engine.
pub mod engine;

/// Platform-specific paths for settings, presets, and assets.
pub mod paths;

/// Parameter validation and coercion.
pub mod validation;

pub use engine::{AudioBuffer, EffectEngine, process_chain};
pub use error::ConfigError;
pub use gateway::{ChainSource, Gateway, GatewayError};
pub use resolver::{ChainResolver, EffectChain, EffectRequest, ResolvedEffect};
pub use settings::{AssetSettings, PresetSettings, Settings};
pub use store::{NewPreset, Preset, PresetStore, PresetSummary, SCHEMA_VERSION};
pub use validation::{ParamValue, ValidationError, ValidationResult, coerce};

/// Re-export commonly used types from pedalrack-registry
pub use pedalrack_registry::{EffectDefinition, EffectRegistry, ParamSpec, ParamType};
