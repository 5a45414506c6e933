//! Effect catalog and parameter schemas for pedalrack.
//!
//! This crate provides the immutable registry every effect request is checked
//! against. Each entry maps an effect identifier to an [`EffectDefinition`]: display
//! metadata, the engine plugin type, and a [`ParamSpec`] per parameter.
//!
//! # Features
//!
//! - **Effect Discovery**: List all effects with resolved parameter metadata
//! - **Case-insensitive Lookup**: Identifiers and aliases resolve to one canonical entry
//! - **Tag System**: Effects organized by tag (dynamics, filter, spatial, ...)
//! - **Construction Invariants**: Duplicate aliases or option-less enums fail the build
//!
//! # Example
//!
//! ```rust
//! use pedalrack_registry::{AssetRoots, EffectRegistry, EffectTag};
//!
//! let registry = EffectRegistry::builtin(&AssetRoots::default()).unwrap();
//!
//! // Aliases and case differences resolve to the canonical entry
//! let gate = registry.lookup("Gate").unwrap();
//! assert_eq!(gate.id, "noisegate");
//!
//! // Filter by tag
//! for effect in registry.effects_with_tag(EffectTag::Filter) {
//!     println!("Filter: {}", effect.name);
//! }
//!
//! // Catalog listing for UIs
//! let catalog = registry.list_all();
//! assert_eq!(catalog[0].id, "reverb");
//! ```
//!
//! The registry is built once at startup and never written to again; share it
//! behind an `Arc` for concurrent readers.

mod catalog;
mod definition;
mod error;
mod param;

pub use catalog::{AssetRoots, LADDER_MODES, RESAMPLE_QUALITIES, builtin_effects};
pub use definition::{EffectDefinition, EffectSummary, EffectTag, ParamSummary};
pub use error::RegistryError;
pub use param::{OptionSource, ParamSpec, ParamType, Transform};

use std::collections::{HashMap, HashSet};

/// Registry of all available effects.
///
/// Entries keep registration order. Lookups go through two indexes keyed by the
/// lowercase identifier and the lowercase alias.
#[derive(Debug)]
pub struct EffectRegistry {
    entries: Vec<EffectDefinition>,
    ids: HashMap<String, usize>,
    aliases: HashMap<String, usize>,
}

impl EffectRegistry {
    /// Build a registry with all built-in effects registered.
    ///
    /// File-valued parameters are sandboxed to the directories in `roots`.
    pub fn builtin(roots: &AssetRoots) -> Result<Self, RegistryError> {
        builtin_effects(roots)
            .into_iter()
            .fold(RegistryBuilder::new(), RegistryBuilder::register)
            .build()
    }

    /// Start an empty registry builder.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Resolve an identifier or alias to the canonical identifier.
    pub fn canonical_id(&self, id: &str) -> Option<&str> {
        self.index_of(id).map(|idx| self.entries[idx].id.as_str())
    }

    /// Look up a definition by identifier or alias (case-insensitive).
    pub fn get(&self, id: &str) -> Option<&EffectDefinition> {
        self.index_of(id).map(|idx| &self.entries[idx])
    }

    /// Look up a definition, failing with [`RegistryError::NotFound`] naming `id`.
    pub fn lookup(&self, id: &str) -> Result<&EffectDefinition, RegistryError> {
        self.get(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    /// Returns all definitions in registration order.
    pub fn all_effects(&self) -> &[EffectDefinition] {
        &self.entries
    }

    /// Returns definitions carrying a tag.
    pub fn effects_with_tag(&self, tag: EffectTag) -> Vec<&EffectDefinition> {
        self.entries.iter().filter(|e| e.has_tag(tag)).collect()
    }

    /// Catalog summaries in registration order.
    ///
    /// Options sourced from a directory are listed during this call, so two calls
    /// can advertise different options for the same parameter.
    pub fn list_all(&self) -> Vec<EffectSummary> {
        self.entries.iter().map(EffectDefinition::summary).collect()
    }

    /// Returns the number of registered effects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no effects are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        let key = id.to_lowercase();
        self.ids
            .get(&key)
            .or_else(|| self.aliases.get(&key))
            .copied()
    }
}

/// Collects definitions and checks registry invariants on [`build`](Self::build).
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: Vec<EffectDefinition>,
}

impl RegistryBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an effect definition.
    pub fn register(mut self, definition: EffectDefinition) -> Self {
        self.entries.push(definition);
        self
    }

    /// Check invariants and build the registry.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::DuplicateId`] if two effects share an identifier
    /// - [`RegistryError::DuplicateAlias`] if an alias is claimed twice or shadows an identifier
    /// - [`RegistryError::EmptyEnumOptions`] if an `enum` parameter has no options
    /// - [`RegistryError::RangeOnNonNumeric`] if `min`/`max` is set on a non-numeric parameter
    /// - [`RegistryError::DuplicateParam`] if a parameter or engine argument name repeats
    pub fn build(self) -> Result<EffectRegistry, RegistryError> {
        let mut ids = HashMap::with_capacity(self.entries.len());
        for (idx, entry) in self.entries.iter().enumerate() {
            check_params(entry)?;
            if ids.insert(entry.id.to_lowercase(), idx).is_some() {
                return Err(RegistryError::DuplicateId(entry.id.clone()));
            }
        }

        let mut aliases: HashMap<String, usize> = HashMap::new();
        for (idx, entry) in self.entries.iter().enumerate() {
            for alias in &entry.aliases {
                let key = alias.to_lowercase();
                let claimed = aliases.get(&key).or_else(|| ids.get(&key)).copied();
                if let Some(first) = claimed {
                    return Err(RegistryError::DuplicateAlias {
                        alias: alias.clone(),
                        first: self.entries[first].id.clone(),
                        second: entry.id.clone(),
                    });
                }
                aliases.insert(key, idx);
            }
        }

        tracing::debug!(
            effects = self.entries.len(),
            aliases = aliases.len(),
            "effect registry built"
        );

        Ok(EffectRegistry {
            entries: self.entries,
            ids,
            aliases,
        })
    }
}

fn check_params(entry: &EffectDefinition) -> Result<(), RegistryError> {
    let mut names = HashSet::with_capacity(entry.params.len());
    let mut args = HashSet::with_capacity(entry.params.len());
    for (name, spec) in &entry.params {
        if !names.insert(name.as_str()) {
            return Err(RegistryError::DuplicateParam {
                effect: entry.id.clone(),
                param: name.clone(),
            });
        }
        let arg = spec.engine_arg(name);
        if !args.insert(arg) {
            return Err(RegistryError::DuplicateParam {
                effect: entry.id.clone(),
                param: arg.to_string(),
            });
        }

        if (spec.min.is_some() || spec.max.is_some()) && !spec.kind.is_numeric() {
            return Err(RegistryError::RangeOnNonNumeric {
                effect: entry.id.clone(),
                param: name.clone(),
            });
        }

        let empty_enum = spec.kind == ParamType::Enum
            && match &spec.options {
                OptionSource::None => true,
                OptionSource::Fixed(options) => options.is_empty(),
                OptionSource::Directory(_) => false,
            };
        if empty_enum {
            return Err(RegistryError::EmptyEnumOptions {
                effect: entry.id.clone(),
                param: name.clone(),
            });
        }
    }
    Ok(())
}
