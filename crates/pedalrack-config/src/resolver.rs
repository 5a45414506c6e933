//! Resolution of effect requests into engine-ready chains.
//!
//! A request names an effect type and supplies raw parameters. Resolution looks
//! the type up in the [`EffectRegistry`], rejects undeclared parameters, fills in
//! defaults, and coerces every value. A chain resolves all-or-nothing: the first
//! failing effect aborts the whole chain.
//!
//! # Example
//!
//! ```rust
//! use pedalrack_config::{ChainResolver, EffectRequest};
//! use pedalrack_registry::{AssetRoots, EffectRegistry};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(EffectRegistry::builtin(&AssetRoots::default()).unwrap());
//! let resolver = ChainResolver::new(registry);
//!
//! let requests: Vec<EffectRequest> = serde_json::from_value(json!([
//!     {"type": "gain", "params": {"gain_db": 6}},
//!     {"type": "reverb"}
//! ]))
//! .unwrap();
//!
//! let chain = resolver.resolve_chain(&requests).unwrap();
//! assert_eq!(chain.len(), 2);
//! assert_eq!(chain.effects()[0].id, "gain");
//! ```

use pedalrack_registry::EffectRegistry;
use serde::ser::Serializer;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::validation::{ParamValue, ValidationError, ValidationResult, coerce};

/// One effect as a client sends it: `{"type": ..., "params": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectRequest {
    /// Effect identifier or alias, any case.
    #[serde(rename = "type")]
    pub effect_type: String,

    /// Raw parameter values keyed by parameter name. Absent and `null` both mean empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub params: Map<String, Value>,
}

impl EffectRequest {
    /// Request with no parameters.
    pub fn new(effect_type: impl Into<String>) -> Self {
        Self {
            effect_type: effect_type.into(),
            params: Map::new(),
        }
    }

    /// Add a raw parameter value.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Map<String, Value>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A validated effect ready for the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedEffect {
    /// Canonical effect id.
    pub id: String,
    /// Engine plugin type to instantiate.
    pub plugin: String,
    /// Constructor arguments in declaration order, keyed by engine argument name.
    #[serde(serialize_with = "args_as_map")]
    pub args: Vec<(String, ParamValue)>,
}

impl ResolvedEffect {
    /// Look up an argument by engine argument name.
    pub fn arg(&self, name: &str) -> Option<&ParamValue> {
        self.args
            .iter()
            .find(|(arg, _)| arg == name)
            .map(|(_, value)| value)
    }
}

fn args_as_map<S>(args: &[(String, ParamValue)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(args.iter().map(|(name, value)| (name, value)))
}

/// An ordered, fully resolved signal path. Empty chains are valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EffectChain {
    effects: Vec<ResolvedEffect>,
}

impl EffectChain {
    /// The effects in processing order.
    pub fn effects(&self) -> &[ResolvedEffect] {
        &self.effects
    }

    /// Consume the chain.
    pub fn into_effects(self) -> Vec<ResolvedEffect> {
        self.effects
    }

    /// Returns the number of effects.
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Returns true if the chain has no effects.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Iterate in processing order.
    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedEffect> {
        self.effects.iter()
    }
}

impl<'a> IntoIterator for &'a EffectChain {
    type Item = &'a ResolvedEffect;
    type IntoIter = std::slice::Iter<'a, ResolvedEffect>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Validates requests against a shared registry.
#[derive(Debug, Clone)]
pub struct ChainResolver {
    registry: Arc<EffectRegistry>,
}

impl ChainResolver {
    /// Create a resolver over `registry`.
    pub fn new(registry: Arc<EffectRegistry>) -> Self {
        Self { registry }
    }

    /// The registry requests are checked against.
    pub fn registry(&self) -> &EffectRegistry {
        &self.registry
    }

    /// Resolve one effect.
    ///
    /// For each declared parameter the supplied value is used if present, else the
    /// default. A null result fails if the parameter is required, is omitted if it
    /// skips nulls, and is coerced otherwise.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::UnknownEffect`] naming `effect_type`
    /// - [`ValidationError::UnknownParameters`] listing every undeclared name
    /// - [`ValidationError::MissingParameter`] for a required parameter with no value
    /// - any coercion error from [`coerce`]
    pub fn resolve(
        &self,
        effect_type: &str,
        params: &Map<String, Value>,
    ) -> ValidationResult<ResolvedEffect> {
        let definition = self
            .registry
            .get(effect_type)
            .ok_or_else(|| ValidationError::UnknownEffect(effect_type.to_string()))?;

        let mut unknown: Vec<String> = params
            .keys()
            .filter(|name| !definition.has_param(name))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            unknown.sort();
            return Err(ValidationError::UnknownParameters {
                effect: definition.id.clone(),
                params: unknown,
            });
        }

        let mut args = Vec::with_capacity(definition.params.len());
        for (name, spec) in &definition.params {
            let raw = params
                .get(name)
                .or(spec.default.as_ref())
                .filter(|value| !value.is_null());

            let value = match raw {
                Some(raw) => coerce(name, spec, raw)?,
                None if spec.required => {
                    return Err(ValidationError::MissingParameter {
                        effect: definition.id.clone(),
                        param: name.clone(),
                    });
                }
                None if spec.skip_if_none => continue,
                None => coerce(name, spec, &Value::Null)?,
            };
            args.push((spec.engine_arg(name).to_string(), value));
        }

        tracing::debug!(effect = %definition.id, args = args.len(), "effect resolved");

        Ok(ResolvedEffect {
            id: definition.id.clone(),
            plugin: definition.plugin.clone(),
            args,
        })
    }

    /// Resolve one request.
    pub fn resolve_request(&self, request: &EffectRequest) -> ValidationResult<ResolvedEffect> {
        self.resolve(&request.effect_type, &request.params)
    }

    /// Resolve requests in order, failing the whole chain on the first error.
    ///
    /// # Errors
    ///
    /// [`ValidationError::AtPosition`] wrapping the first failure.
    pub fn resolve_chain(&self, requests: &[EffectRequest]) -> ValidationResult<EffectChain> {
        let effects = requests
            .iter()
            .enumerate()
            .map(|(index, request)| {
                self.resolve_request(request)
                    .map_err(|source| ValidationError::AtPosition {
                        index,
                        effect: request.effect_type.clone(),
                        source: Box::new(source),
                    })
            })
            .collect::<ValidationResult<Vec<_>>>()?;

        tracing::debug!(effects = effects.len(), "chain resolved");
        Ok(EffectChain { effects })
    }
}
