//! Effect definitions and catalog summaries.

use serde::Serialize;
use serde_json::Value;

use crate::param::{ParamSpec, ParamType};

/// Classification tag for organizing and filtering effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectTag {
    /// Room, echo and stereo-field effects (reverb, delay, convolution)
    Spatial,
    /// Effects driven by a delay time
    Time,
    /// Compressors, limiters, gates
    Dynamics,
    /// Gain stages, polarity, resampling
    Utility,
    /// Saturation, clipping, lo-fi and codec artifacts
    Color,
    /// Chorus, phaser, pitch shifting
    Modulation,
    /// Pass, shelf and peak filters
    Filter,
    /// Hosted third-party processors
    External,
}

impl EffectTag {
    /// Returns the wire name of the tag.
    pub const fn name(&self) -> &'static str {
        match self {
            EffectTag::Spatial => "spatial",
            EffectTag::Time => "time",
            EffectTag::Dynamics => "dynamics",
            EffectTag::Utility => "utility",
            EffectTag::Color => "color",
            EffectTag::Modulation => "modulation",
            EffectTag::Filter => "filter",
            EffectTag::External => "external",
        }
    }

    /// Parse a tag from its wire name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        const ALL: [EffectTag; 8] = [
            EffectTag::Spatial,
            EffectTag::Time,
            EffectTag::Dynamics,
            EffectTag::Utility,
            EffectTag::Color,
            EffectTag::Modulation,
            EffectTag::Filter,
            EffectTag::External,
        ];
        ALL.into_iter().find(|tag| tag.name().eq_ignore_ascii_case(name))
    }
}

/// Describes an effect: identity, engine plugin type and parameter schema.
///
/// Parameters keep their declaration order, which is also the order the resolved
/// instance lists its arguments in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectDefinition {
    /// Canonical identifier (lowercase, no spaces).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Brief description.
    pub description: String,
    /// Engine plugin type the resolved instance is built with.
    pub plugin: String,
    /// Parameter schemas in declaration order.
    pub params: Vec<(String, ParamSpec)>,
    /// Classification tags.
    pub tags: Vec<EffectTag>,
    /// Optional usage notes.
    pub notes: Option<String>,
    /// Alternative identifiers resolving to this effect.
    pub aliases: Vec<String>,
}

impl EffectDefinition {
    /// Start a definition with no parameters.
    pub fn new(id: impl Into<String>, name: impl Into<String>, plugin: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            plugin: plugin.into(),
            params: Vec::new(),
            tags: Vec::new(),
            notes: None,
            aliases: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Declare a parameter.
    pub fn with_param(mut self, name: impl Into<String>, spec: ParamSpec) -> Self {
        self.params.push((name.into(), spec));
        self
    }

    /// Set the classification tags.
    pub fn with_tags(mut self, tags: &[EffectTag]) -> Self {
        self.tags = tags.to_vec();
        self
    }

    /// Attach usage notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Add an alias identifier.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Look up a parameter schema by name.
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params
            .iter()
            .find(|(param_name, _)| param_name == name)
            .map(|(_, spec)| spec)
    }

    /// Returns true if the effect declares a parameter called `name`.
    pub fn has_param(&self, name: &str) -> bool {
        self.param(name).is_some()
    }

    /// Declared parameter names in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|(name, _)| name.as_str())
    }

    /// Returns true if the effect carries `tag`.
    pub fn has_tag(&self, tag: EffectTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Build the catalog summary, resolving directory-sourced options now.
    pub fn summary(&self) -> EffectSummary {
        EffectSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            params: self
                .params
                .iter()
                .map(|(name, spec)| ParamSummary::new(name, spec))
                .collect(),
            tags: self.tags.clone(),
            notes: self.notes.clone(),
            aliases: self.aliases.clone(),
        }
    }
}

/// Catalog entry for UIs and API listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectSummary {
    /// Canonical identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Brief description.
    pub description: String,
    /// Parameter summaries in declaration order.
    pub params: Vec<ParamSummary>,
    /// Classification tags.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<EffectTag>,
    /// Usage notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Alias identifiers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

/// Catalog view of one parameter. Absent fields are omitted when serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamSummary {
    /// Parameter name.
    pub name: String,
    /// Type tag.
    #[serde(rename = "type")]
    pub kind: ParamType,
    /// Default value (null when none).
    pub default: Option<Value>,
    /// Inclusive lower bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Inclusive upper bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Current allowed values; omitted when none are defined or listed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Whether the parameter must be supplied.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    /// Help text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl ParamSummary {
    fn new(name: &str, spec: &ParamSpec) -> Self {
        Self {
            name: name.to_string(),
            kind: spec.kind,
            default: spec.default.clone(),
            min: spec.min,
            max: spec.max,
            options: spec.options.resolve().filter(|options| !options.is_empty()),
            required: spec.required,
            help: spec.help.clone(),
        }
    }
}
