//! Parameter schemas for registered effects.
//!
//! Every named parameter of an effect is described by a [`ParamSpec`]: a type tag,
//! a default, optional numeric bounds, where its allowed values come from, and how
//! the coerced value is turned into something the audio engine can consume.
//!
//! Option sources and transforms are closed enums rather than callbacks, so a
//! schema can be serialized, compared, and tested without an engine attached.
//!
//! # Example
//!
//! ```rust
//! use pedalrack_registry::{ParamSpec, ParamType};
//!
//! let mix = ParamSpec::float(0.5, 0.0, 1.0).with_help("Wet/dry balance");
//! assert_eq!(mix.kind, ParamType::Float);
//! assert_eq!(mix.min, Some(0.0));
//! assert!(!mix.required);
//!
//! let mode = ParamSpec::choice("LPF12", ["LPF12", "HPF12"]);
//! assert_eq!(mode.options.resolve().unwrap(), vec!["LPF12", "HPF12"]);
//! ```

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};

/// Type tag of an effect parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// Floating point number.
    Float,
    /// Integer.
    Int,
    /// Boolean flag, accepting textual forms such as `"on"`.
    Bool,
    /// One of a fixed or listed set of strings.
    Enum,
    /// Free-form string.
    String,
    /// File name resolved inside a sandboxed asset directory.
    File,
    /// JSON object passed through as a mapping.
    Dict,
}

impl ParamType {
    /// Wire name of the type tag.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ParamType::Float => "float",
            ParamType::Int => "int",
            ParamType::Bool => "bool",
            ParamType::Enum => "enum",
            ParamType::String => "string",
            ParamType::File => "file",
            ParamType::Dict => "dict",
        }
    }

    /// Returns true for types that `min`/`max` bounds apply to.
    pub const fn is_numeric(&self) -> bool {
        matches!(self, ParamType::Float | ParamType::Int)
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the allowed values of an `enum` or `file` parameter come from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", content = "value", rename_all = "lowercase")]
pub enum OptionSource {
    /// No option list; any value of the right type is accepted.
    None,
    /// A list fixed at registration time.
    Fixed(Vec<String>),
    /// The regular files currently present in a directory, listed on every read.
    Directory(PathBuf),
}

impl OptionSource {
    /// Resolve the current option list.
    ///
    /// Returns `None` when no source is defined. A directory source yields the
    /// sorted names of the regular files in it, and an empty list when the
    /// directory is missing or unreadable, so the advertised options track the
    /// directory contents between calls.
    pub fn resolve(&self) -> Option<Vec<String>> {
        match self {
            OptionSource::None => None,
            OptionSource::Fixed(options) => Some(options.clone()),
            OptionSource::Directory(dir) => Some(list_files(dir)),
        }
    }

    /// Returns true if a source is defined.
    pub fn is_defined(&self) -> bool {
        !matches!(self, OptionSource::None)
    }
}

/// Sorted names of the regular files directly inside `dir`.
fn list_files(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .collect();
    names.sort();
    names
}

/// Post-coercion step that turns a validated value into its engine-ready form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transform {
    /// Pass the coerced value through unchanged.
    None,
    /// Resolve a file name to an absolute path that must exist strictly inside `root`.
    SandboxedFile {
        /// Directory the resolved path must stay within.
        root: PathBuf,
    },
}

/// Schema of a single effect parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamSpec {
    /// Type tag driving coercion.
    #[serde(rename = "type")]
    pub kind: ParamType,
    /// Value used when the request omits the parameter. `None` is a null default.
    pub default: Option<Value>,
    /// Inclusive lower bound (numeric types only).
    pub min: Option<f64>,
    /// Inclusive upper bound (numeric types only).
    pub max: Option<f64>,
    /// Allowed values for `enum` and `file` parameters.
    pub options: OptionSource,
    /// Whether an absent, null, or empty value is an error.
    pub required: bool,
    /// Name of the engine constructor argument, when it differs from the parameter name.
    pub arg_name: Option<String>,
    /// Conversion applied after coercion and bounds checks.
    pub transform: Transform,
    /// Omit the parameter entirely when its effective value is null.
    pub skip_if_none: bool,
    /// Help text shown in catalog listings.
    pub help: Option<String>,
}

impl ParamSpec {
    /// Base schema for a type with the given default.
    pub fn new(kind: ParamType, default: Option<Value>) -> Self {
        Self {
            kind,
            default,
            min: None,
            max: None,
            options: OptionSource::None,
            required: false,
            arg_name: None,
            transform: Transform::None,
            skip_if_none: true,
            help: None,
        }
    }

    /// Float parameter bounded to `[min, max]`.
    pub fn float(default: f64, min: f64, max: f64) -> Self {
        Self::new(ParamType::Float, Some(Value::from(default))).with_range(min, max)
    }

    /// Integer parameter bounded to `[min, max]`.
    pub fn int(default: i64, min: i64, max: i64) -> Self {
        Self::new(ParamType::Int, Some(Value::from(default))).with_range(min as f64, max as f64)
    }

    /// Boolean parameter.
    pub fn boolean(default: bool) -> Self {
        Self::new(ParamType::Bool, Some(Value::Bool(default)))
    }

    /// Enum parameter with a fixed option list.
    pub fn choice<I, S>(default: &str, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ParamType::Enum, Some(Value::from(default)))
            .with_options(OptionSource::Fixed(options.into_iter().map(Into::into).collect()))
    }

    /// String parameter. A `None` default is a null default.
    pub fn string(default: Option<&str>) -> Self {
        Self::new(ParamType::String, default.map(Value::from))
    }

    /// Required file parameter listed from and sandboxed to `root`.
    pub fn sandboxed_file(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self::new(ParamType::File, Some(Value::from("")))
            .required()
            .with_options(OptionSource::Directory(root.clone()))
            .with_transform(Transform::SandboxedFile { root })
    }

    /// Dict parameter with a null default.
    pub fn dict() -> Self {
        Self::new(ParamType::Dict, None)
    }

    /// Set inclusive numeric bounds.
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Set the option source.
    pub fn with_options(mut self, options: OptionSource) -> Self {
        self.options = options;
        self
    }

    /// Set the transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Mark the parameter as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Rename the engine constructor argument.
    pub fn with_arg_name(mut self, arg_name: impl Into<String>) -> Self {
        self.arg_name = Some(arg_name.into());
        self
    }

    /// Attach help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Keep a null effective value and pass it through coercion instead of omitting it.
    pub fn keep_if_none(mut self) -> Self {
        self.skip_if_none = false;
        self
    }

    /// Argument name the engine receives for a parameter called `name`.
    pub fn engine_arg<'a>(&'a self, name: &'a str) -> &'a str {
        self.arg_name.as_deref().unwrap_or(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn float_constructor_sets_bounds_and_default() {
        let spec = ParamSpec::float(0.33, 0.0, 1.0);
        assert_eq!(spec.kind, ParamType::Float);
        assert_eq!(spec.default, Some(Value::from(0.33)));
        assert_eq!((spec.min, spec.max), (Some(0.0), Some(1.0)));
        assert!(spec.skip_if_none);
        assert_eq!(spec.transform, Transform::None);
    }

    #[test]
    fn int_constructor_converts_bounds() {
        let spec = ParamSpec::int(4, 1, 16);
        assert_eq!(spec.default, Some(Value::from(4)));
        assert_eq!((spec.min, spec.max), (Some(1.0), Some(16.0)));
    }

    #[test]
    fn string_with_null_default() {
        let spec = ParamSpec::string(None);
        assert!(spec.default.is_none());
        assert_eq!(spec.kind, ParamType::String);
    }

    #[test]
    fn engine_arg_falls_back_to_param_name() {
        let plain = ParamSpec::float(1.0, 0.0, 1.0);
        assert_eq!(plain.engine_arg("mix"), "mix");

        let renamed = ParamSpec::sandboxed_file("impulses").with_arg_name("impulse_response_filename");
        assert_eq!(renamed.engine_arg("impulse_response"), "impulse_response_filename");
    }

    #[test]
    fn sandboxed_file_is_required_and_listed() {
        let spec = ParamSpec::sandboxed_file("/srv/impulses");
        assert!(spec.required);
        assert_eq!(spec.options, OptionSource::Directory(PathBuf::from("/srv/impulses")));
        assert_eq!(
            spec.transform,
            Transform::SandboxedFile {
                root: PathBuf::from("/srv/impulses")
            }
        );
    }

    #[test]
    fn none_source_resolves_to_none() {
        assert_eq!(OptionSource::None.resolve(), None);
        assert!(!OptionSource::None.is_defined());
    }

    #[test]
    fn directory_source_tracks_contents() {
        let dir = tempfile::tempdir().unwrap();
        let source = OptionSource::Directory(dir.path().to_path_buf());
        assert_eq!(source.resolve(), Some(vec![]));

        fs::write(dir.path().join("b.wav"), b"").unwrap();
        fs::write(dir.path().join("a.wav"), b"").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        assert_eq!(
            source.resolve(),
            Some(vec!["a.wav".to_string(), "b.wav".to_string()])
        );

        fs::remove_file(dir.path().join("a.wav")).unwrap();
        assert_eq!(source.resolve(), Some(vec!["b.wav".to_string()]));
    }

    #[test]
    fn missing_directory_lists_nothing() {
        let source = OptionSource::Directory(PathBuf::from("/definitely/not/here"));
        assert_eq!(source.resolve(), Some(vec![]));
    }

    #[test]
    fn type_tags_serialize_lowercase() {
        assert_eq!(serde_json::to_value(ParamType::Float).unwrap(), "float");
        assert_eq!(serde_json::to_value(ParamType::Dict).unwrap(), "dict");
        assert_eq!(ParamType::Enum.to_string(), "enum");
    }
}
