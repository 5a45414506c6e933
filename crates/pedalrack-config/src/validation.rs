//! Parameter validation and coercion.
//!
//! [`coerce`] turns a raw JSON value supplied for one parameter into a typed
//! [`ParamValue`], following the parameter's [`ParamSpec`]: type coercion first,
//! then inclusive `min`/`max` bounds, then the declared transform.
//!
//! # Example
//!
//! ```rust
//! use pedalrack_config::validation::{ParamValue, coerce};
//! use pedalrack_registry::ParamSpec;
//! use serde_json::json;
//!
//! let spec = ParamSpec::float(0.5, 0.0, 1.0);
//! assert_eq!(coerce("mix", &spec, &json!("0.25")).unwrap(), ParamValue::Float(0.25));
//! assert!(coerce("mix", &spec, &json!(1.5)).is_err());
//! ```

use pedalrack_registry::{ParamSpec, ParamType, Transform};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::sandbox;

/// Why a request could not be resolved.
///
/// Every variant names the offending effect, parameter, or value, and the
/// messages are safe to show to the client that sent the request.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Unknown effect type.
    #[error("unknown effect type: {0}")]
    UnknownEffect(String),

    /// Parameters not declared by the effect.
    #[error("unsupported parameter(s) for '{effect}': {}", .params.join(", "))]
    UnknownParameters {
        /// Canonical effect id.
        effect: String,
        /// Offending names, sorted.
        params: Vec<String>,
    },

    /// A required parameter resolved to null.
    #[error("parameter '{param}' is required for effect '{effect}'")]
    MissingParameter {
        /// Canonical effect id.
        effect: String,
        /// Parameter name.
        param: String,
    },

    /// Value could not be read as a number.
    #[error("parameter '{0}' must be a number")]
    NotANumber(String),

    /// Value could not be read as an integer.
    #[error("parameter '{0}' must be an integer")]
    NotAnInteger(String),

    /// Enum parameter without any options to choose from.
    #[error("no options defined for enum parameter '{0}'")]
    NoOptions(String),

    /// Value is not one of the allowed options.
    #[error("invalid value '{value}' for parameter '{param}'; allowed: {}", .allowed.join(", "))]
    NotAnOption {
        /// Parameter name.
        param: String,
        /// Value as received, stringified.
        value: String,
        /// Options at the time of the check.
        allowed: Vec<String>,
    },

    /// Required string or file parameter was empty.
    #[error("parameter '{0}' requires a non-empty value")]
    Empty(String),

    /// Dict parameter received something other than an object.
    #[error("parameter '{0}' must be an object")]
    NotAnObject(String),

    /// Below the inclusive minimum.
    #[error("parameter '{param}' must be >= {min}, received {value}")]
    BelowMinimum {
        /// Parameter name.
        param: String,
        /// Coerced value.
        value: f64,
        /// Inclusive minimum.
        min: f64,
    },

    /// Above the inclusive maximum.
    #[error("parameter '{param}' must be <= {max}, received {value}")]
    AboveMaximum {
        /// Parameter name.
        param: String,
        /// Coerced value.
        value: f64,
        /// Inclusive maximum.
        max: f64,
    },

    /// File reference resolves outside its asset root.
    #[error("parameter '{param}' must refer to a file inside its asset directory")]
    SandboxViolation {
        /// Parameter name.
        param: String,
        /// Name as supplied.
        name: String,
    },

    /// File reference resolves inside the root but nothing is there.
    #[error("parameter '{param}': file not found: {name}")]
    FileNotFound {
        /// Parameter name.
        param: String,
        /// Name as supplied.
        name: String,
    },

    /// Failure of one effect within a chain.
    #[error("effect at position {index} ('{effect}'): {source}")]
    AtPosition {
        /// Zero-based chain position.
        index: usize,
        /// Effect type as requested.
        effect: String,
        /// Underlying failure.
        #[source]
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    /// Innermost error, unwrapping chain positions.
    pub fn root_cause(&self) -> &ValidationError {
        match self {
            ValidationError::AtPosition { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// A coerced, engine-ready parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// `float` parameter.
    Float(f64),
    /// `int` parameter.
    Int(i64),
    /// `bool` parameter.
    Bool(bool),
    /// `enum` parameter, one of its options.
    Choice(String),
    /// `string` parameter, or a `file` parameter without a transform.
    Text(String),
    /// `file` parameter after sandbox resolution.
    Path(PathBuf),
    /// `dict` parameter.
    Map(Map<String, Value>),
}

impl ParamValue {
    /// Numeric view used for bounds checks.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// The value as a JSON value.
    pub fn to_json(&self) -> Value {
        match self {
            ParamValue::Float(v) => Value::from(*v),
            ParamValue::Int(v) => Value::from(*v),
            ParamValue::Bool(v) => Value::Bool(*v),
            ParamValue::Choice(s) | ParamValue::Text(s) => Value::String(s.clone()),
            ParamValue::Path(p) => Value::String(p.to_string_lossy().into_owned()),
            ParamValue::Map(m) => Value::Object(m.clone()),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Float(v) => write!(f, "{v}"),
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Bool(v) => write!(f, "{v}"),
            ParamValue::Choice(s) | ParamValue::Text(s) => f.write_str(s),
            ParamValue::Path(p) => write!(f, "{}", p.display()),
            ParamValue::Map(m) => write!(f, "{}", Value::Object(m.clone())),
        }
    }
}

/// Coerce a raw value for parameter `name` according to `spec`.
///
/// # Errors
///
/// Returns the first rule the value breaks: type coercion, option membership,
/// emptiness, bounds, or the transform.
pub fn coerce(name: &str, spec: &ParamSpec, raw: &Value) -> ValidationResult<ParamValue> {
    let value = coerce_type(name, spec, raw)?;
    check_bounds(name, spec, &value)?;
    apply_transform(name, spec, value)
}

fn coerce_type(name: &str, spec: &ParamSpec, raw: &Value) -> ValidationResult<ParamValue> {
    match spec.kind {
        ParamType::Float => to_float(raw)
            .map(ParamValue::Float)
            .ok_or_else(|| ValidationError::NotANumber(name.to_string())),
        ParamType::Int => to_int(raw)
            .map(ParamValue::Int)
            .ok_or_else(|| ValidationError::NotAnInteger(name.to_string())),
        ParamType::Bool => Ok(ParamValue::Bool(to_bool(raw))),
        ParamType::Enum => {
            let options = spec
                .options
                .resolve()
                .filter(|options| !options.is_empty())
                .ok_or_else(|| ValidationError::NoOptions(name.to_string()))?;
            let value = stringify(raw);
            if options.contains(&value) {
                Ok(ParamValue::Choice(value))
            } else {
                Err(ValidationError::NotAnOption {
                    param: name.to_string(),
                    value,
                    allowed: options,
                })
            }
        }
        ParamType::String => {
            let value = text_or_empty(raw);
            if spec.required && value.is_empty() {
                return Err(ValidationError::Empty(name.to_string()));
            }
            Ok(ParamValue::Text(value))
        }
        ParamType::File => {
            let value = text_or_empty(raw);
            if spec.required && value.is_empty() {
                return Err(ValidationError::Empty(name.to_string()));
            }
            if !value.is_empty()
                && let Some(options) = spec.options.resolve()
                && !options.is_empty()
                && !options.contains(&value)
            {
                return Err(ValidationError::NotAnOption {
                    param: name.to_string(),
                    value,
                    allowed: options,
                });
            }
            Ok(ParamValue::Text(value))
        }
        ParamType::Dict => match raw {
            Value::Null => Ok(ParamValue::Map(Map::new())),
            Value::Object(map) => Ok(ParamValue::Map(map.clone())),
            _ => Err(ValidationError::NotAnObject(name.to_string())),
        },
    }
}

fn check_bounds(name: &str, spec: &ParamSpec, value: &ParamValue) -> ValidationResult<()> {
    let Some(v) = value.as_f64() else {
        return Ok(());
    };
    if let Some(min) = spec.min
        && v < min
    {
        return Err(ValidationError::BelowMinimum {
            param: name.to_string(),
            value: v,
            min,
        });
    }
    if let Some(max) = spec.max
        && v > max
    {
        return Err(ValidationError::AboveMaximum {
            param: name.to_string(),
            value: v,
            max,
        });
    }
    Ok(())
}

fn apply_transform(name: &str, spec: &ParamSpec, value: ParamValue) -> ValidationResult<ParamValue> {
    match (&spec.transform, value) {
        (Transform::SandboxedFile { root }, ParamValue::Text(file)) if !file.is_empty() => {
            sandbox::resolve_in_root(name, root, &file).map(ParamValue::Path)
        }
        (_, value) => Ok(value),
    }
}

fn to_float(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn to_int(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn to_bool(raw: &Value) -> bool {
    match raw {
        Value::String(s) => matches!(s.to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn stringify(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn text_or_empty(raw: &Value) -> String {
    match raw {
        Value::Null => String::new(),
        other => stringify(other),
    }
}
