//! Error types for registry construction and lookup.

use thiserror::Error;

/// Errors raised while building or querying an [`EffectRegistry`](crate::EffectRegistry).
///
/// Every variant except [`NotFound`](RegistryError::NotFound) is a construction-time
/// invariant violation: a registry that fails to build must not be served.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RegistryError {
    /// No effect or alias matches the identifier.
    #[error("unknown effect type: {0}")]
    NotFound(String),

    /// Two effects share an identifier.
    #[error("effect '{0}' is registered more than once")]
    DuplicateId(String),

    /// An alias is claimed twice, or collides with an effect identifier.
    #[error("alias '{alias}' is claimed by both '{first}' and '{second}'")]
    DuplicateAlias {
        /// The contested alias.
        alias: String,
        /// Effect that claimed it first.
        first: String,
        /// Effect that claimed it second.
        second: String,
    },

    /// An `enum` parameter has no option source, or an empty fixed list.
    #[error("enum parameter '{param}' of effect '{effect}' has no options")]
    EmptyEnumOptions {
        /// Effect declaring the parameter.
        effect: String,
        /// The parameter.
        param: String,
    },

    /// `min`/`max` declared on a non-numeric parameter.
    #[error("parameter '{param}' of effect '{effect}' declares a numeric range but is not numeric")]
    RangeOnNonNumeric {
        /// Effect declaring the parameter.
        effect: String,
        /// The parameter.
        param: String,
    },

    /// A parameter name, or the engine argument it maps to, is declared twice.
    #[error("effect '{effect}' declares '{param}' more than once")]
    DuplicateParam {
        /// Effect declaring the parameter.
        effect: String,
        /// Parameter or engine argument name.
        param: String,
    },
}
