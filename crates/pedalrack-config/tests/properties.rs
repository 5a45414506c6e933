//! Property-based tests for parameter bounds.
//!
//! Every numeric parameter of every built-in effect accepts its exact bounds and
//! anything between them, and rejects values one unit outside.

use pedalrack_config::{ChainResolver, EffectRequest, ParamValue, ValidationError};
use pedalrack_registry::{AssetRoots, EffectRegistry, ParamType};
use proptest::prelude::*;
use std::sync::Arc;

fn resolver() -> ChainResolver {
    ChainResolver::new(Arc::new(EffectRegistry::builtin(&AssetRoots::default()).unwrap()))
}

/// `(effect id, param name, min, max)` for every bounded numeric parameter of
/// effects that resolve without further input.
fn numeric_params() -> Vec<(String, String, f64, f64)> {
    let registry = EffectRegistry::builtin(&AssetRoots::default()).unwrap();
    registry
        .all_effects()
        .iter()
        .filter(|def| def.params.iter().all(|(_, spec)| !spec.required))
        .flat_map(|def| {
            def.params.iter().filter_map(move |(name, spec)| {
                let (Some(min), Some(max)) = (spec.min, spec.max) else {
                    return None;
                };
                matches!(spec.kind, ParamType::Float | ParamType::Int)
                    .then(|| (def.id.clone(), name.clone(), min, max))
            })
        })
        .collect()
}

#[test]
fn boundaries_accepted_one_unit_outside_rejected() {
    let resolver = resolver();
    let params = numeric_params();
    assert!(params.len() > 40, "expected the full catalog, got {}", params.len());

    for (effect, name, min, max) in params {
        for edge in [min, max] {
            let request = EffectRequest::new(&effect).with_param(&name, edge);
            assert!(
                resolver.resolve_request(&request).is_ok(),
                "{effect}.{name} should accept {edge}"
            );
        }

        let below = EffectRequest::new(&effect).with_param(&name, min - 1.0);
        assert!(
            matches!(
                resolver.resolve_request(&below),
                Err(ValidationError::BelowMinimum { .. })
            ),
            "{effect}.{name} should reject {}",
            min - 1.0
        );

        let above = EffectRequest::new(&effect).with_param(&name, max + 1.0);
        assert!(
            matches!(
                resolver.resolve_request(&above),
                Err(ValidationError::AboveMaximum { .. })
            ),
            "{effect}.{name} should reject {}",
            max + 1.0
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any interior point of any numeric range resolves to exactly that value,
    /// whether sent as a number or as text.
    #[test]
    fn interior_values_resolve(index in any::<prop::sample::Index>(), t in 0.0f64..=1.0, as_text in any::<bool>()) {
        let params = numeric_params();
        let (effect, name, min, max) = &params[index.index(params.len())];
        let value = min + (max - min) * t;
        let request = if as_text {
            EffectRequest::new(effect).with_param(name, value.to_string())
        } else {
            EffectRequest::new(effect).with_param(name, value)
        };

        let resolved = resolver().resolve_request(&request);
        prop_assert!(resolved.is_ok(), "{}.{} rejected {}: {:?}", effect, name, value, resolved);
        let resolved = resolved.unwrap();
        prop_assert_eq!(resolved.arg(name), Some(&ParamValue::Float(value)));
    }

    /// Values strictly outside a range are rejected and echoed in the message.
    #[test]
    fn exterior_values_rejected(index in any::<prop::sample::Index>(), overshoot in 1e-3f64..1e6, low in any::<bool>()) {
        let params = numeric_params();
        let (effect, name, min, max) = &params[index.index(params.len())];
        let value = if low { min - overshoot } else { max + overshoot };

        let err = resolver()
            .resolve_request(&EffectRequest::new(effect).with_param(name, value))
            .unwrap_err();
        prop_assert!(err.to_string().contains(&value.to_string()), "message: {}", err);
    }
}
