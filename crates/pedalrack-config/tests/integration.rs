//! Integration tests for pedalrack-config.
//!
//! These tests drive the public API from request JSON through resolution, preset
//! storage, and the gateway.

use pedalrack_config::{
    ChainResolver, ChainSource, ConfigError, EffectRequest, Gateway, GatewayError, NewPreset,
    ParamValue, PresetStore, Settings, ValidationError,
};
use pedalrack_quota::{QuotaLimits, SessionTracker};
use pedalrack_registry::{AssetRoots, EffectRegistry};
use serde_json::{Map, Value, json};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn resolver_with(roots: &AssetRoots) -> ChainResolver {
    ChainResolver::new(Arc::new(EffectRegistry::builtin(roots).unwrap()))
}

fn resolver() -> ChainResolver {
    resolver_with(&AssetRoots::default())
}

/// Every effect without a required parameter resolves from an empty payload, and
/// each resolved argument is the coerced default.
#[test]
fn test_every_effect_resolves_to_defaults() {
    let resolver = resolver();
    for definition in resolver.registry().all_effects() {
        if definition.params.iter().any(|(_, spec)| spec.required) {
            continue;
        }
        let effect = resolver
            .resolve(&definition.id, &Map::new())
            .unwrap_or_else(|e| panic!("{} should resolve: {e}", definition.id));

        for (name, spec) in &definition.params {
            let arg = effect.arg(spec.engine_arg(name));
            match spec.default.as_ref().filter(|v| !v.is_null()) {
                None if spec.skip_if_none => assert!(arg.is_none(), "{}.{name}", definition.id),
                Some(default) => {
                    let expected = pedalrack_config::coerce(name, spec, default).unwrap();
                    assert_eq!(arg, Some(&expected), "{}.{name}", definition.id);
                }
                None => assert!(arg.is_some(), "{}.{name}", definition.id),
            }
        }
    }
}

/// Effects with required parameters fail naming them.
#[test]
fn test_required_parameters_fail_empty_payload() {
    let err = resolver().resolve("convolution", &Map::new()).unwrap_err();
    assert_eq!(err, ValidationError::Empty("impulse_response".to_string()));
}

#[test]
fn test_wire_chain_round_trip_through_resolution() {
    let wire = json!([
        {"type": "HighPassFilter", "params": {"cutoff_frequency_hz": "120"}},
        {"type": "ladderfilter", "params": {"mode": "LPF24", "resonance": 0.4}},
        {"type": "Gate"},
        {"type": "invert", "params": null}
    ]);
    let requests: Vec<EffectRequest> = serde_json::from_value(wire).unwrap();
    let chain = resolver().resolve_chain(&requests).unwrap();

    let ids: Vec<_> = chain.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["highpass", "ladderfilter", "noisegate", "invert"]);
    assert_eq!(
        chain.effects()[0].arg("cutoff_frequency_hz"),
        Some(&ParamValue::Float(120.0))
    );
    assert_eq!(
        chain.effects()[1].arg("mode"),
        Some(&ParamValue::Choice("LPF24".to_string()))
    );
    assert!(chain.effects()[3].args.is_empty());
}

/// An unknown key fails the chain even when everything else is valid.
#[test]
fn test_unknown_parameter_fails_whole_chain() {
    let requests = vec![
        EffectRequest::new("gain").with_param("gain_db", 3),
        EffectRequest::new("delay")
            .with_param("mix", 0.2)
            .with_param("wet", 0.5),
    ];
    let err = resolver().resolve_chain(&requests).unwrap_err();
    assert!(err.to_string().contains("wet"), "got: {err}");
    assert!(matches!(
        err.root_cause(),
        ValidationError::UnknownParameters { params, .. } if params == &["wet".to_string()]
    ));
}

#[test]
fn test_unknown_effect_named_for_any_payload() {
    let resolver = resolver();
    for params in [json!({}), json!({"mix": 1})] {
        let request: EffectRequest =
            serde_json::from_value(json!({"type": "not_a_real_effect", "params": params})).unwrap();
        let err = resolver.resolve_chain(&[request]).unwrap_err();
        assert_eq!(
            err.root_cause(),
            &ValidationError::UnknownEffect("not_a_real_effect".to_string())
        );
    }
}

/// Traversal out of the impulse directory is rejected even when the target exists.
#[test]
fn test_convolution_sandbox_escape_rejected() {
    let tmp = TempDir::new().unwrap();
    let impulses = tmp.path().join("impulses");
    fs::create_dir(&impulses).unwrap();
    fs::write(tmp.path().join("secret.wav"), b"RIFF").unwrap();
    let resolver = resolver_with(&AssetRoots {
        impulses: impulses.clone(),
    });

    let escape = EffectRequest::new("convolution").with_param("impulse_response", "../secret.wav");
    let err = resolver.resolve_request(&escape).unwrap_err();
    assert!(
        matches!(err, ValidationError::SandboxViolation { .. }),
        "got: {err:?}"
    );

    // once the directory has files, an escaping name is not even a listed option
    fs::write(impulses.join("room.wav"), b"RIFF").unwrap();
    let err = resolver.resolve_request(&escape).unwrap_err();
    assert!(matches!(err, ValidationError::NotAnOption { .. }), "got: {err:?}");

    let ok = EffectRequest::new("convolution").with_param("impulse_response", "room.wav");
    let effect = resolver.resolve_request(&ok).unwrap();
    assert!(matches!(
        effect.arg("impulse_response_filename"),
        Some(ParamValue::Path(p)) if p.starts_with(impulses.canonicalize().unwrap())
    ));
}

/// Directory-backed options are listed at call time.
#[test]
fn test_catalog_tracks_impulse_directory() {
    let tmp = TempDir::new().unwrap();
    let resolver = resolver_with(&AssetRoots {
        impulses: tmp.path().to_path_buf(),
    });
    let options = |resolver: &ChainResolver| -> Vec<String> {
        let convolution = resolver
            .registry()
            .list_all()
            .into_iter()
            .find(|e| e.id == "convolution")
            .unwrap();
        convolution
            .params
            .into_iter()
            .find(|p| p.name == "impulse_response")
            .unwrap()
            .options
            .unwrap_or_default()
    };

    assert!(options(&resolver).is_empty());
    fs::write(tmp.path().join("plate.wav"), b"RIFF").unwrap();
    assert_eq!(options(&resolver), vec!["plate.wav".to_string()]);
}

#[test]
fn test_preset_round_trip() {
    let tmp = TempDir::new().unwrap();
    let store = PresetStore::open(tmp.path(), resolver()).unwrap();

    let effects: Vec<EffectRequest> = serde_json::from_value(json!([
        {"type": "compressor", "params": {"threshold_db": -18, "ratio": "3"}},
        {"type": "Reverb", "params": {"room_size": 0.8}},
        {"type": "resample", "params": {"quality": "Linear"}}
    ]))
    .unwrap();

    let created = store
        .create(NewPreset::new("Vocal", effects.clone()))
        .unwrap();
    assert_eq!(store.load(&created.id).unwrap().effects, effects);

    let listed = store.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].effects_count, 3);
}

/// Long-mantissa floats survive a save and load bit for bit.
#[test]
fn test_preset_floats_round_trip_exactly() {
    let tmp = TempDir::new().unwrap();
    let store = PresetStore::open(tmp.path(), resolver()).unwrap();

    let mut values = vec![-12.683839397239595, 59.99999999999999, -60.0, 0.1 + 0.2];
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    for _ in 0..500 {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let unit = (state >> 11) as f64 / (1u64 << 53) as f64;
        values.push(unit * 120.0 - 60.0);
    }

    for gain_db in values {
        let effects = vec![EffectRequest::new("gain").with_param("gain_db", gain_db)];
        let created = store.create(NewPreset::new("Gain", effects.clone())).unwrap();

        let loaded = store.load(&created.id).unwrap();
        assert_eq!(loaded.effects, effects, "gain_db {gain_db:?} drifted");

        let chain = store.resolve(&created.id).unwrap();
        assert_eq!(
            chain.effects()[0].arg("gain_db"),
            Some(&ParamValue::Float(gain_db))
        );
        store.delete(&created.id).unwrap();
    }
}

#[test]
fn test_failed_create_persists_nothing() {
    let tmp = TempDir::new().unwrap();
    let store = PresetStore::open(tmp.path(), resolver()).unwrap();

    let effects = vec![
        EffectRequest::new("gain"),
        EffectRequest::new("not_a_real_effect"),
    ];
    let err = store.create(NewPreset::new("Bad", effects)).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn test_preset_json_is_readable_by_other_tools() {
    let tmp = TempDir::new().unwrap();
    let store = PresetStore::open(tmp.path(), resolver()).unwrap();
    let preset = store
        .create(NewPreset::new("Loud", vec![EffectRequest::new("gain").with_param("gain_db", 12)]))
        .unwrap();

    let text = fs::read_to_string(store.path_of(&preset.id).unwrap()).unwrap();
    assert!(text.contains('\n'), "records are pretty-printed");
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["id"], preset.id.as_str());
    assert_eq!(value["effects"][0]["params"]["gain_db"], 12);
}

#[test]
fn test_gateway_from_settings() {
    let tmp = TempDir::new().unwrap();
    let settings = Settings::from_toml(&format!(
        "[quota]\nmax_processes_per_hour = 1\n\n[presets]\ndir = {:?}\n\n[assets]\nimpulses = {:?}\n",
        tmp.path().join("presets").to_string_lossy(),
        tmp.path().join("impulses").to_string_lossy(),
    ))
    .unwrap();

    let registry = Arc::new(EffectRegistry::builtin(&settings.assets.roots()).unwrap());
    let store = PresetStore::open(&settings.presets.dir, ChainResolver::new(registry)).unwrap();
    let sessions = Arc::new(SessionTracker::new(settings.quota.clone()));
    let gateway = Gateway::new(store, sessions);

    let source = ChainSource::Effects(vec![EffectRequest::new("gain")]);
    gateway.prepare("ip_10.0.0.1", &source).unwrap();
    let err = gateway.prepare("ip_10.0.0.1", &source).unwrap_err();
    assert!(matches!(err, GatewayError::Quota(_)));
    assert_eq!(err.to_string(), "Processing limit reached (1 per hour). Please wait.");

    // other clients are unaffected
    gateway.prepare("ip_10.0.0.2", &source).unwrap();
    assert_eq!(
        gateway.sessions().limits(),
        &QuotaLimits {
            max_processes_per_hour: 1,
            ..QuotaLimits::default()
        }
    );
}
