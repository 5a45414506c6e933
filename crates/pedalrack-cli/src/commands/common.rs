//! Shared CLI helpers used across multiple commands.

use anyhow::Context as _;
use pedalrack_config::{
    ChainResolver, EffectRegistry, EffectRequest, PresetStore, Settings, paths,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Settings and the location they were read from.
pub struct Context {
    /// Effective settings.
    pub settings: Settings,
    /// Settings file path, whether or not it exists.
    pub settings_path: PathBuf,
}

impl Context {
    /// Load settings from `config`, or from the default location.
    ///
    /// A missing file means defaults. A file that exists must parse.
    pub fn load(config: Option<&Path>) -> anyhow::Result<Self> {
        let settings_path = match config {
            Some(path) => {
                if !path.exists() {
                    tracing::warn!(path = %path.display(), "settings file not found, using defaults");
                }
                path.to_path_buf()
            }
            None => paths::default_settings_path(),
        };
        let settings = Settings::load_or_default(&settings_path)
            .with_context(|| format!("cannot load settings from {}", settings_path.display()))?;
        Ok(Self {
            settings,
            settings_path,
        })
    }

    /// Build the effect registry against the configured asset roots.
    pub fn registry(&self) -> anyhow::Result<Arc<EffectRegistry>> {
        let registry = EffectRegistry::builtin(&self.settings.assets.roots())
            .context("effect registry is misconfigured")?;
        Ok(Arc::new(registry))
    }

    /// Chain resolver over a fresh registry.
    pub fn resolver(&self) -> anyhow::Result<ChainResolver> {
        Ok(ChainResolver::new(self.registry()?))
    }

    /// Open the configured preset store.
    pub fn store(&self) -> anyhow::Result<PresetStore> {
        let store = PresetStore::open(&self.settings.presets.dir, self.resolver()?)?;
        Ok(store)
    }
}

/// Read an effect list from inline JSON, a file, or stdin (`-`).
pub fn read_chain(file: Option<&Path>, inline: Option<&str>) -> anyhow::Result<Vec<EffectRequest>> {
    let (text, origin) = match (inline, file) {
        (Some(json), _) => (json.to_string(), "--chain".to_string()),
        (None, Some(path)) if path == Path::new("-") => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read chain from stdin")?;
            (text, "stdin".to_string())
        }
        (None, Some(path)) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            (text, path.display().to_string())
        }
        (None, None) => anyhow::bail!("no chain given (pass a FILE, '-' for stdin, or --chain)"),
    };
    parse_chain(&text).with_context(|| format!("invalid chain in {origin}"))
}

/// Parse a chain as either a bare effect list or an object with an `effects` list.
pub fn parse_chain(text: &str) -> anyhow::Result<Vec<EffectRequest>> {
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum ChainDocument {
        List(Vec<EffectRequest>),
        Wrapped { effects: Vec<EffectRequest> },
    }

    let doc: ChainDocument = serde_json::from_str(text)
        .context("expected a JSON list of effects or an object with an \"effects\" list")?;
    Ok(match doc {
        ChainDocument::List(effects) | ChainDocument::Wrapped { effects } => effects,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_list() {
        let chain = parse_chain(r#"[{"type": "gain", "params": {"gain_db": 3}}, {"type": "reverb"}]"#).unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].effect_type, "gain");
        assert!(chain[1].params.is_empty());
    }

    #[test]
    fn wrapped_list() {
        let chain = parse_chain(r#"{"effects": [{"type": "delay"}]}"#).unwrap();
        assert_eq!(chain[0].effect_type, "delay");
    }

    #[test]
    fn not_a_chain() {
        assert!(parse_chain(r#"{"type": "delay"}"#).is_err());
        assert!(parse_chain("not json").is_err());
    }

    #[test]
    fn inline_wins_over_file() {
        let chain = read_chain(Some(Path::new("/nonexistent.json")), Some("[]")).unwrap();
        assert!(chain.is_empty());
    }

    #[test]
    fn nothing_given() {
        assert!(read_chain(None, None).is_err());
    }
}
