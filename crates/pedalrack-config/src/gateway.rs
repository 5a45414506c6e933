//! Request flow from a client's chain request to processed audio.
//!
//! [`Gateway::process`] authorizes the client, obtains the effect list directly or
//! from a preset, resolves it, records the processing event, and only then hands
//! the chain to the engine. Nothing reaches the engine unless every step passed.

use pedalrack_quota::{QuotaError, SessionTracker};
use std::sync::Arc;
use thiserror::Error;

use crate::engine::{AudioBuffer, EffectEngine, process_chain};
use crate::error::ConfigError;
use crate::resolver::{ChainResolver, EffectChain, EffectRequest};
use crate::store::PresetStore;
use crate::validation::ValidationError;

/// Where a processing request takes its chain from.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainSource {
    /// An explicit list of effect requests.
    Effects(Vec<EffectRequest>),
    /// The id of a stored preset.
    Preset(String),
}

/// Failure anywhere along the processing flow.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The client is over quota.
    #[error(transparent)]
    Quota(#[from] QuotaError),

    /// The chain did not resolve.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Preset lookup or storage failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The engine failed to build or run the chain.
    #[error("engine failure: {0}")]
    Engine(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Composes the resolver, preset store and session tracker.
#[derive(Debug, Clone)]
pub struct Gateway {
    presets: PresetStore,
    sessions: Arc<SessionTracker>,
}

impl Gateway {
    /// Create a gateway. Chains are resolved with the preset store's resolver.
    pub fn new(presets: PresetStore, sessions: Arc<SessionTracker>) -> Self {
        Self { presets, sessions }
    }

    /// The chain resolver.
    pub fn resolver(&self) -> &ChainResolver {
        self.presets.resolver()
    }

    /// The preset store.
    pub fn presets(&self) -> &PresetStore {
        &self.presets
    }

    /// The session tracker.
    pub fn sessions(&self) -> &Arc<SessionTracker> {
        &self.sessions
    }

    /// Authorize, resolve, and record a processing request without running it.
    ///
    /// The processing event is recorded only after the chain resolved, and the
    /// final rate check and the record happen under one session lock.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Quota`], [`GatewayError::Validation`] or
    /// [`GatewayError::Config`] from the failing step.
    pub fn prepare(&self, client_id: &str, source: &ChainSource) -> Result<EffectChain, GatewayError> {
        self.sessions.can_process(client_id)?;

        let chain = match source {
            ChainSource::Effects(requests) => self.resolver().resolve_chain(requests)?,
            ChainSource::Preset(id) => self.presets.resolve(id)?,
        };

        self.sessions.try_record_process(client_id)?;
        tracing::debug!(client = client_id, effects = chain.len(), "processing admitted");
        Ok(chain)
    }

    /// Run a processing request end to end.
    ///
    /// # Errors
    ///
    /// Any error from [`prepare`](Self::prepare), or [`GatewayError::Engine`].
    pub fn process<E: EffectEngine>(
        &self,
        engine: &E,
        client_id: &str,
        source: &ChainSource,
        buffer: AudioBuffer,
        sample_rate: u32,
    ) -> Result<AudioBuffer, GatewayError> {
        let chain = self.prepare(client_id, source)?;
        process_chain(engine, &chain, buffer, sample_rate)
            .map_err(|e| GatewayError::Engine(Box::new(e)))
    }
}
