//! Boundary to the audio engine that actually runs a resolved chain.
//!
//! The engine owns the DSP. This side hands it one [`ResolvedEffect`] at a time to
//! build a processing unit, then runs the units over a decoded buffer.

use crate::resolver::{EffectChain, ResolvedEffect};

/// Decoded audio, one `Vec<f32>` per channel.
pub type AudioBuffer = Vec<Vec<f32>>;

/// An audio engine that can build and run effect units.
pub trait EffectEngine {
    /// A built, ready-to-run effect.
    type Unit;
    /// Engine failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Build a unit for `effect`, dispatching on its plugin name.
    fn instantiate(&self, effect: &ResolvedEffect) -> Result<Self::Unit, Self::Error>;

    /// Run `units` in order over `buffer`.
    fn run(
        &self,
        units: &mut [Self::Unit],
        buffer: AudioBuffer,
        sample_rate: u32,
    ) -> Result<AudioBuffer, Self::Error>;
}

/// Instantiate every effect in `chain`, then run the buffer through them.
///
/// Units are only run once all of them were built.
///
/// # Errors
///
/// The first engine error.
pub fn process_chain<E: EffectEngine>(
    engine: &E,
    chain: &EffectChain,
    buffer: AudioBuffer,
    sample_rate: u32,
) -> Result<AudioBuffer, E::Error> {
    let mut units = chain
        .iter()
        .map(|effect| engine.instantiate(effect))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(units = units.len(), sample_rate, "running effect chain");
    engine.run(&mut units, buffer, sample_rate)
}
