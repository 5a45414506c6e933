//! Built-in effect catalog.
//!
//! Bounds and defaults follow the plugin types of the audio engine the resolved
//! chains are handed to. File-valued parameters are sandboxed to the directories in
//! [`AssetRoots`].

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::definition::{EffectDefinition, EffectTag};
use crate::param::ParamSpec;

/// Ladder filter topologies.
pub const LADDER_MODES: [&str; 6] = ["LPF12", "HPF12", "BPF12", "LPF24", "HPF24", "BPF24"];

/// Resampler interpolation algorithms.
pub const RESAMPLE_QUALITIES: [&str; 5] = [
    "ZeroOrderHold",
    "Linear",
    "CatmullRom",
    "Lagrange",
    "WindowedSinc",
];

/// Directories that file-valued parameters may resolve into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRoots {
    /// Impulse response files for the convolution effect.
    pub impulses: PathBuf,
}

impl Default for AssetRoots {
    fn default() -> Self {
        Self {
            impulses: PathBuf::from("impulses"),
        }
    }
}

/// All built-in effect definitions in registration order.
pub fn builtin_effects(roots: &AssetRoots) -> Vec<EffectDefinition> {
    vec![
        // Spatial / time
        EffectDefinition::new("reverb", "Reverb", "Reverb")
            .with_description("Adds spatial ambience and echo")
            .with_param("room_size", ParamSpec::float(0.5, 0.0, 1.0))
            .with_param("damping", ParamSpec::float(0.5, 0.0, 1.0))
            .with_param("wet_level", ParamSpec::float(0.33, 0.0, 1.0))
            .with_param("dry_level", ParamSpec::float(0.4, 0.0, 1.0))
            .with_param("width", ParamSpec::float(1.0, 0.0, 1.0))
            .with_param("freeze_mode", ParamSpec::float(0.0, 0.0, 1.0))
            .with_tags(&[EffectTag::Spatial]),
        EffectDefinition::new("delay", "Delay", "Delay")
            .with_description("Creates tempo-synced echoes")
            .with_param("delay_seconds", ParamSpec::float(0.5, 0.0, 2.0))
            .with_param("feedback", ParamSpec::float(0.0, 0.0, 0.95))
            .with_param("mix", ParamSpec::float(0.5, 0.0, 1.0))
            .with_tags(&[EffectTag::Spatial, EffectTag::Time]),
        // Dynamics
        EffectDefinition::new("compressor", "Compressor", "Compressor")
            .with_description("Controls dynamic range")
            .with_param("threshold_db", ParamSpec::float(0.0, -60.0, 0.0))
            .with_param("ratio", ParamSpec::float(1.0, 1.0, 20.0))
            .with_param("attack_ms", ParamSpec::float(1.0, 0.1, 100.0))
            .with_param("release_ms", ParamSpec::float(100.0, 1.0, 1000.0))
            .with_tags(&[EffectTag::Dynamics]),
        EffectDefinition::new("limiter", "Limiter", "Limiter")
            .with_description("Prevents peaks beyond a threshold")
            .with_param("threshold_db", ParamSpec::float(-10.0, -60.0, 0.0))
            .with_param("release_ms", ParamSpec::float(100.0, 1.0, 1000.0))
            .with_tags(&[EffectTag::Dynamics]),
        EffectDefinition::new("gain", "Gain", "Gain")
            .with_description("Raises or lowers signal level")
            .with_param("gain_db", ParamSpec::float(0.0, -60.0, 60.0))
            .with_tags(&[EffectTag::Utility]),
        // Color
        EffectDefinition::new("distortion", "Distortion", "Distortion")
            .with_description("Adds harmonic saturation")
            .with_param("drive_db", ParamSpec::float(25.0, 0.0, 120.0))
            .with_tags(&[EffectTag::Color]),
        // Modulation
        EffectDefinition::new("chorus", "Chorus", "Chorus")
            .with_description("Thickens signals with modulated delay")
            .with_param("rate_hz", ParamSpec::float(1.0, 0.0, 10.0))
            .with_param("depth", ParamSpec::float(0.25, 0.0, 1.0))
            .with_param("centre_delay_ms", ParamSpec::float(7.0, 1.0, 50.0))
            .with_param("feedback", ParamSpec::float(0.0, 0.0, 0.95))
            .with_param("mix", ParamSpec::float(0.5, 0.0, 1.0))
            .with_tags(&[EffectTag::Modulation, EffectTag::Spatial]),
        EffectDefinition::new("phaser", "Phaser", "Phaser")
            .with_description("Applies sweeping phase cancellations")
            .with_param("rate_hz", ParamSpec::float(1.0, 0.0, 10.0))
            .with_param("depth", ParamSpec::float(0.5, 0.0, 1.0))
            .with_param("centre_frequency_hz", ParamSpec::float(1300.0, 20.0, 8000.0))
            .with_param("feedback", ParamSpec::float(0.0, 0.0, 0.95))
            .with_param("mix", ParamSpec::float(0.5, 0.0, 1.0))
            .with_tags(&[EffectTag::Modulation]),
        EffectDefinition::new("bitcrush", "Bitcrush", "Bitcrush")
            .with_description("Reduces bit depth for lo-fi texture")
            .with_param("bit_depth", ParamSpec::float(8.0, 1.0, 32.0))
            .with_tags(&[EffectTag::Color]),
        // Filters
        EffectDefinition::new("highpass", "Highpass Filter", "HighpassFilter")
            .with_description("Removes low frequencies")
            .with_param("cutoff_frequency_hz", ParamSpec::float(50.0, 20.0, 20000.0))
            .with_tags(&[EffectTag::Filter])
            .with_alias("highpassfilter"),
        EffectDefinition::new("lowpass", "Lowpass Filter", "LowpassFilter")
            .with_description("Removes high frequencies")
            .with_param("cutoff_frequency_hz", ParamSpec::float(5000.0, 20.0, 20000.0))
            .with_tags(&[EffectTag::Filter])
            .with_alias("lowpassfilter"),
        EffectDefinition::new("ladderfilter", "Ladder Filter", "LadderFilter")
            .with_description("Moog-style resonant filter")
            .with_param(
                "mode",
                ParamSpec::choice("LPF12", LADDER_MODES).with_help("Choose the filter topology"),
            )
            .with_param("cutoff_hz", ParamSpec::float(200.0, 20.0, 20000.0))
            .with_param("resonance", ParamSpec::float(0.0, 0.0, 1.0))
            .with_param("drive", ParamSpec::float(1.0, 1.0, 10.0))
            .with_tags(&[EffectTag::Filter]),
        EffectDefinition::new("highshelf", "High Shelf", "HighShelfFilter")
            .with_description("Boosts or attenuates high frequencies")
            .with_param("cutoff_frequency_hz", ParamSpec::float(1000.0, 20.0, 20000.0))
            .with_param("gain_db", ParamSpec::float(0.0, -60.0, 60.0))
            .with_param("q", ParamSpec::float(0.7071, 0.1, 10.0))
            .with_tags(&[EffectTag::Filter])
            .with_alias("highshelffilter"),
        EffectDefinition::new("lowshelf", "Low Shelf", "LowShelfFilter")
            .with_description("Boosts or attenuates low frequencies")
            .with_param("cutoff_frequency_hz", ParamSpec::float(300.0, 20.0, 20000.0))
            .with_param("gain_db", ParamSpec::float(0.0, -60.0, 60.0))
            .with_param("q", ParamSpec::float(0.7071, 0.1, 10.0))
            .with_tags(&[EffectTag::Filter])
            .with_alias("lowshelffilter"),
        EffectDefinition::new("peakfilter", "Peak / Notch Filter", "PeakFilter")
            .with_description("Boosts or cuts around a center frequency")
            .with_param("cutoff_frequency_hz", ParamSpec::float(440.0, 20.0, 20000.0))
            .with_param("gain_db", ParamSpec::float(0.0, -60.0, 60.0))
            .with_param("q", ParamSpec::float(0.7071, 0.1, 10.0))
            .with_tags(&[EffectTag::Filter]),
        EffectDefinition::new("pitchshift", "Pitch Shift", "PitchShift")
            .with_description("Shifts pitch without changing tempo")
            .with_param("semitones", ParamSpec::float(0.0, -24.0, 24.0))
            .with_tags(&[EffectTag::Modulation]),
        EffectDefinition::new("clipping", "Clipping", "Clipping")
            .with_description("Applies hard digital clipping")
            .with_param("threshold_db", ParamSpec::float(-6.0, -60.0, 0.0))
            .with_tags(&[EffectTag::Color]),
        EffectDefinition::new("invert", "Invert", "Invert")
            .with_description("Flips the signal polarity")
            .with_tags(&[EffectTag::Utility]),
        EffectDefinition::new("mp3compressor", "MP3 Compressor", "MP3Compressor")
            .with_description("Introduces perceptual codec artifacts")
            .with_param("vbr_quality", ParamSpec::float(2.0, 0.0, 9.9))
            .with_tags(&[EffectTag::Color]),
        EffectDefinition::new("resample", "Resample", "Resample")
            .with_description("Downsamples audio for aliasing effects")
            .with_param("target_sample_rate", ParamSpec::float(8000.0, 4000.0, 192000.0))
            .with_param(
                "quality",
                ParamSpec::choice("WindowedSinc", RESAMPLE_QUALITIES)
                    .with_help("Select the resampling algorithm"),
            )
            .with_tags(&[EffectTag::Color, EffectTag::Utility]),
        EffectDefinition::new("noisegate", "Noise Gate", "NoiseGate")
            .with_description("Suppresses low-level noise")
            .with_param("threshold_db", ParamSpec::float(-40.0, -100.0, 0.0))
            .with_param("ratio", ParamSpec::float(10.0, 1.0, 20.0))
            .with_param("attack_ms", ParamSpec::float(1.0, 0.0, 100.0))
            .with_param("release_ms", ParamSpec::float(100.0, 1.0, 1000.0))
            .with_tags(&[EffectTag::Dynamics])
            .with_alias("gate"),
        EffectDefinition::new("gsmfullratecompressor", "GSM Full Rate", "GSMFullRateCompressor")
            .with_description("Simulates 2G cellular codec compression")
            .with_param(
                "quality",
                ParamSpec::choice("WindowedSinc", RESAMPLE_QUALITIES)
                    .with_help("Controls the internal resampling algorithm"),
            )
            .with_tags(&[EffectTag::Color]),
        EffectDefinition::new("convolution", "Convolution", "Convolution")
            .with_description("Applies an impulse response for cabinets or reverbs")
            .with_param(
                "impulse_response",
                ParamSpec::sandboxed_file(&roots.impulses)
                    .with_arg_name("impulse_response_filename")
                    .with_help("Upload IR files to the impulses directory"),
            )
            .with_param("mix", ParamSpec::float(1.0, 0.0, 1.0))
            .with_tags(&[EffectTag::Spatial, EffectTag::Color])
            .with_notes("Impulse response files must be placed in the impulses directory."),
    ]
}
