// Audio subsystem: static warning patterns, oscillator synthesis, playback.
pub mod engine;
pub mod patterns;
pub mod synth;

pub use engine::{AudioEngine, AudioSink, SystemPlayerSink};
pub use patterns::{AudioPattern, Waveform, pattern_for};
pub use synth::SoundSynthesizer;
