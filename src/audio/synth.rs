// Oscillator-based beep synthesis. Rendering is pure (pattern in, PCM out)
// so the envelope and sweep behavior are testable without an audio device.
use crate::audio::patterns::{AudioPattern, Waveform};

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Attack ramp at the start of each beep, seconds.
const ATTACK_SECS: f32 = 0.01;
/// Gain floor the exponential decay ends at.
const DECAY_FLOOR: f32 = 0.01;

#[derive(Debug, Clone, Copy)]
pub struct SoundSynthesizer {
    sample_rate: u32,
}

impl SoundSynthesizer {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Render a full beep sequence as 16-bit mono PCM.
    ///
    /// Each beep gets a linear attack and an exponential decay; amplitude is
    /// `min(pattern.volume * urgency_multiplier, 1.0)`. Sine beeps played at
    /// a multiplier above 1.0 sweep up to 1.5x the base frequency by the
    /// midpoint and back down by the end, for extra salience.
    pub fn render(&self, pattern: &AudioPattern, urgency_multiplier: f32) -> Vec<i16> {
        let rate = self.sample_rate as f32;
        let beep_samples = (pattern.duration_secs * rate) as usize;
        let gap_samples = (pattern.interval_secs * rate) as usize;
        let beeps = pattern.beep_count.max(1) as usize;
        let total = beeps * beep_samples + (beeps - 1) * gap_samples;

        let peak = (pattern.volume * urgency_multiplier).clamp(0.0, 1.0);
        let sweep = pattern.waveform == Waveform::Sine && urgency_multiplier > 1.0;

        let mut samples = vec![0i16; total];
        for beep in 0..beeps {
            let offset = beep * (beep_samples + gap_samples);
            let mut phase = 0.0f32;
            for i in 0..beep_samples {
                let t = i as f32 / rate;
                let freq = if sweep {
                    swept_frequency(pattern.frequency_hz, t, pattern.duration_secs)
                } else {
                    pattern.frequency_hz
                };
                phase += freq / rate;
                phase -= phase.floor();

                let amp = envelope(t, pattern.duration_secs, peak);
                let value = oscillate(pattern.waveform, phase) * amp;
                samples[offset + i] = (value * i16::MAX as f32) as i16;
            }
        }
        samples
    }
}

impl Default for SoundSynthesizer {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

fn oscillate(waveform: Waveform, phase: f32) -> f32 {
    match waveform {
        Waveform::Sine => (phase * std::f32::consts::TAU).sin(),
        Waveform::Square => {
            if phase < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Sawtooth => 2.0 * phase - 1.0,
        Waveform::Triangle => {
            if phase < 0.5 {
                4.0 * phase - 1.0
            } else {
                3.0 - 4.0 * phase
            }
        }
    }
}

/// Linear attack to `peak`, then exponential decay toward the gain floor.
fn envelope(t: f32, duration: f32, peak: f32) -> f32 {
    if peak <= 0.0 {
        return 0.0;
    }
    if t < ATTACK_SECS {
        return peak * (t / ATTACK_SECS);
    }
    let decay_span = (duration - ATTACK_SECS).max(f32::EPSILON);
    let progress = ((t - ATTACK_SECS) / decay_span).clamp(0.0, 1.0);
    peak * (DECAY_FLOOR / peak.max(DECAY_FLOOR)).powf(progress)
}

/// Exponential sweep to 1.5x the base frequency at the beep midpoint, then
/// back down to the base by the end.
fn swept_frequency(base: f32, t: f32, duration: f32) -> f32 {
    let half = duration / 2.0;
    if t <= half {
        base * 1.5f32.powf(t / half)
    } else {
        base * 1.5 * 1.5f32.powf(-((t - half) / half))
    }
}

/// Encode mono 16-bit PCM as a WAV byte buffer suitable for system players.
pub fn encode_wav(samples: &[i16], sample_rate: u32) -> Vec<u8> {
    let data_len = (samples.len() * 2) as u32;
    let byte_rate = sample_rate * 2;
    let mut out = Vec::with_capacity(44 + samples.len() * 2);

    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes()); // PCM chunk size
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    out.extend_from_slice(&1u16.to_le_bytes()); // mono
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes()); // block align
    out.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for sample in samples {
        out.extend_from_slice(&sample.to_le_bytes());
    }
    out
}
