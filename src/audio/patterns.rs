// Static table mapping incident category to audible warning parameters.
use crate::alerts::catalog::IncidentCategory;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Triangle => "triangle",
        }
    }
}

/// Parameters for one beep sequence. Static, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioPattern {
    pub frequency_hz: f32,
    pub duration_secs: f32,
    pub waveform: Waveform,
    /// Base volume, 0.0..=1.0, before the urgency multiplier.
    pub volume: f32,
    pub beep_count: u32,
    /// Silence between successive beeps.
    pub interval_secs: f32,
}

/// Audible warning parameters for a category. Every category has its own
/// entry, including emergency.
pub fn pattern_for(category: IncidentCategory) -> AudioPattern {
    match category {
        IncidentCategory::Drowsiness => AudioPattern {
            frequency_hz: 800.0,
            duration_secs: 0.8,
            waveform: Waveform::Sine,
            volume: 0.4,
            beep_count: 3,
            interval_secs: 0.3,
        },
        IncidentCategory::Phone => AudioPattern {
            frequency_hz: 1000.0,
            duration_secs: 0.5,
            waveform: Waveform::Square,
            volume: 0.5,
            beep_count: 4,
            interval_secs: 0.2,
        },
        IncidentCategory::Overspeed => AudioPattern {
            frequency_hz: 1200.0,
            duration_secs: 1.0,
            waveform: Waveform::Sawtooth,
            volume: 0.6,
            beep_count: 2,
            interval_secs: 0.5,
        },
        IncidentCategory::Distraction => AudioPattern {
            frequency_hz: 900.0,
            duration_secs: 0.6,
            waveform: Waveform::Triangle,
            volume: 0.3,
            beep_count: 2,
            interval_secs: 0.4,
        },
        IncidentCategory::AggressiveDriving => AudioPattern {
            frequency_hz: 600.0,
            duration_secs: 1.2,
            waveform: Waveform::Sine,
            volume: 0.4,
            beep_count: 1,
            interval_secs: 0.0,
        },
        IncidentCategory::LaneDeparture => AudioPattern {
            frequency_hz: 1100.0,
            duration_secs: 0.4,
            waveform: Waveform::Square,
            volume: 0.5,
            beep_count: 5,
            interval_secs: 0.15,
        },
        IncidentCategory::WeatherAlert => AudioPattern {
            frequency_hz: 700.0,
            duration_secs: 0.7,
            waveform: Waveform::Sine,
            volume: 0.3,
            beep_count: 2,
            interval_secs: 0.6,
        },
        IncidentCategory::Fatigue => AudioPattern {
            frequency_hz: 750.0,
            duration_secs: 1.0,
            waveform: Waveform::Sine,
            volume: 0.4,
            beep_count: 3,
            interval_secs: 0.4,
        },
        IncidentCategory::Emergency => AudioPattern {
            frequency_hz: 1500.0,
            duration_secs: 0.3,
            waveform: Waveform::Square,
            volume: 0.8,
            beep_count: 10,
            interval_secs: 0.1,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_pattern() {
        for category in IncidentCategory::ALL {
            let pattern = pattern_for(category);
            assert!(pattern.frequency_hz > 0.0);
            assert!(pattern.duration_secs > 0.0);
            assert!(pattern.beep_count >= 1);
            assert!((0.0..=1.0).contains(&pattern.volume));
            assert!(pattern.interval_secs >= 0.0);
        }
    }

    #[test]
    fn test_emergency_is_loudest_and_fastest() {
        let emergency = pattern_for(IncidentCategory::Emergency);
        for category in IncidentCategory::ALL {
            let pattern = pattern_for(category);
            assert!(emergency.volume >= pattern.volume);
            assert!(emergency.beep_count >= pattern.beep_count);
        }
    }
}
