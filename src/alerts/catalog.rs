// Suggestion catalog: incident categories, urgency tiers, and the static
// table of recommended driver actions.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Severity tier controlling alert duration, audio loudness, and visual emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    /// Audio volume scaling applied on top of the pattern's base volume.
    pub fn volume_multiplier(&self) -> f32 {
        match self {
            Urgency::Low => 0.5,
            Urgency::Medium => 0.8,
            Urgency::High => 1.2,
            Urgency::Critical => 1.5,
        }
    }

    /// Default display duration for custom suggestions without an explicit one.
    pub fn default_duration_ms(&self) -> u64 {
        match self {
            Urgency::Low => 6_000,
            Urgency::Medium => 8_000,
            Urgency::High => 10_000,
            Urgency::Critical => 15_000,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
            Urgency::Critical => "critical",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a detected unsafe-driving condition.
///
/// The suggestion catalog and the audio pattern table are indexed by this
/// enum independently; a category may have a pattern but no suggestion list
/// (emergency), in which case the catalog falls back to [`IncidentCategory::fallback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentCategory {
    Drowsiness,
    Phone,
    Overspeed,
    Distraction,
    AggressiveDriving,
    LaneDeparture,
    WeatherAlert,
    Fatigue,
    Emergency,
}

impl IncidentCategory {
    pub const ALL: [IncidentCategory; 9] = [
        IncidentCategory::Drowsiness,
        IncidentCategory::Phone,
        IncidentCategory::Overspeed,
        IncidentCategory::Distraction,
        IncidentCategory::AggressiveDriving,
        IncidentCategory::LaneDeparture,
        IncidentCategory::WeatherAlert,
        IncidentCategory::Fatigue,
        IncidentCategory::Emergency,
    ];

    /// Category used when an unknown or unlisted category is requested.
    pub fn fallback() -> Self {
        IncidentCategory::Distraction
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentCategory::Drowsiness => "drowsiness",
            IncidentCategory::Phone => "phone",
            IncidentCategory::Overspeed => "overspeed",
            IncidentCategory::Distraction => "distraction",
            IncidentCategory::AggressiveDriving => "aggressive_driving",
            IncidentCategory::LaneDeparture => "lane_departure",
            IncidentCategory::WeatherAlert => "weather_alert",
            IncidentCategory::Fatigue => "fatigue",
            IncidentCategory::Emergency => "emergency",
        }
    }

    /// Parse a category name, degrading to the fallback category instead of
    /// erroring on unknown input. Detector integrations send free-form tags,
    /// so an unknown tag must still produce a usable alert.
    pub fn parse_lossy(s: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .unwrap_or_else(Self::fallback)
    }
}

impl fmt::Display for IncidentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recommended driver action, as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub message: String,
    pub icon: String,
    pub action: Option<String>,
    pub urgency: Urgency,
    pub duration_ms: u64,
}

impl Suggestion {
    /// Human-readable label for the suggestion's action button.
    pub fn action_label(&self) -> &'static str {
        match self.action.as_deref() {
            Some("hydrate") => "Drink Water",
            Some("break") => "Take Break",
            Some("rest") => "Find Rest Area",
            Some("music") => "Play Music",
            Some("stop") => "Stop Safely",
            Some("ventilate") => "Open Windows",
            Some("exercise") => "Note for Next Stop",
            Some("mandatory_break") => "STOP NOW",
            Some("emergency_stop") => "EMERGENCY STOP",
            Some("phone_away") => "Put Phone Away",
            Some("hands_free") => "Use Hands-Free",
            Some("pullover") => "Pull Over",
            Some("reduce_speed") => "Reduce Speed",
            Some("emergency") => "CALL EMERGENCY",
            _ => "Acknowledge",
        }
    }
}

struct SuggestionDef {
    message: &'static str,
    icon: &'static str,
    action: Option<&'static str>,
    urgency: Urgency,
    duration_ms: u64,
}

macro_rules! def {
    ($msg:expr, $icon:expr, $action:expr, $urgency:expr, $dur:expr) => {
        SuggestionDef {
            message: $msg,
            icon: $icon,
            action: Some($action),
            urgency: $urgency,
            duration_ms: $dur,
        }
    };
}

const DROWSINESS: &[SuggestionDef] = &[
    def!("💧 Drink some water to stay hydrated", "💧", "hydrate", Urgency::Medium, 8_000),
    def!("☕ Consider taking a coffee break", "☕", "break", Urgency::Medium, 8_000),
    def!("🛌 Pull over for a 15-20 minute power nap", "🛌", "rest", Urgency::High, 10_000),
    def!("🎵 Turn on some energizing music", "🎵", "music", Urgency::Medium, 7_000),
    def!("🚗 Find a safe place to stop and rest", "🚗", "stop", Urgency::High, 12_000),
    def!("🌬️ Open windows for fresh air circulation", "🌬️", "ventilate", Urgency::Low, 6_000),
    def!("🏃 Do some quick stretches at next stop", "🏃", "exercise", Urgency::Medium, 8_000),
    def!("😴 You've been driving for too long - take a break!", "😴", "mandatory_break", Urgency::Critical, 15_000),
    def!("💤 Microsleep detected - IMMEDIATE REST NEEDED", "💤", "emergency_stop", Urgency::Critical, 20_000),
];

const PHONE: &[SuggestionDef] = &[
    def!("📱 Please put your phone away while driving", "📱", "phone_away", Urgency::High, 8_000),
    def!("🔇 Use hands-free mode if you need to talk", "🔇", "hands_free", Urgency::Medium, 7_000),
    def!("🚫 Phone usage while driving is dangerous", "🚫", "safety_reminder", Urgency::High, 10_000),
    def!("🎯 Focus on the road ahead", "🎯", "focus", Urgency::Medium, 6_000),
    def!("⏰ Pull over safely to use your phone", "⏰", "pullover", Urgency::High, 12_000),
    def!("👀 Keep your eyes on the road at all times", "👀", "attention", Urgency::High, 8_000),
    def!("🔴 Emergency calls only while driving", "🔴", "emergency_only", Urgency::Medium, 9_000),
];

const OVERSPEED: &[SuggestionDef] = &[
    def!("🐌 Slow down - you're exceeding the speed limit", "🐌", "reduce_speed", Urgency::High, 10_000),
    def!("⚠️ Maintain safe following distance", "⚠️", "safe_distance", Urgency::Medium, 8_000),
    def!("🚦 Observe traffic signs and signals", "🚦", "observe_signs", Urgency::Medium, 7_000),
    def!("🛣️ Adjust speed for road conditions", "🛣️", "road_conditions", Urgency::Medium, 8_000),
    def!("⏱️ Arrive safely, not just quickly", "⏱️", "safety_first", Urgency::High, 9_000),
    def!("🚙 Speed kills - drive responsibly", "🚙", "responsibility", Urgency::High, 12_000),
    def!("👥 Think about other road users", "👥", "consider_others", Urgency::Medium, 8_000),
    def!("⛽ Speeding wastes fuel", "⛽", "economy", Urgency::Low, 6_000),
];

const DISTRACTION: &[SuggestionDef] = &[
    def!("👁️ Keep your eyes on the road", "👁️", "eyes_road", Urgency::High, 8_000),
    def!("🎯 Minimize distractions around you", "🎯", "minimize_distractions", Urgency::Medium, 7_000),
    def!("📍 Set GPS before starting your journey", "📍", "preset_gps", Urgency::Medium, 8_000),
];

const AGGRESSIVE_DRIVING: &[SuggestionDef] = &[
    def!("😌 Stay calm and patient while driving", "😌", "stay_calm", Urgency::Medium, 8_000),
    def!("🧘 Take deep breaths to reduce stress", "🧘", "breathe", Urgency::Medium, 7_000),
    def!("🕐 Allow extra time for your journey", "🕐", "extra_time", Urgency::Low, 6_000),
    def!("🤝 Be courteous to other drivers", "🤝", "be_courteous", Urgency::Medium, 8_000),
    def!("⚖️ Aggressive driving increases accident risk", "⚖️", "risk_awareness", Urgency::High, 10_000),
];

const LANE_DEPARTURE: &[SuggestionDef] = &[
    def!("↔️ Stay within your lane", "↔️", "stay_in_lane", Urgency::High, 8_000),
];

const WEATHER_ALERT: &[SuggestionDef] = &[
    def!("🌧️ Reduce speed in wet conditions", "🌧️", "wet_driving", Urgency::Medium, 8_000),
    def!("🌫️ Use headlights in foggy conditions", "🌫️", "fog_lights", Urgency::Medium, 8_000),
    def!("☀️ Use sunglasses to reduce glare", "☀️", "sun_protection", Urgency::Low, 6_000),
];

const FATIGUE: &[SuggestionDef] = &[
    def!("🥱 Fatigue detected - consider resting", "🥱", "rest_fatigue", Urgency::High, 10_000),
    def!("⏰ Take a break every 2 hours", "⏰", "regular_breaks", Urgency::Medium, 8_000),
    def!("🍎 Have a healthy snack for energy", "🍎", "healthy_snack", Urgency::Low, 6_000),
    def!("🚶 Walk around during breaks", "🚶", "walk_break", Urgency::Medium, 7_000),
];

fn builtin_defs(category: IncidentCategory) -> Option<&'static [SuggestionDef]> {
    match category {
        IncidentCategory::Drowsiness => Some(DROWSINESS),
        IncidentCategory::Phone => Some(PHONE),
        IncidentCategory::Overspeed => Some(OVERSPEED),
        IncidentCategory::Distraction => Some(DISTRACTION),
        IncidentCategory::AggressiveDriving => Some(AGGRESSIVE_DRIVING),
        IncidentCategory::LaneDeparture => Some(LANE_DEPARTURE),
        IncidentCategory::WeatherAlert => Some(WEATHER_ALERT),
        IncidentCategory::Fatigue => Some(FATIGUE),
        IncidentCategory::Emergency => None,
    }
}

/// Table mapping incident category to candidate suggestions.
///
/// Built-in entries come from the static tables above; custom entries can be
/// appended at runtime and are drawn from with equal probability.
pub struct AlertCatalog {
    entries: HashMap<IncidentCategory, Vec<Suggestion>>,
}

impl AlertCatalog {
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        for category in IncidentCategory::ALL {
            if let Some(defs) = builtin_defs(category) {
                let list = defs
                    .iter()
                    .map(|d| Suggestion {
                        message: d.message.to_string(),
                        icon: d.icon.to_string(),
                        action: d.action.map(str::to_string),
                        urgency: d.urgency,
                        duration_ms: d.duration_ms,
                    })
                    .collect();
                entries.insert(category, list);
            }
        }
        Self { entries }
    }

    /// Candidate suggestions for a category, falling back to the default
    /// category's list when the category has none of its own.
    pub fn candidates(&self, category: IncidentCategory) -> &[Suggestion] {
        self.entries
            .get(&category)
            .or_else(|| self.entries.get(&IncidentCategory::fallback()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether the category has its own suggestion list (vs. the fallback).
    pub fn has_own_list(&self, category: IncidentCategory) -> bool {
        self.entries.contains_key(&category)
    }

    /// Append a custom suggestion. Duration is derived from urgency.
    pub fn add_custom(
        &mut self,
        category: IncidentCategory,
        message: impl Into<String>,
        icon: impl Into<String>,
        action: Option<String>,
        urgency: Urgency,
    ) {
        self.entries.entry(category).or_default().push(Suggestion {
            message: message.into(),
            icon: icon.into(),
            action,
            urgency,
            duration_ms: urgency.default_duration_ms(),
        });
    }
}

impl Default for AlertCatalog {
    fn default() -> Self {
        Self::new()
    }
}
