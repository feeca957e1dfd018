// Alert scheduling: one current alert at a time, auto-dismissed by a timer
// the scheduler owns. UIs subscribe to events and derive countdowns from
// `current()` instead of running timers of their own.
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::alerts::catalog::{AlertCatalog, IncidentCategory, Suggestion, Urgency};
use crate::alerts::picker::{RandomPicker, SuggestionPicker};
use crate::audio::engine::AudioEngine;
use crate::audio::patterns::pattern_for;

/// Display duration hint for emergency banners. They never auto-clear; this
/// only sizes the progress bar.
const EMERGENCY_DURATION_MS: u64 = 30_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    /// The alert's display duration elapsed.
    Expired,
    /// A newer alert replaced it.
    Superseded,
    /// An explicit `dismiss()` call.
    Manual,
}

#[derive(Debug, Clone)]
pub enum AlertEvent {
    Issued {
        category: IncidentCategory,
        suggestion: Suggestion,
        confidence: f64,
        at: DateTime<Utc>,
    },
    Dismissed {
        reason: DismissReason,
        at: DateTime<Utc>,
    },
}

/// The alert currently on screen, with the timing needed to render a
/// countdown against the scheduler's own clock.
#[derive(Debug, Clone)]
pub struct ActiveAlert {
    pub suggestion: Suggestion,
    pub category: IncidentCategory,
    pub issued_at: Instant,
    /// `None` for emergency alerts, which only clear on explicit dismissal.
    pub deadline: Option<Instant>,
}

impl ActiveAlert {
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// Fraction of display time left, 1.0 down to 0.0. Emergency alerts
    /// hold at 1.0.
    pub fn progress(&self, now: Instant) -> f64 {
        match self.remaining(now) {
            Some(remaining) => {
                let total = self.suggestion.duration_ms.max(1) as f64;
                (remaining.as_millis() as f64 / total).clamp(0.0, 1.0)
            }
            None => 1.0,
        }
    }
}

struct SchedulerInner {
    catalog: AlertCatalog,
    picker: Box<dyn SuggestionPicker>,
    current: Option<ActiveAlert>,
    // Bumped on every issue/dismiss so a stale timer task can recognize it
    // lost the race and leave the newer alert alone.
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

/// Explicitly constructed scheduler owned by the caller; clones share state.
#[derive(Clone)]
pub struct AlertScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
    events: broadcast::Sender<AlertEvent>,
    audio: AudioEngine,
}

impl AlertScheduler {
    pub fn new(audio: AudioEngine) -> Self {
        Self::with_picker(audio, Box::new(RandomPicker))
    }

    pub fn with_picker(audio: AudioEngine, picker: Box<dyn SuggestionPicker>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                catalog: AlertCatalog::new(),
                picker,
                current: None,
                generation: 0,
                timer: None,
            })),
            events,
            audio,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AlertEvent> {
        self.events.subscribe()
    }

    pub fn audio(&self) -> &AudioEngine {
        &self.audio
    }

    /// Issue an alert for a detected incident. Supersedes any current alert,
    /// arms the auto-dismiss timer, and triggers audio playback. Returns the
    /// enriched suggestion for display.
    pub fn show_alert(&self, category: IncidentCategory, confidence: f64) -> Suggestion {
        let mut inner = self.inner.lock().unwrap();

        let len = inner.catalog.candidates(category).len();
        debug_assert!(len > 0, "catalog fallback must never be empty");
        let idx = inner.picker.pick(len);
        let base = inner.catalog.candidates(category)[idx].clone();

        let enriched = Suggestion {
            message: format!("{} ({:.0}% confidence)", base.message, confidence * 100.0),
            ..base
        };

        let superseded = self.install(&mut inner, category, enriched.clone(), true);
        drop(inner);

        self.announce(superseded, category, &enriched, confidence);
        self.audio.play_pattern(pattern_for(category), enriched.urgency);
        enriched
    }

    /// Critical banner for situations outside the incident catalog. Never
    /// auto-clears; only `dismiss()` removes it.
    pub fn show_emergency_alert(&self, message: &str) -> Suggestion {
        let suggestion = Suggestion {
            message: format!("🚨 EMERGENCY: {message}"),
            icon: "🚨".to_string(),
            action: Some("emergency".to_string()),
            urgency: Urgency::Critical,
            duration_ms: EMERGENCY_DURATION_MS,
        };

        let mut inner = self.inner.lock().unwrap();
        let superseded = self.install(&mut inner, IncidentCategory::Emergency, suggestion.clone(), false);
        drop(inner);

        self.announce(superseded, IncidentCategory::Emergency, &suggestion, 1.0);
        self.audio
            .play_pattern(pattern_for(IncidentCategory::Emergency), Urgency::Critical);
        suggestion
    }

    /// Clear the current alert, if any. Idempotent.
    pub fn dismiss(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.generation += 1;
        if let Some(handle) = inner.timer.take() {
            handle.abort();
        }
        let had_alert = inner.current.take().is_some();
        drop(inner);

        if had_alert {
            let _ = self.events.send(AlertEvent::Dismissed {
                reason: DismissReason::Manual,
                at: Utc::now(),
            });
        }
    }

    /// Toggle audio playback. Visual alerts are unaffected.
    pub fn set_audio_enabled(&self, enabled: bool) {
        self.audio.set_enabled(enabled);
    }

    /// Play a fixed sample pattern for user-facing diagnostics. Silent no-op
    /// when audio is disabled or unavailable.
    pub fn test_audio(&self) {
        self.audio
            .play_pattern(pattern_for(IncidentCategory::Phone), Urgency::Medium);
    }

    pub fn current(&self) -> Option<ActiveAlert> {
        self.inner.lock().unwrap().current.clone()
    }

    /// Append a custom suggestion to the catalog at runtime.
    pub fn add_custom_suggestion(
        &self,
        category: IncidentCategory,
        message: impl Into<String>,
        icon: impl Into<String>,
        action: Option<String>,
        urgency: Urgency,
    ) {
        self.inner
            .lock()
            .unwrap()
            .catalog
            .add_custom(category, message, icon, action, urgency);
    }

    /// Replace the current alert and (optionally) arm its expiry timer.
    /// Returns whether a previous alert was superseded.
    fn install(
        &self,
        inner: &mut SchedulerInner,
        category: IncidentCategory,
        suggestion: Suggestion,
        auto_dismiss: bool,
    ) -> bool {
        inner.generation += 1;
        let generation = inner.generation;
        if let Some(handle) = inner.timer.take() {
            handle.abort();
        }
        let superseded = inner.current.is_some();

        let now = Instant::now();
        let duration = Duration::from_millis(suggestion.duration_ms);
        inner.current = Some(ActiveAlert {
            suggestion,
            category,
            issued_at: now,
            deadline: auto_dismiss.then(|| now + duration),
        });

        if auto_dismiss {
            let state = Arc::clone(&self.inner);
            let events = self.events.clone();
            inner.timer = Some(tokio::spawn(async move {
                tokio::time::sleep(duration).await;
                let mut inner = state.lock().unwrap();
                if inner.generation == generation && inner.current.is_some() {
                    inner.current = None;
                    inner.timer = None;
                    drop(inner);
                    let _ = events.send(AlertEvent::Dismissed {
                        reason: DismissReason::Expired,
                        at: Utc::now(),
                    });
                }
            }));
        }

        superseded
    }

    fn announce(
        &self,
        superseded: bool,
        category: IncidentCategory,
        suggestion: &Suggestion,
        confidence: f64,
    ) {
        if superseded {
            let _ = self.events.send(AlertEvent::Dismissed {
                reason: DismissReason::Superseded,
                at: Utc::now(),
            });
        }
        let _ = self.events.send(AlertEvent::Issued {
            category,
            suggestion: suggestion.clone(),
            confidence,
            at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::picker::FixedPicker;
    use crate::audio::engine::AudioSink;
    use anyhow::Result;

    struct CountingSink(Mutex<usize>);

    impl CountingSink {
        fn new() -> Arc<Self> {
            Arc::new(Self(Mutex::new(0)))
        }

        fn count(&self) -> usize {
            *self.0.lock().unwrap()
        }
    }

    impl AudioSink for CountingSink {
        fn play(&self, _wav: &[u8]) -> Result<()> {
            *self.0.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn scheduler() -> AlertScheduler {
        AlertScheduler::with_picker(AudioEngine::disabled(), Box::new(FixedPicker(0)))
    }

    fn drain(rx: &mut broadcast::Receiver<AlertEvent>) -> Vec<AlertEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test(start_paused = true)]
    async fn test_show_alert_formats_confidence() {
        let scheduler = scheduler();
        let suggestion = scheduler.show_alert(IncidentCategory::Phone, 0.88);
        assert!(suggestion.message.ends_with("(88% confidence)"));
        assert!(matches!(
            suggestion.urgency,
            Urgency::Low | Urgency::Medium | Urgency::High
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_category_yields_valid_suggestion() {
        let scheduler = AlertScheduler::new(AudioEngine::disabled());
        for category in IncidentCategory::ALL {
            let suggestion = scheduler.show_alert(category, 0.5);
            assert!(suggestion.message.contains("% confidence)"));
            assert!(suggestion.duration_ms > 0);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_category_string_does_not_error() {
        let scheduler = scheduler();
        let category = IncidentCategory::parse_lossy("unknown_category");
        let suggestion = scheduler.show_alert(category, 0.5);
        assert!(suggestion.message.contains("% confidence)"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_alert_supersedes_first() {
        let scheduler = scheduler();
        let mut rx = scheduler.subscribe();

        scheduler.show_alert(IncidentCategory::Drowsiness, 0.9);
        let second = scheduler.show_alert(IncidentCategory::Phone, 0.8);

        let current = scheduler.current().unwrap();
        assert_eq!(current.suggestion.message, second.message);

        // Let both timers' durations pass; only the second may expire.
        tokio::time::sleep(Duration::from_millis(25_000)).await;
        assert!(scheduler.current().is_none());

        let events = drain(&mut rx);
        let expirations = events
            .iter()
            .filter(|e| matches!(e, AlertEvent::Dismissed { reason: DismissReason::Expired, .. }))
            .count();
        let supersessions = events
            .iter()
            .filter(|e| {
                matches!(e, AlertEvent::Dismissed { reason: DismissReason::Superseded, .. })
            })
            .count();
        assert_eq!(expirations, 1);
        assert_eq!(supersessions, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_alert_expires_after_duration() {
        let scheduler = scheduler();
        let suggestion = scheduler.show_alert(IncidentCategory::Fatigue, 0.7);
        assert!(scheduler.current().is_some());

        tokio::time::sleep(Duration::from_millis(suggestion.duration_ms + 100)).await;
        assert!(scheduler.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_is_idempotent() {
        let scheduler = scheduler();
        let mut rx = scheduler.subscribe();

        scheduler.dismiss();
        scheduler.dismiss();
        assert!(drain(&mut rx).is_empty());

        scheduler.show_alert(IncidentCategory::Overspeed, 0.6);
        scheduler.dismiss();
        scheduler.dismiss();
        assert!(scheduler.current().is_none());

        let manual = drain(&mut rx)
            .iter()
            .filter(|e| matches!(e, AlertEvent::Dismissed { reason: DismissReason::Manual, .. }))
            .count();
        assert_eq!(manual, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismissed_alert_timer_never_fires() {
        let scheduler = scheduler();
        let mut rx = scheduler.subscribe();

        let suggestion = scheduler.show_alert(IncidentCategory::LaneDeparture, 0.9);
        scheduler.dismiss();

        tokio::time::sleep(Duration::from_millis(suggestion.duration_ms + 1_000)).await;
        let expirations = drain(&mut rx)
            .iter()
            .filter(|e| matches!(e, AlertEvent::Dismissed { reason: DismissReason::Expired, .. }))
            .count();
        assert_eq!(expirations, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_emergency_alert_never_auto_clears() {
        let scheduler = scheduler();
        let suggestion = scheduler.show_emergency_alert("Collision risk ahead");
        assert!(suggestion.message.starts_with("🚨 EMERGENCY:"));
        assert_eq!(suggestion.urgency, Urgency::Critical);

        tokio::time::sleep(Duration::from_secs(120)).await;
        let current = scheduler.current().unwrap();
        assert!(current.deadline.is_none());

        scheduler.dismiss();
        assert!(scheduler.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_audio_disabled_keeps_visual_alert() {
        let sink = CountingSink::new();
        let audio = AudioEngine::with_sink(sink.clone(), true, 1.0);
        let scheduler = AlertScheduler::with_picker(audio, Box::new(FixedPicker(0)));

        scheduler.set_audio_enabled(false);
        scheduler.show_alert(IncidentCategory::Phone, 0.8);
        scheduler.test_audio();

        assert!(scheduler.current().is_some());
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(sink.count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_show_alert_triggers_playback_when_enabled() {
        let sink = CountingSink::new();
        let audio = AudioEngine::with_sink(sink.clone(), true, 1.0);
        let scheduler = AlertScheduler::with_picker(audio, Box::new(FixedPicker(0)));

        scheduler.show_alert(IncidentCategory::Phone, 0.8);
        std::thread::sleep(Duration::from_millis(100));
        assert_eq!(sink.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_counts_down() {
        let scheduler = scheduler();
        scheduler.show_alert(IncidentCategory::Drowsiness, 0.9);
        let active = scheduler.current().unwrap();
        assert!(active.progress(active.issued_at) > 0.99);

        let later = active.issued_at + Duration::from_millis(active.suggestion.duration_ms / 2);
        let halfway = active.progress(later);
        assert!(halfway > 0.4 && halfway < 0.6);

        let done = active.issued_at + Duration::from_millis(active.suggestion.duration_ms * 2);
        assert_eq!(active.progress(done), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_suggestion_is_selectable() {
        let scheduler = AlertScheduler::with_picker(
            AudioEngine::disabled(),
            Box::new(FixedPicker(usize::MAX)), // always the last entry
        );
        scheduler.add_custom_suggestion(
            IncidentCategory::WeatherAlert,
            "🌨️ Snow reported on this route",
            "🌨️",
            None,
            Urgency::High,
        );
        let suggestion = scheduler.show_alert(IncidentCategory::WeatherAlert, 0.75);
        assert!(suggestion.message.starts_with("🌨️ Snow reported"));
        assert_eq!(suggestion.duration_ms, Urgency::High.default_duration_ms());
    }
}
