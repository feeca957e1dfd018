use driveguard::alerts::{AlertScheduler, AlertEvent, DismissReason, IncidentCategory, Urgency};
use driveguard::alerts::picker::FixedPicker;
use driveguard::audio::engine::{AudioEngine, AudioSink};
use driveguard::audio::{SoundSynthesizer, pattern_for};
use driveguard::audio::synth::encode_wav;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// End-to-end tests for the alert pipeline: catalog selection, scheduling,
/// event fanout, and synthesized audio handed to the playback sink.

struct CapturingSink {
    wavs: Mutex<Vec<Vec<u8>>>,
}

impl CapturingSink {
    fn new() -> Arc<Self> {
        Arc::new(Self { wavs: Mutex::new(Vec::new()) })
    }
}

impl AudioSink for CapturingSink {
    fn play(&self, wav: &[u8]) -> anyhow::Result<()> {
        self.wavs.lock().unwrap().push(wav.to_vec());
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn test_full_alert_lifecycle() {
    let scheduler = AlertScheduler::with_picker(AudioEngine::disabled(), Box::new(FixedPicker(0)));
    let mut events = scheduler.subscribe();

    let suggestion = scheduler.show_alert(IncidentCategory::Drowsiness, 0.92);
    assert!(suggestion.message.ends_with("(92% confidence)"));

    // Issued event first
    match events.recv().await.unwrap() {
        AlertEvent::Issued { category, confidence, .. } => {
            assert_eq!(category, IncidentCategory::Drowsiness);
            assert!((confidence - 0.92).abs() < f64::EPSILON);
        }
        other => panic!("expected Issued, got {other:?}"),
    }

    // Then automatic expiry after the display duration
    tokio::time::sleep(Duration::from_millis(suggestion.duration_ms + 100)).await;
    match events.recv().await.unwrap() {
        AlertEvent::Dismissed { reason, .. } => assert_eq!(reason, DismissReason::Expired),
        other => panic!("expected Dismissed, got {other:?}"),
    }
    assert!(scheduler.current().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_alert_plays_synthesized_wav() {
    let sink = CapturingSink::new();
    let audio = AudioEngine::with_sink(sink.clone(), true, 1.0);
    let scheduler = AlertScheduler::with_picker(audio, Box::new(FixedPicker(0)));

    scheduler.show_alert(IncidentCategory::Phone, 0.8);
    std::thread::sleep(Duration::from_millis(100)); // detached playback thread

    let wavs = sink.wavs.lock().unwrap();
    assert_eq!(wavs.len(), 1);
    assert_eq!(&wavs[0][0..4], b"RIFF");
    assert_eq!(&wavs[0][8..12], b"WAVE");

    // Payload length should match a fresh render of the same pattern.
    let synth = SoundSynthesizer::default();
    let expected = synth.render(
        &pattern_for(IncidentCategory::Phone),
        Urgency::High.volume_multiplier(),
    );
    let reference = encode_wav(&expected, synth.sample_rate());
    assert_eq!(wavs[0].len(), reference.len());
}

#[tokio::test(start_paused = true)]
async fn test_emergency_outlives_regular_alerts() {
    let scheduler = AlertScheduler::with_picker(AudioEngine::disabled(), Box::new(FixedPicker(0)));

    scheduler.show_emergency_alert("Collision risk");
    tokio::time::sleep(Duration::from_secs(300)).await;
    let active = scheduler.current().expect("emergency alert must persist");
    assert_eq!(active.category, IncidentCategory::Emergency);
    assert_eq!(active.suggestion.urgency, Urgency::Critical);

    // A regular alert supersedes it, then expires normally.
    let regular = scheduler.show_alert(IncidentCategory::Overspeed, 0.7);
    tokio::time::sleep(Duration::from_millis(regular.duration_ms + 100)).await;
    assert!(scheduler.current().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_rapid_fire_alerts_leave_single_survivor() {
    let scheduler = AlertScheduler::with_picker(AudioEngine::disabled(), Box::new(FixedPicker(0)));
    let mut events = scheduler.subscribe();

    for category in [
        IncidentCategory::Drowsiness,
        IncidentCategory::Phone,
        IncidentCategory::Overspeed,
        IncidentCategory::Fatigue,
    ] {
        scheduler.show_alert(category, 0.8);
    }

    let last = scheduler.current().expect("last alert must be active");
    assert_eq!(last.category, IncidentCategory::Fatigue);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert!(scheduler.current().is_none());

    let mut expirations = 0;
    let mut supersessions = 0;
    while let Ok(event) = events.try_recv() {
        match event {
            AlertEvent::Dismissed { reason: DismissReason::Expired, .. } => expirations += 1,
            AlertEvent::Dismissed { reason: DismissReason::Superseded, .. } => supersessions += 1,
            _ => {}
        }
    }
    assert_eq!(expirations, 1, "only the surviving alert may expire");
    assert_eq!(supersessions, 3);
}
