// Playback side of the audio subsystem. The synthesizer renders PCM; this
// module hands the encoded WAV to a system player on a detached thread so
// the caller never blocks on sound.
use anyhow::{Context, Result};
use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::alerts::catalog::Urgency;
use crate::audio::patterns::AudioPattern;
use crate::audio::synth::{SoundSynthesizer, encode_wav};

pub trait AudioSink: Send + Sync {
    fn play(&self, wav: &[u8]) -> Result<()>;
}

/// Plays WAV buffers through the platform's command-line player
/// (`aplay` on Linux via stdin, `afplay` on macOS via a temp file).
pub struct SystemPlayerSink;

impl SystemPlayerSink {
    /// Probe once for a usable player. No retry: if nothing is found the
    /// session simply runs without sound.
    pub fn detect() -> Option<Self> {
        #[cfg(target_os = "linux")]
        {
            let found = Command::new("aplay")
                .arg("--version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .map(|s| s.success())
                .unwrap_or(false);
            if found { Some(SystemPlayerSink) } else { None }
        }

        #[cfg(target_os = "macos")]
        {
            Some(SystemPlayerSink)
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            None
        }
    }
}

impl AudioSink for SystemPlayerSink {
    #[allow(unused_variables)]
    fn play(&self, wav: &[u8]) -> Result<()> {
        #[cfg(target_os = "linux")]
        {
            let mut child = Command::new("aplay")
                .args(["-q", "-"])
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
                .context("Failed to spawn aplay")?;
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(wav).context("Failed to stream WAV to aplay")?;
            }
            child.wait().context("aplay did not exit cleanly")?;
        }

        #[cfg(target_os = "macos")]
        {
            // afplay needs a file, use temp
            let path = std::env::temp_dir().join("driveguard_alert.wav");
            std::fs::write(&path, wav)
                .with_context(|| format!("Failed to write WAV to {}", path.display()))?;
            Command::new("afplay")
                .arg(&path)
                .status()
                .context("Failed to run afplay")?;
        }

        Ok(())
    }
}

/// Process-wide audio resource: one synthesizer plus an optional sink.
/// Cloning shares the enabled flag and the sink, so every handle observes
/// the same toggle state.
#[derive(Clone)]
pub struct AudioEngine {
    enabled: Arc<AtomicBool>,
    sink: Option<Arc<dyn AudioSink>>,
    synth: SoundSynthesizer,
    master_volume: f32,
}

impl AudioEngine {
    /// Engine backed by the system player, if one is available. A missing
    /// player disables sound for the session; everything else keeps working.
    pub fn new(enabled: bool, master_volume: f32) -> Self {
        let sink = SystemPlayerSink::detect().map(|s| Arc::new(s) as Arc<dyn AudioSink>);
        Self {
            enabled: Arc::new(AtomicBool::new(enabled)),
            sink,
            synth: SoundSynthesizer::default(),
            master_volume: master_volume.clamp(0.0, 1.0),
        }
    }

    /// Engine with an explicit sink, for tests and custom backends.
    pub fn with_sink(sink: Arc<dyn AudioSink>, enabled: bool, master_volume: f32) -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(enabled)),
            sink: Some(sink),
            synth: SoundSynthesizer::default(),
            master_volume: master_volume.clamp(0.0, 1.0),
        }
    }

    /// Engine with no playback backend at all.
    pub fn disabled() -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(false)),
            sink: None,
            synth: SoundSynthesizer::default(),
            master_volume: 1.0,
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn is_available(&self) -> bool {
        self.sink.is_some()
    }

    /// Render and play a pattern at the given urgency. Non-blocking; a
    /// disabled or unavailable engine skips playback without error.
    pub fn play_pattern(&self, pattern: AudioPattern, urgency: Urgency) {
        if !self.is_enabled() {
            return;
        }
        let Some(sink) = self.sink.clone() else {
            return;
        };

        let multiplier = urgency.volume_multiplier() * self.master_volume;
        let samples = self.synth.render(&pattern, multiplier);
        let wav = encode_wav(&samples, self.synth.sample_rate());

        std::thread::spawn(move || {
            if let Err(e) = sink.play(&wav) {
                eprintln!("Warning: audio playback failed: {e}");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::catalog::IncidentCategory;
    use crate::audio::patterns::pattern_for;
    use std::sync::Mutex;

    pub struct RecordingSink {
        pub plays: Mutex<Vec<usize>>,
    }

    impl RecordingSink {
        pub fn new() -> Arc<Self> {
            Arc::new(Self { plays: Mutex::new(Vec::new()) })
        }

        pub fn play_count(&self) -> usize {
            self.plays.lock().unwrap().len()
        }
    }

    impl AudioSink for RecordingSink {
        fn play(&self, wav: &[u8]) -> Result<()> {
            self.plays.lock().unwrap().push(wav.len());
            Ok(())
        }
    }

    fn drain_playback_threads() {
        // Playback is a detached thread; give it a moment to land.
        std::thread::sleep(std::time::Duration::from_millis(50));
    }

    #[test]
    fn test_play_reaches_sink_when_enabled() {
        let sink = RecordingSink::new();
        let engine = AudioEngine::with_sink(sink.clone(), true, 1.0);
        engine.play_pattern(pattern_for(IncidentCategory::Phone), Urgency::Medium);
        drain_playback_threads();
        assert_eq!(sink.play_count(), 1);
    }

    #[test]
    fn test_disabled_engine_skips_sink() {
        let sink = RecordingSink::new();
        let engine = AudioEngine::with_sink(sink.clone(), false, 1.0);
        engine.play_pattern(pattern_for(IncidentCategory::Phone), Urgency::Medium);
        drain_playback_threads();
        assert_eq!(sink.play_count(), 0);
    }

    #[test]
    fn test_toggle_shared_across_clones() {
        let sink = RecordingSink::new();
        let engine = AudioEngine::with_sink(sink.clone(), true, 1.0);
        let clone = engine.clone();
        clone.set_enabled(false);
        assert!(!engine.is_enabled());

        engine.play_pattern(pattern_for(IncidentCategory::Phone), Urgency::Medium);
        drain_playback_threads();
        assert_eq!(sink.play_count(), 0);
    }

    #[test]
    fn test_engine_without_sink_is_silent_not_fatal() {
        let engine = AudioEngine::disabled();
        assert!(!engine.is_available());
        engine.play_pattern(pattern_for(IncidentCategory::Emergency), Urgency::Critical);
    }
}
