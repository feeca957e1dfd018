use anyhow::Result;

use crate::alerts::scheduler::AlertScheduler;
use crate::audio::engine::AudioEngine;
use crate::audio::patterns::pattern_for;
use crate::alerts::catalog::IncidentCategory;
use crate::config::Config;

pub async fn handle_test_audio_command(config: &Config, json_output: bool) -> Result<()> {
    let audio = AudioEngine::new(true, config.audio.master_volume);

    if !audio.is_available() {
        if json_output {
            println!(r#"{{"status": "error", "message": "No system audio player found"}}"#);
        } else {
            eprintln!("Error: no system audio player found (need aplay or afplay)");
        }
        std::process::exit(1);
    }

    let scheduler = AlertScheduler::new(audio);
    scheduler.test_audio();

    let pattern = pattern_for(IncidentCategory::Phone);
    let beeps = pattern.beep_count.max(1);
    let total = beeps as f32 * pattern.duration_secs
        + beeps.saturating_sub(1) as f32 * pattern.interval_secs;

    if json_output {
        println!(r#"{{"status": "success", "message": "Test pattern playing"}}"#);
    } else {
        println!(
            "Playing test pattern: {}x {} beeps at {} Hz",
            pattern.beep_count,
            pattern.waveform.as_str(),
            pattern.frequency_hz as u32
        );
    }

    tokio::time::sleep(std::time::Duration::from_secs_f32(total + 0.2)).await;

    Ok(())
}
