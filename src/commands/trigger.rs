use anyhow::Result;

use crate::alerts::catalog::IncidentCategory;
use crate::alerts::notifications::DesktopNotifier;
use crate::alerts::scheduler::{AlertEvent, AlertScheduler, DismissReason};
use crate::audio::engine::AudioEngine;
use crate::audio::patterns::pattern_for;
use crate::config::Config;
use crate::output::alert_table;

pub async fn handle_trigger_command(
    category: String,
    confidence: Option<f64>,
    wait: bool,
    notify: bool,
    config: &Config,
    no_audio: bool,
    json_output: bool,
    verbose: bool,
) -> Result<()> {
    let category = IncidentCategory::parse_lossy(&category);
    let confidence = confidence
        .unwrap_or(config.alerts.default_confidence)
        .clamp(0.0, 1.0);

    let audio = build_audio_engine(config, no_audio);
    if verbose && audio.is_enabled() && !audio.is_available() {
        eprintln!("Warning: no system audio player found, alerts will be silent");
    }

    let scheduler = AlertScheduler::new(audio);
    let mut events = scheduler.subscribe();

    let suggestion = scheduler.show_alert(category, confidence);

    if json_output {
        let row = crate::output::table::AlertRow::from_alert(category, &suggestion);
        println!("{}", serde_json::to_string_pretty(&row)?);
    } else {
        println!("{}", alert_table(category, &suggestion));
    }

    if notify || config.alerts.desktop_notifications {
        let notifier = DesktopNotifier::new(true);
        if let Err(e) = notifier.send_alert(category, &suggestion) {
            eprintln!("Warning: desktop notification failed: {e}");
        }
    }

    if wait {
        wait_for_dismissal(&mut events, json_output).await;
    } else if scheduler.audio().is_enabled() && scheduler.audio().is_available() {
        // Playback runs on a detached thread. Keep the process alive long
        // enough for the full beep sequence.
        let pattern = pattern_for(category);
        let beeps = pattern.beep_count.max(1);
        let total = beeps as f32 * pattern.duration_secs
            + beeps.saturating_sub(1) as f32 * pattern.interval_secs;
        tokio::time::sleep(std::time::Duration::from_secs_f32(total + 0.2)).await;
    }

    Ok(())
}

pub async fn handle_emergency_command(
    message: String,
    notify: bool,
    config: &Config,
    no_audio: bool,
    json_output: bool,
) -> Result<()> {
    let audio = build_audio_engine(config, no_audio);
    let scheduler = AlertScheduler::new(audio);
    let mut events = scheduler.subscribe();

    let suggestion = scheduler.show_emergency_alert(&message);

    if json_output {
        let row =
            crate::output::table::AlertRow::from_alert(IncidentCategory::Emergency, &suggestion);
        println!("{}", serde_json::to_string_pretty(&row)?);
    } else {
        println!("{}", alert_table(IncidentCategory::Emergency, &suggestion));
        println!("Emergency alerts stay active until dismissed. Press Ctrl+C to exit.");
    }

    if notify || config.alerts.desktop_notifications {
        let notifier = DesktopNotifier::new(true);
        if let Err(e) = notifier.send_alert(IncidentCategory::Emergency, &suggestion) {
            eprintln!("Warning: desktop notification failed: {e}");
        }
    }

    // Emergency alerts never expire on their own, so wait until the user
    // interrupts or something else dismisses the alert.
    tokio::select! {
        _ = wait_for_dismissal(&mut events, json_output) => {}
        _ = tokio::signal::ctrl_c() => {
            scheduler.dismiss();
            if !json_output {
                println!("Emergency alert dismissed.");
            }
        }
    }

    Ok(())
}

fn build_audio_engine(config: &Config, no_audio: bool) -> AudioEngine {
    if no_audio {
        AudioEngine::disabled()
    } else {
        AudioEngine::new(config.audio.enabled, config.audio.master_volume)
    }
}

async fn wait_for_dismissal(
    events: &mut tokio::sync::broadcast::Receiver<AlertEvent>,
    json_output: bool,
) {
    while let Ok(event) = events.recv().await {
        if let AlertEvent::Dismissed { reason, .. } = event {
            let reason_str = match reason {
                DismissReason::Expired => "expired",
                DismissReason::Superseded => "superseded",
                DismissReason::Manual => "manual",
            };
            if json_output {
                println!(r#"{{"status": "dismissed", "reason": "{reason_str}"}}"#);
            } else {
                println!("Alert dismissed ({reason_str}).");
            }
            break;
        }
    }
}
