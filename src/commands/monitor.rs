use anyhow::Result;
use rand::Rng;

use crate::alerts::catalog::IncidentCategory;
use crate::alerts::scheduler::AlertScheduler;
use crate::audio::engine::AudioEngine;
use crate::config::Config;
use crate::monitor::Dashboard;

/// Categories the demo loop draws from. Emergency is excluded so the demo
/// never raises an alert that blocks auto-dismissal.
const DEMO_CATEGORIES: [IncidentCategory; 8] = [
    IncidentCategory::Drowsiness,
    IncidentCategory::Phone,
    IncidentCategory::Overspeed,
    IncidentCategory::Distraction,
    IncidentCategory::AggressiveDriving,
    IncidentCategory::LaneDeparture,
    IncidentCategory::WeatherAlert,
    IncidentCategory::Fatigue,
];

pub async fn handle_monitor_command(
    demo: bool,
    refresh_rate_ms: Option<u64>,
    config: &Config,
    no_audio: bool,
) -> Result<()> {
    let audio = if no_audio {
        AudioEngine::disabled()
    } else {
        AudioEngine::new(config.audio.enabled, config.audio.master_volume)
    };

    let scheduler = AlertScheduler::new(audio);
    let refresh_rate = refresh_rate_ms.unwrap_or(config.monitor.refresh_rate_ms);

    let demo_task = demo.then(|| {
        let scheduler = scheduler.clone();
        let interval_secs = config.monitor.demo_interval_secs.max(1);
        tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval(std::time::Duration::from_secs(interval_secs));
            ticker.tick().await; // first tick fires immediately
            loop {
                ticker.tick().await;
                let (category, confidence) = {
                    let mut rng = rand::thread_rng();
                    let category = DEMO_CATEGORIES[rng.gen_range(0..DEMO_CATEGORIES.len())];
                    (category, rng.gen_range(0.70..0.99))
                };
                scheduler.show_alert(category, confidence);
            }
        })
    });

    let mut dashboard = Dashboard::new(scheduler, refresh_rate)?;
    let result = dashboard.run().await;

    if let Some(task) = demo_task {
        task.abort();
    }

    result
}
