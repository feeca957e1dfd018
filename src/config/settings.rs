use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub audio: AudioConfig,
    pub alerts: AlertsConfig,
    pub monitor: MonitorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    pub enabled: bool,
    /// Scales every pattern's volume, 0.0-1.0.
    pub master_volume: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsConfig {
    /// Confidence used when the caller doesn't supply one.
    pub default_confidence: f64,
    /// Mirror alerts to desktop notifications.
    pub desktop_notifications: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub refresh_rate_ms: u64,
    /// Seconds between simulated incidents in `monitor --demo`.
    pub demo_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            audio: AudioConfig {
                enabled: true,
                master_volume: 1.0,
            },
            alerts: AlertsConfig {
                default_confidence: 0.85,
                desktop_notifications: false,
            },
            monitor: MonitorConfig {
                refresh_rate_ms: 200,
                demo_interval_secs: 6,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = self.to_commented_toml();

        fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    /// Generate TOML configuration with comments explaining each option
    pub fn to_commented_toml(&self) -> String {
        let mut output = String::new();

        output.push_str("# driveguard Configuration File\n");
        output.push_str("# Driver Safety Alert Console - Configuration Options\n");
        output.push_str("#\n");
        output.push_str("# All settings have sensible defaults and can be overridden via CLI flags.\n");
        output.push('\n');

        output.push_str("[audio]\n");
        output.push_str("# Play audible warning patterns alongside visual alerts\n");
        output.push_str("# Audio requires a system player (aplay on Linux, afplay on macOS);\n");
        output.push_str("# when none is found, alerts stay visual-only\n");
        output.push_str(&format!("enabled = {}\n", self.audio.enabled));
        output.push('\n');
        output.push_str("# Master volume applied to every warning pattern (0.0 - 1.0)\n");
        output.push_str("# Urgency still scales loudness on top of this\n");
        output.push_str(&format!("master_volume = {:.1}\n", self.audio.master_volume));
        output.push('\n');

        output.push_str("[alerts]\n");
        output.push_str("# Detection confidence assumed when none is given (0.0 - 1.0)\n");
        output.push_str("# Shown as a percentage in every alert message\n");
        output.push_str(&format!(
            "default_confidence = {:.2}\n",
            self.alerts.default_confidence
        ));
        output.push('\n');
        output.push_str("# Mirror alerts to desktop notifications (requires a desktop session)\n");
        output.push_str(&format!(
            "desktop_notifications = {}\n",
            self.alerts.desktop_notifications
        ));
        output.push('\n');

        output.push_str("[monitor]\n");
        output.push_str("# Redraw interval for the live monitor TUI, in milliseconds\n");
        output.push_str(&format!("refresh_rate_ms = {}\n", self.monitor.refresh_rate_ms));
        output.push('\n');
        output.push_str("# Seconds between simulated incidents when running `monitor --demo`\n");
        output.push_str(&format!(
            "demo_interval_secs = {}\n",
            self.monitor.demo_interval_secs
        ));
        output.push('\n');

        output.push_str("# To reset to defaults: driveguard config init\n");
        output.push_str("# To modify values:     driveguard config set audio.master_volume 0.5\n");
        output.push_str("# To view current:      driveguard config show\n");

        output
    }

    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to determine home directory")?;
        Ok(home.join(".config").join("driveguard").join("config.toml"))
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "audio.enabled" => {
                self.audio.enabled = value
                    .parse()
                    .with_context(|| format!("Invalid boolean value: {value}"))?;
            }
            "audio.master_volume" => {
                let volume: f32 = value
                    .parse()
                    .with_context(|| format!("Invalid volume value: {value}"))?;
                if !(0.0..=1.0).contains(&volume) {
                    anyhow::bail!("Master volume must be between 0.0 and 1.0");
                }
                self.audio.master_volume = volume;
            }
            "alerts.default_confidence" => {
                let confidence: f64 = value
                    .parse()
                    .with_context(|| format!("Invalid confidence value: {value}"))?;
                if !(0.0..=1.0).contains(&confidence) {
                    anyhow::bail!("Confidence must be between 0.0 and 1.0");
                }
                self.alerts.default_confidence = confidence;
            }
            "alerts.desktop_notifications" => {
                self.alerts.desktop_notifications = value
                    .parse()
                    .with_context(|| format!("Invalid boolean value: {value}"))?;
            }
            "monitor.refresh_rate_ms" => {
                let rate: u64 = value
                    .parse()
                    .with_context(|| format!("Invalid refresh rate: {value}"))?;
                if rate == 0 {
                    anyhow::bail!("Refresh rate must be greater than zero");
                }
                self.monitor.refresh_rate_ms = rate;
            }
            "monitor.demo_interval_secs" => {
                let interval: u64 = value
                    .parse()
                    .with_context(|| format!("Invalid interval: {value}"))?;
                if interval == 0 {
                    anyhow::bail!("Demo interval must be greater than zero");
                }
                self.monitor.demo_interval_secs = interval;
            }
            _ => anyhow::bail!("Unknown configuration key: {key}"),
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.audio.master_volume) {
            anyhow::bail!("audio.master_volume must be between 0.0 and 1.0");
        }
        if !(0.0..=1.0).contains(&self.alerts.default_confidence) {
            anyhow::bail!("alerts.default_confidence must be between 0.0 and 1.0");
        }
        if self.monitor.refresh_rate_ms == 0 {
            anyhow::bail!("monitor.refresh_rate_ms must be greater than zero");
        }
        Ok(())
    }
}
