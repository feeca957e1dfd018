// Desktop notification mirror for alerts, so incidents reach the driver
// even when the console is in the background.
use anyhow::{Context, Result};
use notify_rust::{Notification, Timeout};

use crate::alerts::catalog::{IncidentCategory, Suggestion, Urgency};

pub struct DesktopNotifier {
    enabled: bool,
}

impl DesktopNotifier {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn send_alert(&self, category: IncidentCategory, suggestion: &Suggestion) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let (timeout, urgency) = match suggestion.urgency {
            Urgency::Critical => (Timeout::Never, notify_rust::Urgency::Critical),
            Urgency::High => (Timeout::Milliseconds(10000), notify_rust::Urgency::Critical),
            Urgency::Medium => (Timeout::Milliseconds(7000), notify_rust::Urgency::Normal),
            Urgency::Low => (Timeout::Milliseconds(5000), notify_rust::Urgency::Low),
        };

        let mut notification = Notification::new();
        notification
            .summary(&format!("Driver alert: {category}"))
            .body(&suggestion.message)
            .timeout(timeout)
            .urgency(urgency)
            .appname("driveguard");

        let icon = match suggestion.urgency {
            Urgency::Critical | Urgency::High => "dialog-warning",
            Urgency::Medium | Urgency::Low => "dialog-information",
        };
        notification.icon(icon);

        if matches!(suggestion.urgency, Urgency::High | Urgency::Critical) {
            notification.action("acknowledge", suggestion.action_label());
            notification.action("dismiss", "Dismiss");
        }

        notification
            .show()
            .context("Failed to show desktop notification")?;

        Ok(())
    }

    pub fn send_test_notification(&self) -> Result<()> {
        if !self.enabled {
            anyhow::bail!("Desktop notifications are disabled");
        }

        Notification::new()
            .summary("driveguard notification test")
            .body("Desktop notifications are working. Incident alerts will appear here.")
            .timeout(Timeout::Milliseconds(5000))
            .urgency(notify_rust::Urgency::Normal)
            .appname("driveguard")
            .icon("dialog-information")
            .show()
            .context("Failed to show test notification")?;

        Ok(())
    }

    pub fn is_available() -> bool {
        // Needs a desktop session to deliver anything.
        #[cfg(target_os = "linux")]
        {
            std::env::var("DISPLAY").is_ok() || std::env::var("WAYLAND_DISPLAY").is_ok()
        }

        #[cfg(target_os = "macos")]
        {
            true
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            false
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new(Self::is_available())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_suggestion() -> Suggestion {
        Suggestion {
            message: "📱 Please put your phone away while driving (88% confidence)".to_string(),
            icon: "📱".to_string(),
            action: Some("phone_away".to_string()),
            urgency: Urgency::High,
            duration_ms: 8_000,
        }
    }

    #[test]
    fn test_notifier_enable_disable() {
        let mut notifier = DesktopNotifier::new(false);
        assert!(!notifier.is_enabled());

        notifier.set_enabled(true);
        assert!(notifier.is_enabled());

        notifier.set_enabled(false);
        assert!(!notifier.is_enabled());
    }

    #[test]
    fn test_disabled_notifier_skips_send() {
        let notifier = DesktopNotifier::new(false);
        let result = notifier.send_alert(IncidentCategory::Phone, &sample_suggestion());
        assert!(result.is_ok());
    }

    #[test]
    fn test_disabled_notifier_rejects_test_notification() {
        let notifier = DesktopNotifier::new(false);
        assert!(notifier.send_test_notification().is_err());
    }
}
