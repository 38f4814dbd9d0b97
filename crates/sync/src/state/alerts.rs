//! The voice alert feed.

use std::sync::RwLock;

use haven_protocol::VoiceAlert;

use super::{read_lock, write_lock};

/// Ordered feed of voice alerts with an explicit dismiss affordance.
///
/// A repeated `alert_id` updates the existing entry in place (the backend
/// re-broadcasts an alert when its status changes) instead of appending a
/// duplicate.
#[derive(Default)]
pub struct AlertFeed {
    alerts: RwLock<Vec<VoiceAlert>>,
}

impl AlertFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, alert: VoiceAlert) {
        let mut alerts = write_lock(&self.alerts);
        if let Some(existing) = alerts.iter_mut().find(|a| a.alert_id == alert.alert_id) {
            *existing = alert;
        } else {
            alerts.push(alert);
        }
    }

    /// Remove one alert; returns whether it was present.
    pub fn dismiss(&self, alert_id: &str) -> bool {
        let mut alerts = write_lock(&self.alerts);
        let before = alerts.len();
        alerts.retain(|a| a.alert_id != alert_id);
        alerts.len() != before
    }

    pub fn list(&self) -> Vec<VoiceAlert> {
        read_lock(&self.alerts).clone()
    }

    /// Alerts still waiting on a user permission decision.
    pub fn pending_permissions(&self) -> Vec<VoiceAlert> {
        read_lock(&self.alerts)
            .iter()
            .filter(|a| a.require_permission && a.status == "pending")
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        read_lock(&self.alerts).len()
    }

    pub fn is_empty(&self) -> bool {
        read_lock(&self.alerts).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(id: &str, status: &str, require_permission: bool) -> VoiceAlert {
        VoiceAlert {
            alert_id: id.to_string(),
            message: "Heat wave inbound, pre-cooling now".to_string(),
            audio_base64: None,
            require_permission,
            status: status.to_string(),
            dnd_suppressed: false,
        }
    }

    #[test]
    fn test_repeated_id_updates_in_place() {
        let feed = AlertFeed::new();
        feed.push(alert("a-1", "pending", true));
        feed.push(alert("a-2", "info", false));
        feed.push(alert("a-1", "info", true));

        assert_eq!(feed.len(), 2);
        let first = &feed.list()[0];
        assert_eq!(first.alert_id, "a-1");
        assert_eq!(first.status, "info");
        assert!(feed.pending_permissions().is_empty());
    }

    #[test]
    fn test_dismiss_removes_only_named_alert() {
        let feed = AlertFeed::new();
        feed.push(alert("a-1", "info", false));
        feed.push(alert("a-2", "pending", true));

        assert!(feed.dismiss("a-1"));
        assert!(!feed.dismiss("a-1"));
        assert_eq!(feed.len(), 1);
        assert_eq!(feed.pending_permissions().len(), 1);
    }
}
