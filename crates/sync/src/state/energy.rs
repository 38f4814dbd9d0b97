//! Whole-home energy snapshot.

use std::sync::RwLock;

use haven_protocol::EnergySummary;

use super::{read_lock, write_lock};

/// Latest energy snapshot. Each `energy_summary` event (and each poll)
/// replaces it wholesale - it is a snapshot, not a delta, so fields are
/// never merged.
#[derive(Default)]
pub struct EnergyMonitor {
    current: RwLock<Option<EnergySummary>>,
}

impl EnergyMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, summary: EnergySummary) {
        *write_lock(&self.current) = Some(summary);
    }

    pub fn current(&self) -> Option<EnergySummary> {
        read_lock(&self.current).clone()
    }

    /// Whether the home is currently exporting to the grid.
    pub fn exporting(&self) -> bool {
        read_lock(&self.current)
            .as_ref()
            .is_some_and(|s| s.net_grid_watts < 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(net: f64) -> EnergySummary {
        EnergySummary {
            total_consumption_watts: 1200.0,
            solar_generation_watts: 1500.0,
            battery_pct: 80.0,
            battery_mode: "charge".to_string(),
            net_grid_watts: net,
        }
    }

    #[test]
    fn test_replace_never_merges() {
        let monitor = EnergyMonitor::new();
        monitor.replace(summary(-300.0));
        monitor.replace(EnergySummary {
            battery_mode: "discharge".to_string(),
            ..summary(250.0)
        });

        let current = monitor.current().expect("populated");
        assert_eq!(current.battery_mode, "discharge");
        assert_eq!(current.net_grid_watts, 250.0);
        assert!(!monitor.exporting());
    }

    #[test]
    fn test_negative_net_flow_means_exporting() {
        let monitor = EnergyMonitor::new();
        assert!(!monitor.exporting());
        monitor.replace(summary(-300.0));
        assert!(monitor.exporting());
    }
}
