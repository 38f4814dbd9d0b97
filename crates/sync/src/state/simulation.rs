//! Simulation status for the override control panel.

use std::sync::RwLock;

use haven_protocol::SimulationStatus;

use super::{read_lock, write_lock};

/// Latest simulation status. `simulation_override` events are invalidation
/// signals - the service refetches the status rather than patching override
/// categories field by field.
#[derive(Default)]
pub struct OverridePanel {
    status: RwLock<Option<SimulationStatus>>,
}

impl OverridePanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, status: SimulationStatus) {
        *write_lock(&self.status) = Some(status);
    }

    pub fn status(&self) -> Option<SimulationStatus> {
        read_lock(&self.status).clone()
    }

    /// Whether any override category is currently active.
    pub fn has_overrides(&self) -> bool {
        read_lock(&self.status)
            .as_ref()
            .is_some_and(|s| !s.active_overrides.is_empty())
    }
}
