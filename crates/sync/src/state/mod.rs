//! Per-entity state reconcilers.
//!
//! One store per entity family, each turning an inbound event (or a REST
//! snapshot) into an updated, render-ready slice of state. Push and poll
//! share the same merge rules, so whichever path delivers data first applies
//! the identical reconciliation.
//!
//! Stores mutate under short interior locks and never block; a failed
//! refetch keeps showing stale data - transient network issues must never
//! blank a previously-populated panel.

mod alerts;
mod devices;
mod energy;
mod roster;
mod simulation;
mod threat;
mod timeline;

pub use alerts::AlertFeed;
pub use devices::DeviceMap;
pub use energy::EnergyMonitor;
pub use roster::{AgentRoster, PatternBoard};
pub use simulation::OverridePanel;
pub use threat::ThreatWatch;
pub use timeline::{ScenarioTimeline, TimelineView, COMPLETION_GRACE};

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Every store slice a session keeps live, shared across consumers.
#[derive(Clone, Default)]
pub struct Stores {
    pub devices: Arc<DeviceMap>,
    pub energy: Arc<EnergyMonitor>,
    pub threat: Arc<ThreatWatch>,
    pub timeline: Arc<ScenarioTimeline>,
    pub agents: Arc<AgentRoster>,
    pub patterns: Arc<PatternBoard>,
    pub alerts: Arc<AlertFeed>,
    pub simulation: Arc<OverridePanel>,
}

impl Stores {
    pub fn new() -> Self {
        Self::default()
    }
}

// Reconcilers run on the dispatch path; a poisoned lock would mean a handler
// panicked mid-update, and the freshest state we have is still the best
// state to show.
pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
