//! The seam between the sync service and the REST surface.
//!
//! The service only ever *reads* through this trait (snapshots and list
//! refreshes); commands go straight through [`ApiClient`](super::ApiClient)
//! from whichever consumer issues them.

use async_trait::async_trait;

use haven_protocol::{AgentInfo, EnergySummary, PatternInfo, RoomDevices, SimulationStatus};

use super::ApiError;

/// Snapshot and list fetches the sync service depends on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiPort: Send + Sync {
    async fn rooms(&self) -> Result<RoomDevices, ApiError>;
    async fn energy(&self) -> Result<EnergySummary, ApiError>;
    async fn agents(&self) -> Result<Vec<AgentInfo>, ApiError>;
    async fn patterns(&self) -> Result<Vec<PatternInfo>, ApiError>;
    async fn simulation_status(&self) -> Result<SimulationStatus, ApiError>;
}
