//! Typed wrappers over the consumed REST surface.
//!
//! Snapshots come back as protocol entity models; command acks that carry
//! override state dictionaries stay untyped (`serde_json::Value`) because
//! their shape varies per override category.

use async_trait::async_trait;

use haven_protocol::{
    AgentInfo, AuthAck, BatteryOverride, CalendarOverride, CommandOutcome, CommandRequest,
    DeviceCommandRequest, DeviceFailure, DeviceState, EnergySummary, GoogleTokenRequest,
    GpsCoordinates, GpsOverride, GridOverride, HealthStatus, PatternDecisionAck, PatternInfo,
    PendingPermissions, PermissionResponse, RoomDevices, ScenarioRequest, ScenarioRunAck,
    ScenarioSummary, SimulationStatus, SolarOverride, SystemEvent, ThreatAssessment,
    TimeMultiplier, VoiceAlertRequest, WeatherOverride,
};

use super::{ApiClient, ApiError, ApiPort};

// =============================================================================
// Snapshots
// =============================================================================

impl ApiClient {
    /// `GET /devices` - all devices grouped by room.
    pub async fn fetch_rooms(&self) -> Result<RoomDevices, ApiError> {
        self.get_json("devices").await
    }

    /// `GET /devices/flat` - all devices as a flat list.
    pub async fn fetch_devices_flat(&self) -> Result<Vec<DeviceState>, ApiError> {
        self.get_json("devices/flat").await
    }

    /// `GET /devices/{id}` - one device.
    pub async fn fetch_device(&self, device_id: &str) -> Result<DeviceState, ApiError> {
        self.get_json(&format!("devices/{device_id}")).await
    }

    /// `GET /devices/energy` - consumption and production summary.
    pub async fn fetch_energy(&self) -> Result<EnergySummary, ApiError> {
        self.get_json("devices/energy").await
    }

    /// `GET /agents` - status of all backend agents.
    pub async fn fetch_agents(&self) -> Result<Vec<AgentInfo>, ApiError> {
        self.get_json("agents").await
    }

    /// `GET /threats/current` - the latest threat assessment.
    pub async fn fetch_current_threat(&self) -> Result<ThreatAssessment, ApiError> {
        self.get_json("threats/current").await
    }

    /// `GET /patterns` - all detected patterns.
    pub async fn fetch_patterns(&self) -> Result<Vec<PatternInfo>, ApiError> {
        self.get_json("patterns").await
    }

    /// `GET /simulation/status` - overrides and scenario state.
    pub async fn fetch_simulation_status(&self) -> Result<SimulationStatus, ApiError> {
        self.get_json("simulation/status").await
    }

    /// `GET /simulation/scenarios` - available pre-built scenarios.
    pub async fn fetch_scenarios(&self) -> Result<Vec<ScenarioSummary>, ApiError> {
        self.get_json("simulation/scenarios").await
    }

    /// `GET /voice/pending` - count of pending permission requests.
    pub async fn fetch_pending_permissions(&self) -> Result<PendingPermissions, ApiError> {
        self.get_json("voice/pending").await
    }

    /// `GET /events?limit=N` - the most recent persisted system events.
    pub async fn fetch_recent_events(&self, limit: u32) -> Result<Vec<SystemEvent>, ApiError> {
        self.get_json(&format!("events?limit={limit}")).await
    }

    /// `GET /health`.
    pub async fn fetch_health(&self) -> Result<HealthStatus, ApiError> {
        self.get_json("health").await
    }
}

// =============================================================================
// Commands
// =============================================================================

impl ApiClient {
    /// `POST /devices/{id}/command` - actuate one device.
    pub async fn send_device_command(
        &self,
        device_id: &str,
        command: &DeviceCommandRequest,
    ) -> Result<serde_json::Value, ApiError> {
        self.post_json(&format!("devices/{device_id}/command"), command)
            .await
    }

    /// `POST /commands` - free-text or voice command to the orchestrator.
    pub async fn submit_command(&self, command: &CommandRequest) -> Result<CommandOutcome, ApiError> {
        self.post_json("commands", command).await
    }

    /// `POST /patterns/{id}/approve`.
    pub async fn approve_pattern(&self, pattern_id: &str) -> Result<PatternDecisionAck, ApiError> {
        self.post_empty(&format!("patterns/{pattern_id}/approve")).await
    }

    /// `POST /patterns/{id}/dismiss`.
    pub async fn dismiss_pattern(&self, pattern_id: &str) -> Result<PatternDecisionAck, ApiError> {
        self.post_empty(&format!("patterns/{pattern_id}/dismiss")).await
    }

    /// `POST /patterns/analyze` - manually trigger pattern analysis.
    pub async fn trigger_pattern_analysis(&self) -> Result<serde_json::Value, ApiError> {
        self.post_empty("patterns/analyze").await
    }

    /// `POST /simulation/scenarios/run`.
    pub async fn run_scenario(&self, request: &ScenarioRequest) -> Result<ScenarioRunAck, ApiError> {
        self.post_json("simulation/scenarios/run", request).await
    }

    /// `POST /simulation/scenarios/stop`.
    pub async fn stop_scenario(&self) -> Result<ScenarioRunAck, ApiError> {
        self.post_empty("simulation/scenarios/stop").await
    }

    /// `POST /voice/alert` - speak a message, optionally asking permission.
    pub async fn send_voice_alert(
        &self,
        request: &VoiceAlertRequest,
    ) -> Result<serde_json::Value, ApiError> {
        self.post_json("voice/alert", request).await
    }

    /// `POST /voice/permission` - answer a pending permission request.
    pub async fn respond_permission(
        &self,
        response: &PermissionResponse,
    ) -> Result<serde_json::Value, ApiError> {
        self.post_json("voice/permission", response).await
    }

    /// `POST /auth/google-token` - hand the backend an OAuth token and keep
    /// it as the bearer credential for subsequent requests.
    pub async fn sign_in(&self, request: &GoogleTokenRequest) -> Result<AuthAck, ApiError> {
        let ack: AuthAck = self.post_json("auth/google-token", request).await?;
        if ack.success {
            self.set_access_token(request.access_token.clone());
        }
        Ok(ack)
    }
}

// =============================================================================
// Simulation overrides
// =============================================================================

impl ApiClient {
    /// `POST /simulation/weather`.
    pub async fn set_weather(&self, body: &WeatherOverride) -> Result<serde_json::Value, ApiError> {
        self.post_json("simulation/weather", body).await
    }

    /// `DELETE /simulation/weather`.
    pub async fn clear_weather(&self) -> Result<serde_json::Value, ApiError> {
        self.delete_json("simulation/weather").await
    }

    /// `POST /simulation/grid`.
    pub async fn set_grid(&self, body: &GridOverride) -> Result<serde_json::Value, ApiError> {
        self.post_json("simulation/grid", body).await
    }

    /// `DELETE /simulation/grid`.
    pub async fn clear_grid(&self) -> Result<serde_json::Value, ApiError> {
        self.delete_json("simulation/grid").await
    }

    /// `POST /simulation/gps/location`.
    pub async fn set_gps_location(&self, body: &GpsOverride) -> Result<serde_json::Value, ApiError> {
        self.post_json("simulation/gps/location", body).await
    }

    /// `POST /simulation/gps/coordinates`.
    pub async fn set_gps_coordinates(
        &self,
        body: &GpsCoordinates,
    ) -> Result<serde_json::Value, ApiError> {
        self.post_json("simulation/gps/coordinates", body).await
    }

    /// `DELETE /simulation/gps`.
    pub async fn clear_gps(&self) -> Result<serde_json::Value, ApiError> {
        self.delete_json("simulation/gps").await
    }

    /// `POST /simulation/battery`.
    pub async fn set_battery(&self, body: &BatteryOverride) -> Result<serde_json::Value, ApiError> {
        self.post_json("simulation/battery", body).await
    }

    /// `POST /simulation/solar`.
    pub async fn set_solar(&self, body: &SolarOverride) -> Result<serde_json::Value, ApiError> {
        self.post_json("simulation/solar", body).await
    }

    /// `POST /simulation/calendar`.
    pub async fn set_calendar(&self, body: &CalendarOverride) -> Result<serde_json::Value, ApiError> {
        self.post_json("simulation/calendar", body).await
    }

    /// `DELETE /simulation/calendar`.
    pub async fn clear_calendar(&self) -> Result<serde_json::Value, ApiError> {
        self.delete_json("simulation/calendar").await
    }

    /// `POST /simulation/device-failure`.
    pub async fn set_device_failure(&self, body: &DeviceFailure) -> Result<serde_json::Value, ApiError> {
        self.post_json("simulation/device-failure", body).await
    }

    /// `POST /simulation/time`.
    pub async fn set_time_multiplier(&self, body: &TimeMultiplier) -> Result<serde_json::Value, ApiError> {
        self.post_json("simulation/time", body).await
    }

    /// `DELETE /simulation/overrides` - clear every override category.
    pub async fn clear_all_overrides(&self) -> Result<serde_json::Value, ApiError> {
        self.delete_json("simulation/overrides").await
    }
}

// =============================================================================
// Port implementation
// =============================================================================

#[async_trait]
impl ApiPort for ApiClient {
    async fn rooms(&self) -> Result<RoomDevices, ApiError> {
        self.fetch_rooms().await
    }

    async fn energy(&self) -> Result<EnergySummary, ApiError> {
        self.fetch_energy().await
    }

    async fn agents(&self) -> Result<Vec<AgentInfo>, ApiError> {
        self.fetch_agents().await
    }

    async fn patterns(&self) -> Result<Vec<PatternInfo>, ApiError> {
        self.fetch_patterns().await
    }

    async fn simulation_status(&self) -> Result<SimulationStatus, ApiError> {
        self.fetch_simulation_status().await
    }
}
