//! Haven Protocol - Wire contract between the Haven backend and its clients
//!
//! This crate contains every type that crosses the wire:
//! - The `{type, data}` event envelope and its known tag set
//! - Event payloads pushed over the WebSocket (`ServerEvent`)
//! - Entity models shared by push events and REST snapshots
//! - REST request and response bodies
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde, serde_json, chrono, thiserror
//! 2. **No business logic** - Pure data types and serialization
//! 3. **Self-contained events** - A consumer can apply any event given only
//!    its own prior state plus the payload; no event requires a synchronous
//!    follow-up fetch to be interpreted

pub mod envelope;
pub mod events;
pub mod requests;
pub mod responses;
pub mod types;

// =============================================================================
// Envelope & Events
// =============================================================================
pub use envelope::{tags, Envelope, EnvelopeError};
pub use events::{
    AgentAction, InitialState, OverrideNotice, ScenarioActive, ScenarioComplete, ScenarioStep,
    ServerEvent, VoiceAlert,
};

// =============================================================================
// Entity Models
// =============================================================================
pub use types::{
    AgentInfo, AgentStatus, DeviceState, DeviceType, EnergySummary, PatternAction, PatternInfo,
    PatternType, PriorityTier, RoomDevices, ThreatAssessment, ThreatLevel,
};

// =============================================================================
// REST Bodies
// =============================================================================
pub use requests::{
    BatteryOverride, CalendarOverride, CommandRequest, DeviceCommandRequest, DeviceFailure,
    GoogleTokenRequest, GpsCoordinates, GpsOverride, GridOverride, PermissionResponse,
    ScenarioRequest, SolarOverride, TimeMultiplier, VoiceAlertRequest, WeatherOverride,
};
pub use responses::{
    AuthAck, CommandOutcome, HealthStatus, PatternDecisionAck, PendingPermissions,
    ScenarioRunAck, ScenarioSummary, SimulationStatus, SystemEvent,
};
