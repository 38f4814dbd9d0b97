//! Entity models shared by push events and REST snapshots.
//!
//! Server-local timestamps come over the wire as naive ISO-8601 strings
//! (no offset), so they are modeled as `chrono::NaiveDateTime` throughout.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Room identifier to the devices placed in it. Every device belongs to
/// exactly one room; the key set of this map defines the set of rooms.
pub type RoomDevices = HashMap<String, Vec<DeviceState>>;

// =============================================================================
// Devices
// =============================================================================

/// Device classification. Determines which actions a device accepts and the
/// shape of its `properties` bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Light,
    Thermostat,
    Lock,
    Battery,
    CoffeeMaker,
    Sensor,
    SmartPlug,
    WaterHeater,
    /// Fallback for device types this client doesn't know yet.
    #[serde(other)]
    Unknown,
}

/// Scheduling priority used by the backend when shedding load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityTier {
    Critical,
    High,
    #[default]
    Medium,
    Low,
    Optional,
}

/// Current state of one device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceState {
    pub device_id: String,
    pub device_type: DeviceType,
    pub display_name: String,
    pub room: String,
    pub online: bool,
    pub power: bool,
    /// Type-specific property bag (brightness, target temperature, ...).
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub current_watts: f64,
    #[serde(default)]
    pub priority_tier: PriorityTier,
    pub last_updated: NaiveDateTime,
}

// =============================================================================
// Energy
// =============================================================================

/// Whole-home energy snapshot. Always replaced wholesale, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergySummary {
    pub total_consumption_watts: f64,
    pub solar_generation_watts: f64,
    pub battery_pct: f64,
    pub battery_mode: String,
    /// Net grid flow; negative means exporting to the grid.
    pub net_grid_watts: f64,
}

// =============================================================================
// Threats
// =============================================================================

/// Severity of a threat assessment, ordered from all-clear to critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatLevel {
    #[default]
    None,
    Low,
    Medium,
    High,
    Critical,
}

/// Structured threat assessment. Absence (or level `none`) means all clear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatAssessment {
    #[serde(default)]
    pub threat_level: ThreatLevel,
    /// Free-text category (heat_wave, grid_strain, storm, ...).
    #[serde(default)]
    pub threat_type: String,
    #[serde(default)]
    pub urgency_score: f64,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub recommended_actions: Vec<String>,
    /// Present on REST reads, absent on push events.
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
}

impl ThreatAssessment {
    /// Whether alert-styled rendering is warranted at all.
    pub fn is_alerting(&self) -> bool {
        self.threat_level > ThreatLevel::None
    }

    /// Whether this threat level requires user approval before the backend acts.
    pub fn requires_user_permission(&self) -> bool {
        self.threat_level >= ThreatLevel::High
    }
}

// =============================================================================
// Agents
// =============================================================================

/// Lifecycle status of one backend agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Idle,
    Running,
    Error,
    Stopped,
}

/// Status record for one backend agent. Accepted as-is on refresh; the
/// client never merges agent fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentInfo {
    pub agent_id: String,
    pub display_name: String,
    pub status: AgentStatus,
    #[serde(default)]
    pub last_action: Option<String>,
    #[serde(default)]
    pub last_reasoning: Option<String>,
    #[serde(default)]
    pub last_run: Option<NaiveDateTime>,
    #[serde(default)]
    pub error: Option<String>,
}

// =============================================================================
// Patterns
// =============================================================================

/// Origin of a learned pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Routine,
    Preference,
    Energy,
    /// Explicitly taught by the user via chat.
    UserDefined,
}

/// Single parameterized action in a pattern sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternAction {
    pub device_id: String,
    pub action: String,
    #[serde(default)]
    pub parameters: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub delay_seconds: f64,
}

/// A learned or candidate automation, as listed by `GET /patterns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternInfo {
    pub pattern_id: String,
    #[serde(rename = "type")]
    pub pattern_type: PatternType,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub frequency: u32,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub ready_to_suggest: bool,
    #[serde(default)]
    pub actions: Vec<PatternAction>,
    #[serde(default)]
    pub trigger_conditions: serde_json::Value,
    #[serde(default)]
    pub source_utterance: String,
    pub last_occurrence: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_state_decodes_backend_payload() {
        let device: DeviceState = serde_json::from_value(serde_json::json!({
            "device_id": "kitchen_light",
            "device_type": "light",
            "display_name": "Kitchen Light",
            "room": "kitchen",
            "online": true,
            "power": false,
            "properties": {"brightness": 70},
            "current_watts": 0.0,
            "priority_tier": "low",
            "last_updated": "2026-08-06T09:15:42.123456"
        }))
        .expect("device payload should decode");
        assert_eq!(device.device_type, DeviceType::Light);
        assert_eq!(device.priority_tier, PriorityTier::Low);
        assert_eq!(device.properties["brightness"], serde_json::json!(70));
    }

    #[test]
    fn test_unrecognized_device_type_falls_back() {
        let device: DeviceState = serde_json::from_value(serde_json::json!({
            "device_id": "x",
            "device_type": "hologram",
            "display_name": "X",
            "room": "lab",
            "online": true,
            "power": true,
            "last_updated": "2026-08-06T09:15:42"
        }))
        .expect("unknown type must not fail decode");
        assert_eq!(device.device_type, DeviceType::Unknown);
        assert_eq!(device.priority_tier, PriorityTier::Medium);
    }

    #[test]
    fn test_threat_level_ordering() {
        assert!(ThreatLevel::Critical > ThreatLevel::High);
        assert!(ThreatLevel::Low > ThreatLevel::None);
        assert!(ThreatLevel::None == ThreatLevel::default());
    }

    #[test]
    fn test_all_clear_threat_is_not_alerting() {
        let assessment: ThreatAssessment = serde_json::from_value(serde_json::json!({
            "threat_level": "none",
            "threat_type": "none",
            "urgency_score": 0.0,
            "summary": "",
            "reasoning": "",
            "recommended_actions": []
        }))
        .expect("all-clear payload should decode");
        assert!(!assessment.is_alerting());
        assert!(!assessment.requires_user_permission());
    }

    #[test]
    fn test_high_threat_requires_permission() {
        let assessment = ThreatAssessment {
            threat_level: ThreatLevel::High,
            threat_type: "heat_wave".into(),
            urgency_score: 0.9,
            summary: "Heat wave inbound".into(),
            reasoning: String::new(),
            recommended_actions: vec!["pre-cool".into()],
            timestamp: None,
        };
        assert!(assessment.is_alerting());
        assert!(assessment.requires_user_permission());
    }

    #[test]
    fn test_pattern_info_decodes_listing_entry() {
        let pattern: PatternInfo = serde_json::from_value(serde_json::json!({
            "pattern_id": "p-1",
            "type": "routine",
            "name": "Morning coffee",
            "description": "Brew at 6am",
            "frequency": 5,
            "confidence": 0.91,
            "approved": false,
            "ready_to_suggest": true,
            "actions": [{"device_id": "coffee", "action": "brew", "parameters": {"strength": "strong"}, "delay_seconds": 0.0}],
            "trigger_conditions": {"time": "06:00"},
            "source_utterance": "",
            "last_occurrence": "2026-08-05T06:01:00",
            "created_at": "2026-07-30T06:00:00"
        }))
        .expect("pattern entry should decode");
        assert_eq!(pattern.pattern_type, PatternType::Routine);
        assert_eq!(pattern.actions.len(), 1);
        assert!(pattern.ready_to_suggest);
    }
}
