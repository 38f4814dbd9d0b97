//! Event payloads pushed over the WebSocket, and the typed union over them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::envelope::{tags, Envelope};
use crate::types::{AgentInfo, DeviceState, EnergySummary, RoomDevices, ThreatAssessment};

// =============================================================================
// Payloads
// =============================================================================

/// Full snapshot sent once per connection, immediately after accept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialState {
    #[serde(default)]
    pub devices: RoomDevices,
    pub energy: EnergySummary,
    #[serde(default)]
    pub agents: Vec<AgentInfo>,
}

/// A scenario run started.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioActive {
    pub scenario_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub temporal: bool,
    /// Declared step count; only temporal scenarios carry one.
    #[serde(default)]
    pub total_steps: Option<u32>,
}

/// One step of a temporal scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioStep {
    pub scenario_id: String,
    /// Zero-based, monotonically non-decreasing within one run.
    pub current_step: u32,
    pub total_steps: u32,
    /// Display timestamp ("6:15 AM"), not a wall-clock instant.
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Metrics accumulate across steps; later steps may add or overwrite
    /// keys, never clear prior keys within a run.
    #[serde(default)]
    pub metrics: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub is_last: bool,
}

/// A scenario run finished on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComplete {
    pub scenario_id: String,
}

/// An agent took an action. The payload is a notification, not a state
/// record; consumers refetch the agent list instead of merging it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentAction {
    pub agent_id: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub result: String,
}

/// Spoken alert, possibly awaiting user permission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceAlert {
    pub alert_id: String,
    pub message: String,
    #[serde(default)]
    pub audio_base64: Option<String>,
    #[serde(default)]
    pub require_permission: bool,
    /// "pending" while awaiting permission, "info" otherwise.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub dnd_suppressed: bool,
}

/// A simulation override changed (weather, grid, gps, battery, solar,
/// calendar, device failure, or a clear). Carries a discriminator plus
/// override-specific detail fields; consumers treat it as an invalidation
/// signal for the simulation status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideNotice {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub detail: serde_json::Map<String, serde_json::Value>,
}

// =============================================================================
// Typed union
// =============================================================================

/// Typed view over a received [`Envelope`].
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    InitialState(InitialState),
    DeviceState(Box<DeviceState>),
    EnergySummary(EnergySummary),
    ThreatAssessment(ThreatAssessment),
    VoiceAlert(VoiceAlert),
    AgentAction(AgentAction),
    PatternSuggestion,
    ScenarioActive(ScenarioActive),
    ScenarioStep(ScenarioStep),
    ScenarioComplete(ScenarioComplete),
    ScenarioStopped,
    SimulationOverride(OverrideNotice),
}

impl ServerEvent {
    /// Decode an envelope into a typed event.
    ///
    /// Returns `Ok(None)` for tags this client does not know - unrecognized
    /// tags are ignored, never an error.
    pub fn from_envelope(envelope: &Envelope) -> Result<Option<Self>, serde_json::Error> {
        let data = envelope.data.clone();
        let event = match envelope.event_type.as_str() {
            tags::INITIAL_STATE => Self::InitialState(serde_json::from_value(data)?),
            tags::DEVICE_STATE => Self::DeviceState(Box::new(serde_json::from_value(data)?)),
            tags::ENERGY_SUMMARY => Self::EnergySummary(serde_json::from_value(data)?),
            tags::THREAT_ASSESSMENT => Self::ThreatAssessment(serde_json::from_value(data)?),
            tags::VOICE_ALERT => Self::VoiceAlert(serde_json::from_value(data)?),
            tags::AGENT_ACTION => Self::AgentAction(serde_json::from_value(data)?),
            tags::PATTERN_SUGGESTION => Self::PatternSuggestion,
            tags::SCENARIO_ACTIVE => Self::ScenarioActive(serde_json::from_value(data)?),
            tags::SCENARIO_STEP => Self::ScenarioStep(serde_json::from_value(data)?),
            tags::SCENARIO_COMPLETE => Self::ScenarioComplete(serde_json::from_value(data)?),
            tags::SCENARIO_STOPPED => Self::ScenarioStopped,
            tags::SIMULATION_OVERRIDE => Self::SimulationOverride(serde_json::from_value(data)?),
            _ => return Ok(None),
        };
        Ok(Some(event))
    }

    /// The wire tag this event arrives under.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::InitialState(_) => tags::INITIAL_STATE,
            Self::DeviceState(_) => tags::DEVICE_STATE,
            Self::EnergySummary(_) => tags::ENERGY_SUMMARY,
            Self::ThreatAssessment(_) => tags::THREAT_ASSESSMENT,
            Self::VoiceAlert(_) => tags::VOICE_ALERT,
            Self::AgentAction(_) => tags::AGENT_ACTION,
            Self::PatternSuggestion => tags::PATTERN_SUGGESTION,
            Self::ScenarioActive(_) => tags::SCENARIO_ACTIVE,
            Self::ScenarioStep(_) => tags::SCENARIO_STEP,
            Self::ScenarioComplete(_) => tags::SCENARIO_COMPLETE,
            Self::ScenarioStopped => tags::SCENARIO_STOPPED,
            Self::SimulationOverride(_) => tags::SIMULATION_OVERRIDE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tag_is_ignored_not_an_error() {
        let envelope = Envelope::new("hologram_calibrated", serde_json::json!({"x": 1}));
        let event = ServerEvent::from_envelope(&envelope).expect("unknown tag must not error");
        assert!(event.is_none());
    }

    #[test]
    fn test_scenario_step_decodes_with_metrics() {
        let envelope = Envelope::new(
            tags::SCENARIO_STEP,
            serde_json::json!({
                "scenario_id": "texas_heat",
                "current_step": 2,
                "total_steps": 6,
                "timestamp": "10:00 AM",
                "title": "Solar Battery Charging",
                "description": "Charging from rooftop solar",
                "metrics": {"solar_production": "4.5 kW", "battery_target": "95%"},
                "is_last": false
            }),
        );
        let event = ServerEvent::from_envelope(&envelope)
            .expect("step should decode")
            .expect("tag is known");
        match event {
            ServerEvent::ScenarioStep(step) => {
                assert_eq!(step.current_step, 2);
                assert_eq!(step.metrics.len(), 2);
                assert!(!step.is_last);
            }
            other => panic!("expected scenario step, got {other:?}"),
        }
    }

    #[test]
    fn test_payloadless_tags_decode_from_empty_objects() {
        let suggestion = Envelope::new(tags::PATTERN_SUGGESTION, serde_json::json!({}));
        let stopped = Envelope::new(tags::SCENARIO_STOPPED, serde_json::json!({}));
        assert_eq!(
            ServerEvent::from_envelope(&suggestion).expect("decode"),
            Some(ServerEvent::PatternSuggestion)
        );
        assert_eq!(
            ServerEvent::from_envelope(&stopped).expect("decode"),
            Some(ServerEvent::ScenarioStopped)
        );
    }

    #[test]
    fn test_malformed_payload_for_known_tag_is_an_error() {
        let envelope = Envelope::new(tags::DEVICE_STATE, serde_json::json!({"nope": true}));
        assert!(ServerEvent::from_envelope(&envelope).is_err());
    }

    #[test]
    fn test_override_notice_keeps_detail_fields() {
        let envelope = Envelope::new(
            tags::SIMULATION_OVERRIDE,
            serde_json::json!({"type": "battery", "level": 42.0}),
        );
        let event = ServerEvent::from_envelope(&envelope)
            .expect("decode")
            .expect("tag is known");
        match event {
            ServerEvent::SimulationOverride(notice) => {
                assert_eq!(notice.kind, "battery");
                assert_eq!(notice.detail["level"], serde_json::json!(42.0));
            }
            other => panic!("expected override notice, got {other:?}"),
        }
    }
}
