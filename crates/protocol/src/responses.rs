//! REST response bodies.

use serde::{Deserialize, Serialize};

// =============================================================================
// Commands
// =============================================================================

/// Outcome of `POST /commands`.
///
/// `unclear: true` is a domain-specific "I didn't understand" answer, not a
/// hard failure: the request itself succeeded and `message` carries guidance
/// the user should see inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOutcome {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub unclear: bool,
    #[serde(default)]
    pub message: Option<String>,
    /// Orchestrator-specific result fields we pass through untyped.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CommandOutcome {
    /// Guidance text to render when the backend couldn't parse the command.
    pub fn guidance(&self) -> Option<&str> {
        if self.unclear {
            self.message.as_deref()
        } else {
            None
        }
    }
}

// =============================================================================
// Scenarios & simulation
// =============================================================================

/// Ack of `POST /simulation/scenarios/run` / `stop`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRunAck {
    pub success: bool,
    #[serde(default)]
    pub scenario: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub temporal: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One entry of `GET /simulation/scenarios`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub temporal: bool,
    #[serde(default)]
    pub total_steps: Option<u32>,
}

/// Body of `GET /simulation/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationStatus {
    pub time_multiplier: f64,
    #[serde(default)]
    pub active_scenario: Option<String>,
    /// Override category to its current value; shape varies per category.
    #[serde(default)]
    pub active_overrides: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub available_scenarios: Vec<ScenarioSummary>,
}

// =============================================================================
// Patterns
// =============================================================================

/// Ack of `POST /patterns/{id}/approve` / `dismiss`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternDecisionAck {
    pub pattern_id: String,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub dismissed: bool,
}

// =============================================================================
// Voice
// =============================================================================

/// Body of `GET /voice/pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPermissions {
    pub pending_count: u32,
}

// =============================================================================
// Auth & health
// =============================================================================

/// Ack of `POST /auth/google-token`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthAck {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One entry of `GET /events` - the backend's persisted event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemEvent {
    #[serde(default)]
    pub event_id: String,
    pub event_type: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,
    pub timestamp: chrono::NaiveDateTime,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub mqtt_connected: bool,
    #[serde(default)]
    pub devices_count: u32,
    #[serde(default)]
    pub websocket_connections: u32,
    #[serde(default)]
    pub agents: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unclear_outcome_exposes_guidance() {
        let outcome: CommandOutcome = serde_json::from_value(serde_json::json!({
            "success": false,
            "unclear": true,
            "message": "I didn't catch that. Could you try again?"
        }))
        .expect("outcome should decode");
        assert_eq!(
            outcome.guidance(),
            Some("I didn't catch that. Could you try again?")
        );
    }

    #[test]
    fn test_successful_outcome_has_no_guidance() {
        let outcome: CommandOutcome = serde_json::from_value(serde_json::json!({
            "success": true,
            "response": "Turned off 3 lights"
        }))
        .expect("outcome should decode");
        assert!(outcome.guidance().is_none());
        assert_eq!(outcome.extra["response"], serde_json::json!("Turned off 3 lights"));
    }

    #[test]
    fn test_simulation_status_decodes_with_overrides() {
        let status: SimulationStatus = serde_json::from_value(serde_json::json!({
            "time_multiplier": 1.0,
            "active_scenario": null,
            "active_overrides": {"gps_location": "away"},
            "available_scenarios": [
                {"id": "texas_heat", "name": "Texas Summer Grid Crisis",
                 "description": "6 steps", "temporal": true, "total_steps": 6}
            ]
        }))
        .expect("status should decode");
        assert!(status.active_scenario.is_none());
        assert_eq!(status.available_scenarios[0].total_steps, Some(6));
        assert_eq!(
            status.active_overrides["gps_location"],
            serde_json::json!("away")
        );
    }
}
