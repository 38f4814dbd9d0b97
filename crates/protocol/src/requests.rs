//! REST request bodies.
//!
//! Defaults mirror what the backend assumes when a field is omitted, so a
//! `Default::default()` body is always a valid request.

use serde::{Deserialize, Serialize};

// =============================================================================
// Device commands
// =============================================================================

/// Body of `POST /devices/{device_id}/command`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceCommandRequest {
    pub action: String,
    #[serde(default)]
    pub parameters: serde_json::Map<String, serde_json::Value>,
}

impl DeviceCommandRequest {
    /// A parameterless command ("off", "lock", ...).
    pub fn bare(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            parameters: serde_json::Map::new(),
        }
    }
}

// =============================================================================
// Natural-language commands
// =============================================================================

/// Body of `POST /commands` - free-text or transcribed voice input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub command: String,
    /// "text" or "voice"; voice input gets a clarity check server-side.
    #[serde(default = "default_command_source")]
    pub source: String,
}

fn default_command_source() -> String {
    "text".to_string()
}

impl CommandRequest {
    pub fn text(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            source: default_command_source(),
        }
    }

    pub fn voice(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            source: "voice".to_string(),
        }
    }
}

// =============================================================================
// Scenarios
// =============================================================================

/// Body of `POST /simulation/scenarios/run`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRequest {
    pub scenario_id: String,
}

// =============================================================================
// Simulation overrides
// =============================================================================

/// Body of `POST /simulation/gps/location`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpsOverride {
    /// home, away, arriving, leaving
    pub location: String,
}

/// Body of `POST /simulation/gps/coordinates`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpsCoordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Body of `POST /simulation/weather`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherOverride {
    pub temperature_f: f64,
    pub humidity: f64,
    pub wind_speed_mph: f64,
    pub description: String,
    #[serde(default)]
    pub alerts: Vec<String>,
    #[serde(default)]
    pub forecast_high_f: Option<f64>,
    #[serde(default)]
    pub forecast_low_f: Option<f64>,
}

impl Default for WeatherOverride {
    fn default() -> Self {
        Self {
            temperature_f: 75.0,
            humidity: 50.0,
            wind_speed_mph: 5.0,
            description: "clear".to_string(),
            alerts: Vec::new(),
            forecast_high_f: None,
            forecast_low_f: None,
        }
    }
}

/// Body of `POST /simulation/grid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridOverride {
    pub load_capacity_pct: f64,
    pub lmp_price: f64,
    pub system_load_mw: f64,
    pub operating_reserves_mw: f64,
    pub grid_alert_level: String,
}

impl Default for GridOverride {
    fn default() -> Self {
        Self {
            load_capacity_pct: 65.0,
            lmp_price: 25.0,
            system_load_mw: 45_000.0,
            operating_reserves_mw: 3_000.0,
            grid_alert_level: "normal".to_string(),
        }
    }
}

/// Body of `POST /simulation/battery`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryOverride {
    pub battery_pct: f64,
}

/// Body of `POST /simulation/solar`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarOverride {
    pub watts: f64,
}

/// Body of `POST /simulation/device-failure`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceFailure {
    pub device_id: String,
    pub offline: bool,
}

/// Body of `POST /simulation/time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeMultiplier {
    pub multiplier: f64,
}

/// Body of `POST /simulation/calendar`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarOverride {
    pub summary: String,
    pub starts_in_minutes: i64,
    pub duration_minutes: i64,
    #[serde(default)]
    pub location: String,
}

impl Default for CalendarOverride {
    fn default() -> Self {
        Self {
            summary: "Team Meeting".to_string(),
            starts_in_minutes: 7,
            duration_minutes: 30,
            location: String::new(),
        }
    }
}

// =============================================================================
// Voice
// =============================================================================

/// Body of `POST /voice/alert`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceAlertRequest {
    pub message: String,
    #[serde(default)]
    pub require_permission: bool,
}

/// Body of `POST /voice/permission` - answer to a pending permission request.
///
/// Either `approved` (plain yes/no) or `user_text` (natural language) may be
/// supplied; the backend infers approval from the text when `approved` is
/// absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PermissionResponse {
    pub alert_id: String,
    #[serde(default)]
    pub approved: Option<bool>,
    #[serde(default)]
    pub user_text: String,
}

// =============================================================================
// Auth
// =============================================================================

/// Body of `POST /auth/google-token` - hands the backend an OAuth access
/// token obtained by the consumer. The token is opaque to this client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoogleTokenRequest {
    pub access_token: String,
    #[serde(default = "default_token_expiry")]
    pub expires_in: u64,
}

fn default_token_expiry() -> u64 {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_override_defaults_match_backend() {
        let body = WeatherOverride::default();
        assert_eq!(body.temperature_f, 75.0);
        assert_eq!(body.description, "clear");
        assert!(body.forecast_high_f.is_none());
    }

    #[test]
    fn test_command_request_source_defaults_to_text() {
        let body: CommandRequest =
            serde_json::from_value(serde_json::json!({"command": "turn off the lights"}))
                .expect("body should decode");
        assert_eq!(body.source, "text");
    }

    #[test]
    fn test_bare_device_command_has_empty_parameters() {
        let body = DeviceCommandRequest::bare("off");
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json, serde_json::json!({"action": "off", "parameters": {}}));
    }
}
