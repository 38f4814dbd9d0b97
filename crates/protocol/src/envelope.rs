//! The wire envelope: every frame the server pushes decodes to `{type, data}`.
//!
//! The tag set is open-ended by design. The transport routes on the raw tag
//! string, so a new event type needs no envelope change - only a new handler
//! registration and a reconciliation rule on the consumer side.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Known event type tags.
///
/// There is no schema version field on the wire; this tag set is the only
/// versioning mechanism. Existing tags must stay byte-compatible, new
/// capabilities arrive as new tags.
pub mod tags {
    /// Full snapshot sent once per connection, immediately after accept.
    pub const INITIAL_STATE: &str = "initial_state";
    /// Single-device patch.
    pub const DEVICE_STATE: &str = "device_state";
    /// Whole-home energy snapshot.
    pub const ENERGY_SUMMARY: &str = "energy_summary";
    /// Latest threat assessment (level `none` means all clear).
    pub const THREAT_ASSESSMENT: &str = "threat_assessment";
    /// Spoken alert, possibly awaiting user permission.
    pub const VOICE_ALERT: &str = "voice_alert";
    /// An agent acted; agent list is stale.
    pub const AGENT_ACTION: &str = "agent_action";
    /// Pattern set changed; pattern list is stale.
    pub const PATTERN_SUGGESTION: &str = "pattern_suggestion";
    /// A scenario run started.
    pub const SCENARIO_ACTIVE: &str = "scenario_active";
    /// A temporal scenario advanced one step.
    pub const SCENARIO_STEP: &str = "scenario_step";
    /// A scenario run finished on its own.
    pub const SCENARIO_COMPLETE: &str = "scenario_complete";
    /// A scenario run was cancelled by the user.
    pub const SCENARIO_STOPPED: &str = "scenario_stopped";
    /// A simulation override changed; simulation status is stale.
    pub const SIMULATION_OVERRIDE: &str = "simulation_override";
}

/// One frame on the event stream.
///
/// `event_type` is always present and non-empty; the shape of `data` is
/// determined solely by the tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Why a frame failed to decode into an [`Envelope`].
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("malformed frame: {0}")]
    Json(#[from] serde_json::Error),
    #[error("frame has an empty type tag")]
    EmptyType,
}

impl Envelope {
    /// Build an envelope from a tag and a serializable payload.
    pub fn new(event_type: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
        }
    }

    /// Decode a UTF-8 text frame.
    ///
    /// Enforces the envelope invariant that the tag is non-empty; everything
    /// else about the payload is the registered handler's problem.
    pub fn parse(text: &str) -> Result<Self, EnvelopeError> {
        let envelope: Envelope = serde_json::from_str(text)?;
        if envelope.event_type.is_empty() {
            return Err(EnvelopeError::EmptyType);
        }
        Ok(envelope)
    }
}
