//! The synchronization service.
//!
//! Wires the transport client to the reconcilers: one handler per event
//! tag, each decoding its payload and applying exactly one reconciliation
//! rule. On top of the push path it runs fixed-interval REST polling - the
//! only mechanism that heals event gaps across reconnects - and the
//! fire-and-forget refetches behind the invalidation-style events.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use url::Url;

use haven_protocol::{
    tags, DeviceState, EnergySummary, Envelope, InitialState, ScenarioActive, ScenarioStep,
    ThreatAssessment, VoiceAlert,
};

use crate::api::{ApiClient, ApiPort};
use crate::config::{ConfigError, SyncConfig};
use crate::state::{Stores, COMPLETION_GRACE};
use crate::transport::{EventStreamClient, HandlerMap};

/// Fixed poll cadence per view. Agents change fastest; patterns slowest.
pub const AGENT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const SNAPSHOT_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const STATUS_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const PATTERN_POLL_INTERVAL: Duration = Duration::from_secs(15);

/// One app session's synchronization engine: owns the stores, the event
/// stream, and the polling tasks. Explicitly constructed and explicitly
/// owned - pass it (or its [`Stores`]) down to consumers instead of
/// reaching for a global.
pub struct SyncService {
    api: Arc<dyn ApiPort>,
    stores: Stores,
    stream: EventStreamClient,
    pollers: Mutex<Vec<JoinHandle<()>>>,
}

impl SyncService {
    /// Build a service talking to the configured backend.
    pub fn new(config: &SyncConfig, api: Arc<ApiClient>) -> Result<Self, ConfigError> {
        Ok(Self::with_api(api, config.events_url()?))
    }

    /// Build around any [`ApiPort`] implementation (dependency injection
    /// seam; also how tests substitute the REST surface).
    pub fn with_api(api: Arc<dyn ApiPort>, events_url: Url) -> Self {
        Self {
            api,
            stores: Stores::new(),
            stream: EventStreamClient::new(events_url, HandlerMap::new()),
            pollers: Mutex::new(Vec::new()),
        }
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_connected()
    }

    /// Watch connectivity transitions (Live / Disconnected indicator).
    pub fn connectivity(&self) -> tokio::sync::watch::Receiver<bool> {
        self.stream.connectivity()
    }

    /// Register handlers, open the stream, and start polling. Idempotent:
    /// calling again only swaps in a fresh handler map.
    pub fn start(&self) {
        self.stream
            .set_handlers(build_handlers(Arc::clone(&self.api), self.stores.clone()));
        self.stream.connect();

        let mut pollers = lock(&self.pollers);
        if !pollers.is_empty() {
            return;
        }
        pollers.push(tokio::spawn(poll_snapshots(
            Arc::clone(&self.api),
            self.stores.clone(),
        )));
        pollers.push(tokio::spawn(poll_agents(
            Arc::clone(&self.api),
            self.stores.clone(),
        )));
        pollers.push(tokio::spawn(poll_patterns(
            Arc::clone(&self.api),
            self.stores.clone(),
        )));
        pollers.push(tokio::spawn(poll_simulation_status(
            Arc::clone(&self.api),
            self.stores.clone(),
        )));
    }

    /// Stop polling and tear down the stream. Pending grace-window timers
    /// lose the race against their run counter and become no-ops.
    pub async fn shutdown(&self) {
        for poller in lock(&self.pollers).drain(..) {
            poller.abort();
        }
        self.stream.shutdown().await;
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// Decode an event payload, logging and dropping malformed ones. A bad
/// payload never touches state and never affects the connection.
fn decode<T: DeserializeOwned>(envelope: &Envelope) -> Option<T> {
    match serde_json::from_value(envelope.data.clone()) {
        Ok(payload) => Some(payload),
        Err(error) => {
            tracing::warn!(tag = %envelope.event_type, %error, "dropping event with malformed payload");
            None
        }
    }
}

/// One handler per tag, each applying exactly one reconciler rule. All
/// handlers run synchronously on the read task; the only work they defer is
/// the invalidation refetches, which are spawned fire-and-forget.
fn build_handlers(api: Arc<dyn ApiPort>, stores: Stores) -> HandlerMap {
    let initial = stores.clone();
    let devices = Arc::clone(&stores.devices);
    let energy = Arc::clone(&stores.energy);
    let threat = Arc::clone(&stores.threat);
    let alerts = Arc::clone(&stores.alerts);
    let active = Arc::clone(&stores.timeline);
    let step = Arc::clone(&stores.timeline);
    let complete = Arc::clone(&stores.timeline);
    let stopped = Arc::clone(&stores.timeline);
    let (agent_api, agent_stores) = (Arc::clone(&api), stores.clone());
    let (pattern_api, pattern_stores) = (Arc::clone(&api), stores.clone());
    let (override_api, override_stores) = (Arc::clone(&api), stores.clone());

    HandlerMap::new()
        .on(tags::INITIAL_STATE, move |envelope| {
            if let Some(snapshot) = decode::<InitialState>(&envelope) {
                initial.devices.apply_snapshot(snapshot.devices);
                initial.energy.replace(snapshot.energy);
                initial.agents.replace(snapshot.agents);
            }
        })
        .on(tags::DEVICE_STATE, move |envelope| {
            if let Some(device) = decode::<DeviceState>(&envelope) {
                devices.apply_device(device);
            }
        })
        .on(tags::ENERGY_SUMMARY, move |envelope| {
            if let Some(summary) = decode::<EnergySummary>(&envelope) {
                energy.replace(summary);
            }
        })
        .on(tags::THREAT_ASSESSMENT, move |envelope| {
            if let Some(assessment) = decode::<ThreatAssessment>(&envelope) {
                threat.replace(assessment);
            }
        })
        .on(tags::VOICE_ALERT, move |envelope| {
            if let Some(alert) = decode::<VoiceAlert>(&envelope) {
                alerts.push(alert);
            }
        })
        .on(tags::AGENT_ACTION, move |_| {
            let api = Arc::clone(&agent_api);
            let stores = agent_stores.clone();
            tokio::spawn(async move { refresh_agents(api.as_ref(), &stores).await });
        })
        .on(tags::PATTERN_SUGGESTION, move |_| {
            let api = Arc::clone(&pattern_api);
            let stores = pattern_stores.clone();
            tokio::spawn(async move { refresh_patterns(api.as_ref(), &stores).await });
        })
        .on(tags::SIMULATION_OVERRIDE, move |_| {
            let api = Arc::clone(&override_api);
            let stores = override_stores.clone();
            tokio::spawn(async move { refresh_simulation_status(api.as_ref(), &stores).await });
        })
        .on(tags::SCENARIO_ACTIVE, move |envelope| {
            if let Some(scenario) = decode::<ScenarioActive>(&envelope) {
                active.on_active(scenario);
            }
        })
        .on(tags::SCENARIO_STEP, move |envelope| {
            if let Some(payload) = decode::<ScenarioStep>(&envelope) {
                step.on_step(payload);
            }
        })
        .on(tags::SCENARIO_COMPLETE, move |_| {
            let run = complete.on_complete();
            let timeline = Arc::clone(&complete);
            tokio::spawn(async move {
                tokio::time::sleep(COMPLETION_GRACE).await;
                if timeline.clear_if_run(run) {
                    tracing::debug!(run, "scenario timeline cleared after grace window");
                }
            });
        })
        .on(tags::SCENARIO_STOPPED, move |_| {
            stopped.on_stopped();
        })
}

// =============================================================================
// Refetch & polling
// =============================================================================

// Every refresh applies the same rule as the push path and keeps stale data
// on failure - a transient error must never blank a populated panel.

async fn refresh_rooms(api: &dyn ApiPort, stores: &Stores) {
    match api.rooms().await {
        Ok(rooms) => stores.devices.apply_snapshot(rooms),
        Err(error) => tracing::debug!(%error, "device poll failed, keeping stale map"),
    }
}

async fn refresh_energy(api: &dyn ApiPort, stores: &Stores) {
    match api.energy().await {
        Ok(summary) => stores.energy.replace(summary),
        Err(error) => tracing::debug!(%error, "energy poll failed, keeping stale summary"),
    }
}

async fn refresh_agents(api: &dyn ApiPort, stores: &Stores) {
    match api.agents().await {
        Ok(agents) => stores.agents.replace(agents),
        Err(error) => tracing::warn!(%error, "agent refresh failed, keeping stale list"),
    }
}

async fn refresh_patterns(api: &dyn ApiPort, stores: &Stores) {
    match api.patterns().await {
        Ok(patterns) => stores.patterns.replace(patterns),
        Err(error) => tracing::warn!(%error, "pattern refresh failed, keeping stale list"),
    }
}

async fn refresh_simulation_status(api: &dyn ApiPort, stores: &Stores) {
    match api.simulation_status().await {
        Ok(status) => stores.simulation.replace(status),
        Err(error) => tracing::debug!(%error, "simulation status refresh failed, keeping stale"),
    }
}

async fn poll_snapshots(api: Arc<dyn ApiPort>, stores: Stores) {
    let mut tick = tokio::time::interval(SNAPSHOT_POLL_INTERVAL);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tick.tick().await;
        refresh_rooms(api.as_ref(), &stores).await;
        refresh_energy(api.as_ref(), &stores).await;
    }
}

async fn poll_agents(api: Arc<dyn ApiPort>, stores: Stores) {
    let mut tick = tokio::time::interval(AGENT_POLL_INTERVAL);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tick.tick().await;
        refresh_agents(api.as_ref(), &stores).await;
    }
}

async fn poll_patterns(api: Arc<dyn ApiPort>, stores: Stores) {
    let mut tick = tokio::time::interval(PATTERN_POLL_INTERVAL);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tick.tick().await;
        refresh_patterns(api.as_ref(), &stores).await;
    }
}

async fn poll_simulation_status(api: Arc<dyn ApiPort>, stores: Stores) {
    let mut tick = tokio::time::interval(STATUS_POLL_INTERVAL);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tick.tick().await;
        refresh_simulation_status(api.as_ref(), &stores).await;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, MockApiPort};
    use haven_protocol::{AgentInfo, AgentStatus, SimulationStatus};
    use serde_json::json;

    fn agent(id: &str) -> AgentInfo {
        AgentInfo {
            agent_id: id.to_string(),
            display_name: id.to_string(),
            status: AgentStatus::Running,
            last_action: None,
            last_reasoning: None,
            last_run: None,
            error: None,
        }
    }

    fn envelope(tag: &str, data: serde_json::Value) -> Envelope {
        Envelope::new(tag, data)
    }

    fn kitchen_device(power: bool) -> serde_json::Value {
        json!({
            "device_id": "kitchen_light",
            "device_type": "light",
            "display_name": "Kitchen Light",
            "room": "kitchen",
            "online": true,
            "power": power,
            "properties": {},
            "current_watts": 9.5,
            "priority_tier": "low",
            "last_updated": "2026-08-06T09:00:00"
        })
    }

    fn initial_state() -> serde_json::Value {
        json!({
            "devices": {"kitchen": [kitchen_device(false)]},
            "energy": {
                "total_consumption_watts": 420.0,
                "solar_generation_watts": 0.0,
                "battery_pct": 65.0,
                "battery_mode": "auto",
                "net_grid_watts": 420.0
            },
            "agents": [{
                "agent_id": "orchestrator",
                "display_name": "Orchestrator",
                "status": "idle",
                "last_action": null,
                "last_reasoning": null,
                "last_run": null,
                "error": null
            }]
        })
    }

    #[tokio::test]
    async fn test_initial_state_populates_stores() {
        let stores = Stores::new();
        let handlers = build_handlers(Arc::new(MockApiPort::new()), stores.clone());

        let handler = handlers.get(tags::INITIAL_STATE).expect("handler registered");
        handler(envelope(tags::INITIAL_STATE, initial_state()));

        assert_eq!(stores.devices.device_count(), 1);
        assert_eq!(stores.energy.current().expect("energy set").battery_pct, 65.0);
        assert_eq!(stores.agents.len(), 1);
        assert!(!stores.devices.device("kitchen_light").expect("present").power);
    }

    #[tokio::test]
    async fn test_device_event_patches_snapshot_state() {
        let stores = Stores::new();
        let handlers = build_handlers(Arc::new(MockApiPort::new()), stores.clone());

        handlers.get(tags::INITIAL_STATE).expect("handler")(envelope(
            tags::INITIAL_STATE,
            initial_state(),
        ));
        handlers.get(tags::DEVICE_STATE).expect("handler")(envelope(
            tags::DEVICE_STATE,
            kitchen_device(true),
        ));

        assert!(stores.devices.device("kitchen_light").expect("present").power);
    }

    #[tokio::test]
    async fn test_malformed_payload_leaves_state_untouched() {
        let stores = Stores::new();
        let handlers = build_handlers(Arc::new(MockApiPort::new()), stores.clone());

        handlers.get(tags::ENERGY_SUMMARY).expect("handler")(envelope(
            tags::ENERGY_SUMMARY,
            json!({"battery_pct": "not a number"}),
        ));

        assert!(stores.energy.current().is_none());
    }

    #[tokio::test]
    async fn test_failed_agent_refresh_keeps_stale_list() {
        let mut api = MockApiPort::new();
        api.expect_agents()
            .returning(|| Err(ApiError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE)));

        let stores = Stores::new();
        stores
            .agents
            .replace(vec![agent("orchestrator"), agent("oracle")]);

        refresh_agents(&api, &stores).await;

        let ids: Vec<_> = stores.agents.list().into_iter().map(|a| a.agent_id).collect();
        assert_eq!(ids, ["orchestrator", "oracle"]);
    }

    #[tokio::test]
    async fn test_agent_action_triggers_refetch() {
        let mut api = MockApiPort::new();
        api.expect_agents().returning(|| Ok(vec![agent("voice")]));

        let stores = Stores::new();
        let handlers = build_handlers(Arc::new(api), stores.clone());

        handlers.get(tags::AGENT_ACTION).expect("handler")(envelope(
            tags::AGENT_ACTION,
            json!({"agent_id": "voice", "action": "speak", "result": "ok"}),
        ));

        // The refetch is fire-and-forget; give the spawned task a moment.
        for _ in 0..100 {
            if !stores.agents.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        assert_eq!(stores.agents.list()[0].agent_id, "voice");
    }

    #[tokio::test]
    async fn test_override_notice_triggers_status_refetch() {
        let mut api = MockApiPort::new();
        api.expect_simulation_status().returning(|| {
            Ok(SimulationStatus {
                time_multiplier: 4.0,
                active_scenario: None,
                active_overrides: serde_json::Map::new(),
                available_scenarios: Vec::new(),
            })
        });

        let stores = Stores::new();
        let handlers = build_handlers(Arc::new(api), stores.clone());

        handlers.get(tags::SIMULATION_OVERRIDE).expect("handler")(envelope(
            tags::SIMULATION_OVERRIDE,
            json!({"type": "battery", "level": 42.0}),
        ));

        for _ in 0..100 {
            if stores.simulation.status().is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        assert_eq!(
            stores.simulation.status().expect("status fetched").time_multiplier,
            4.0
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_grace_window() {
        let stores = Stores::new();
        let handlers = build_handlers(Arc::new(MockApiPort::new()), stores.clone());

        handlers.get(tags::SCENARIO_ACTIVE).expect("handler")(envelope(
            tags::SCENARIO_ACTIVE,
            json!({
                "scenario_id": "texas_heat",
                "name": "Texas Summer Grid Crisis",
                "description": "",
                "temporal": true,
                "total_steps": 1
            }),
        ));
        handlers.get(tags::SCENARIO_STEP).expect("handler")(envelope(
            tags::SCENARIO_STEP,
            json!({
                "scenario_id": "texas_heat",
                "current_step": 0,
                "total_steps": 1,
                "timestamp": "6:00 AM",
                "title": "Threat detected",
                "description": "",
                "metrics": {"grid_capacity": "98%"},
                "is_last": true
            }),
        ));
        handlers.get(tags::SCENARIO_COMPLETE).expect("handler")(envelope(
            tags::SCENARIO_COMPLETE,
            json!({"scenario_id": "texas_heat"}),
        ));

        // Immediately after completion the result must stay readable.
        tokio::task::yield_now().await;
        assert!(stores.timeline.is_running());
        assert!(stores.timeline.view().metrics_ready);

        // Not yet: one second short of the grace window.
        tokio::time::sleep(COMPLETION_GRACE - Duration::from_secs(1)).await;
        assert!(stores.timeline.is_running());

        // Past the window the deferred clear wins.
        tokio::time::sleep(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;
        assert!(!stores.timeline.is_running());
        assert!(stores.timeline.view().metrics.is_empty());
    }

    #[tokio::test]
    async fn test_scenario_stopped_clears_immediately() {
        let stores = Stores::new();
        let handlers = build_handlers(Arc::new(MockApiPort::new()), stores.clone());

        handlers.get(tags::SCENARIO_ACTIVE).expect("handler")(envelope(
            tags::SCENARIO_ACTIVE,
            json!({"scenario_id": "texas_heat", "name": "Texas", "temporal": true}),
        ));
        handlers.get(tags::SCENARIO_STOPPED).expect("handler")(envelope(
            tags::SCENARIO_STOPPED,
            json!({}),
        ));

        assert!(!stores.timeline.is_running());
    }

    #[tokio::test]
    async fn test_all_clear_threat_suppresses_alerting() {
        let stores = Stores::new();
        let handlers = build_handlers(Arc::new(MockApiPort::new()), stores.clone());
        let handler = handlers.get(tags::THREAT_ASSESSMENT).expect("handler");

        handler(envelope(
            tags::THREAT_ASSESSMENT,
            json!({
                "threat_level": "high",
                "threat_type": "heat_wave",
                "urgency_score": 0.9,
                "summary": "Heat wave",
                "reasoning": "",
                "recommended_actions": ["pre-cool"]
            }),
        ));
        assert!(stores.threat.is_alerting());

        handler(envelope(
            tags::THREAT_ASSESSMENT,
            json!({
                "threat_level": "none",
                "threat_type": "none",
                "urgency_score": 0.0,
                "summary": "",
                "reasoning": "",
                "recommended_actions": []
            }),
        ));
        assert!(!stores.threat.is_alerting());
    }
}
