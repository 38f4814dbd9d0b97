//! The scenario timeline accumulator.
//!
//! Tracks the active scenario run, its current step, and the metrics that
//! accumulate across steps. Completion keeps the final state readable for a
//! grace window before clearing; an explicit stop clears immediately. Run
//! identity (a monotonically increasing counter) makes the deferred clear
//! safe: a clear scheduled for run N is a no-op once run N+1 has started.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use haven_protocol::{ScenarioActive, ScenarioStep};

use super::{read_lock, write_lock};

/// How long a completed scenario's final step and metrics stay visible
/// before clearing. Deliberate "let the user read the result" delay.
pub const COMPLETION_GRACE: Duration = Duration::from_secs(25);

#[derive(Default)]
struct Inner {
    scenario: Option<ScenarioActive>,
    step: Option<ScenarioStep>,
    metrics: HashMap<String, serde_json::Value>,
    metrics_ready: bool,
    run: u64,
}

impl Inner {
    fn clear(&mut self) {
        self.scenario = None;
        self.step = None;
        self.metrics.clear();
        self.metrics_ready = false;
    }
}

/// Render-ready snapshot of the timeline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimelineView {
    pub scenario: Option<ScenarioActive>,
    pub step: Option<ScenarioStep>,
    pub metrics: HashMap<String, serde_json::Value>,
    pub metrics_ready: bool,
}

/// Scenario/timeline reconciler.
#[derive(Default)]
pub struct ScenarioTimeline {
    inner: RwLock<Inner>,
}

impl ScenarioTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// A run started: reset step and metrics, record the scenario identity.
    pub fn on_active(&self, scenario: ScenarioActive) {
        let mut inner = write_lock(&self.inner);
        inner.clear();
        inner.scenario = Some(scenario);
        inner.run += 1;
    }

    /// A step arrived: set the current step record and union its metrics
    /// into the accumulator (later wins per key; keys are never dropped
    /// within a run). Steps are monotonically non-decreasing within a run;
    /// a lower index than the current one is stale and ignored.
    pub fn on_step(&self, step: ScenarioStep) {
        let mut inner = write_lock(&self.inner);
        if let Some(current) = &inner.step {
            if step.current_step < current.current_step {
                return;
            }
        }
        if step.is_last {
            inner.metrics_ready = true;
        }
        inner
            .metrics
            .extend(step.metrics.iter().map(|(k, v)| (k.clone(), v.clone())));
        inner.step = Some(step);
    }

    /// The run finished on its own. State stays readable; the caller
    /// schedules [`clear_if_run`](Self::clear_if_run) with the returned run
    /// id after [`COMPLETION_GRACE`].
    pub fn on_complete(&self) -> u64 {
        read_lock(&self.inner).run
    }

    /// The run was cancelled: clear immediately, no grace window.
    pub fn on_stopped(&self) {
        let mut inner = write_lock(&self.inner);
        inner.clear();
        inner.run += 1;
    }

    /// Deferred clear after the grace window. Does nothing if a newer run
    /// started in the meantime.
    pub fn clear_if_run(&self, run: u64) -> bool {
        let mut inner = write_lock(&self.inner);
        if inner.run != run {
            return false;
        }
        inner.clear();
        inner.run += 1;
        true
    }

    pub fn view(&self) -> TimelineView {
        let inner = read_lock(&self.inner);
        TimelineView {
            scenario: inner.scenario.clone(),
            step: inner.step.clone(),
            metrics: inner.metrics.clone(),
            metrics_ready: inner.metrics_ready,
        }
    }

    pub fn is_running(&self) -> bool {
        read_lock(&self.inner).scenario.is_some()
    }
}
