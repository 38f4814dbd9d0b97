//! List stores for agents and patterns.
//!
//! Both lists are refreshed wholesale from REST - the corresponding events
//! are pure invalidation signals, and the fetch result is accepted as the
//! new truth. The stores themselves never see a failed fetch: the service
//! simply doesn't call `replace`, so the previous list survives untouched.

use std::sync::RwLock;

use haven_protocol::{AgentInfo, PatternInfo};

use super::{read_lock, write_lock};

/// Status of every backend agent, newest fetch wins.
#[derive(Default)]
pub struct AgentRoster {
    agents: RwLock<Vec<AgentInfo>>,
}

impl AgentRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, agents: Vec<AgentInfo>) {
        *write_lock(&self.agents) = agents;
    }

    pub fn list(&self) -> Vec<AgentInfo> {
        read_lock(&self.agents).clone()
    }

    pub fn len(&self) -> usize {
        read_lock(&self.agents).len()
    }

    pub fn is_empty(&self) -> bool {
        read_lock(&self.agents).is_empty()
    }
}

/// Detected and user-taught automation patterns, newest fetch wins.
#[derive(Default)]
pub struct PatternBoard {
    patterns: RwLock<Vec<PatternInfo>>,
}

impl PatternBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, patterns: Vec<PatternInfo>) {
        *write_lock(&self.patterns) = patterns;
    }

    pub fn list(&self) -> Vec<PatternInfo> {
        read_lock(&self.patterns).clone()
    }

    /// Patterns worth suggesting to the user right now.
    pub fn suggestions(&self) -> Vec<PatternInfo> {
        read_lock(&self.patterns)
            .iter()
            .filter(|p| p.ready_to_suggest && !p.approved)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        read_lock(&self.patterns).len()
    }

    pub fn is_empty(&self) -> bool {
        read_lock(&self.patterns).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haven_protocol::{AgentStatus, PatternType};

    fn agent(id: &str) -> AgentInfo {
        AgentInfo {
            agent_id: id.to_string(),
            display_name: id.to_string(),
            status: AgentStatus::Idle,
            last_action: None,
            last_reasoning: None,
            last_run: None,
            error: None,
        }
    }

    fn pattern(id: &str, ready: bool, approved: bool) -> PatternInfo {
        PatternInfo {
            pattern_id: id.to_string(),
            pattern_type: PatternType::Routine,
            name: id.to_string(),
            description: String::new(),
            frequency: 4,
            confidence: 0.9,
            approved,
            ready_to_suggest: ready,
            actions: Vec::new(),
            trigger_conditions: serde_json::Value::Null,
            source_utterance: String::new(),
            last_occurrence: chrono::NaiveDate::from_ymd_opt(2026, 8, 5)
                .and_then(|d| d.and_hms_opt(6, 0, 0))
                .expect("valid timestamp"),
            created_at: chrono::NaiveDate::from_ymd_opt(2026, 7, 30)
                .and_then(|d| d.and_hms_opt(6, 0, 0))
                .expect("valid timestamp"),
        }
    }

    #[test]
    fn test_replace_keeps_fetch_order() {
        let roster = AgentRoster::new();
        roster.replace(vec![agent("orchestrator"), agent("oracle"), agent("voice")]);
        let ids: Vec<_> = roster.list().into_iter().map(|a| a.agent_id).collect();
        assert_eq!(ids, ["orchestrator", "oracle", "voice"]);
    }

    #[test]
    fn test_suggestions_filter_ready_unapproved() {
        let board = PatternBoard::new();
        board.replace(vec![
            pattern("morning_coffee", true, false),
            pattern("night_lights", false, false),
            pattern("eco_thermostat", true, true),
        ]);
        let ids: Vec<_> = board
            .suggestions()
            .into_iter()
            .map(|p| p.pattern_id)
            .collect();
        assert_eq!(ids, ["morning_coffee"]);
    }
}
