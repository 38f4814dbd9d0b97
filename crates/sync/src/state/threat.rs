//! The threat assessment singleton.

use std::sync::RwLock;

use haven_protocol::{ThreatAssessment, ThreatLevel};

use super::{read_lock, write_lock};

/// Latest threat assessment, replaced wholesale per event. A level of
/// `none` - or no assessment at all - is the all-clear state and must
/// suppress any alert-styled rendering downstream.
#[derive(Default)]
pub struct ThreatWatch {
    current: RwLock<Option<ThreatAssessment>>,
}

impl ThreatWatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, assessment: ThreatAssessment) {
        *write_lock(&self.current) = Some(assessment);
    }

    pub fn clear(&self) {
        *write_lock(&self.current) = None;
    }

    pub fn current(&self) -> Option<ThreatAssessment> {
        read_lock(&self.current).clone()
    }

    /// The one question alerting UI asks.
    pub fn is_alerting(&self) -> bool {
        read_lock(&self.current)
            .as_ref()
            .is_some_and(ThreatAssessment::is_alerting)
    }

    pub fn level(&self) -> ThreatLevel {
        read_lock(&self.current)
            .as_ref()
            .map(|a| a.threat_level)
            .unwrap_or_default()
    }
}
