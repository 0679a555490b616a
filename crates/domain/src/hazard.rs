//! Hazards: what a detector or camera colleague can observe.

use serde::{Deserialize, Serialize};

use crate::event::SecurityEvent;
use crate::id::ColleagueId;
use crate::time::{Timestamp, now};

/// Category of a detected hazard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardKind {
    Motion,
    Smoke,
    Gas,
    Intrusion,
    SystemError,
}

impl HazardKind {
    /// Alarm type the siren is triggered with for this hazard.
    #[must_use]
    pub fn alarm_type(self) -> AlarmType {
        match self {
            Self::Motion | Self::Intrusion => AlarmType::Intrusion,
            Self::Smoke => AlarmType::Fire,
            Self::Gas => AlarmType::GasLeak,
            Self::SystemError => AlarmType::SystemError,
        }
    }

    /// Mediator event that announces this hazard, if it has one.
    #[must_use]
    pub fn event(self) -> Option<SecurityEvent> {
        match self {
            Self::Motion | Self::Intrusion => Some(SecurityEvent::MotionDetected),
            Self::Smoke => Some(SecurityEvent::SmokeDetected),
            Self::Gas => Some(SecurityEvent::GasDetected),
            Self::SystemError => None,
        }
    }
}

impl std::fmt::Display for HazardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Motion => f.write_str("motion"),
            Self::Smoke => f.write_str("smoke"),
            Self::Gas => f.write_str("gas"),
            Self::Intrusion => f.write_str("intrusion"),
            Self::SystemError => f.write_str("system error"),
        }
    }
}

/// Type an alarm siren is triggered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmType {
    Fire,
    GasLeak,
    Intrusion,
    SystemError,
}

impl std::fmt::Display for AlarmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fire => f.write_str("FIRE"),
            Self::GasLeak => f.write_str("GAS"),
            Self::Intrusion => f.write_str("INTRUSION"),
            Self::SystemError => f.write_str("SYSTEM"),
        }
    }
}

/// A single hazard observation.
///
/// Created by the reporting colleague (or the operator) and consumed once by
/// the sequencer. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HazardEvent {
    pub kind: HazardKind,
    /// Reporting colleague; `None` for operator-initiated signals.
    pub source_id: Option<ColleagueId>,
    pub timestamp: Timestamp,
}

impl HazardEvent {
    /// Record a hazard observed now.
    #[must_use]
    pub fn new(kind: HazardKind, source_id: Option<ColleagueId>) -> Self {
        Self {
            kind,
            source_id,
            timestamp: now(),
        }
    }
}
