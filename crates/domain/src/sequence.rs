//! Hazard sequence state: the observable side of the escalation sequencer.

use serde::{Deserialize, Serialize};

use crate::hazard::HazardKind;

/// Step the active hazard sequence is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceState {
    #[default]
    Idle,
    Arming,
    WaitingAckPrimary,
    Escalating,
    WaitingAckEscalation,
    Resolving,
}

impl SequenceState {
    #[must_use]
    pub fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl std::fmt::Display for SequenceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Arming => f.write_str("arming"),
            Self::WaitingAckPrimary => f.write_str("waiting_ack_primary"),
            Self::Escalating => f.write_str("escalating"),
            Self::WaitingAckEscalation => f.write_str("waiting_ack_escalation"),
            Self::Resolving => f.write_str("resolving"),
        }
    }
}

/// Emergency service a sequence ended up calling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmergencyCall {
    Police,
    FireStation,
}

/// How a finished sequence ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "service")]
pub enum SequenceOutcome {
    /// Someone acknowledged the alarm before the step budget ran out.
    Acknowledged,
    /// Nobody acknowledged; the sequence called an emergency service.
    Escalated(EmergencyCall),
    /// The sequence was force-cleared by a reset.
    Reset,
}

/// Read-only snapshot of the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SequenceStatus {
    pub state: SequenceState,
    /// Hazard the active sequence responds to; `None` when idle.
    pub hazard: Option<HazardKind>,
    /// Incremented on every start and every reset.
    pub generation: u64,
    pub last_outcome: Option<SequenceOutcome>,
}

impl SequenceStatus {
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.state.is_idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_idle_and_inactive() {
        let status = SequenceStatus::default();
        assert_eq!(status.state, SequenceState::Idle);
        assert!(!status.is_active());
        assert_eq!(status.generation, 0);
    }

    #[test]
    fn should_report_active_for_any_non_idle_state() {
        let status = SequenceStatus {
            state: SequenceState::Escalating,
            hazard: Some(HazardKind::Gas),
            generation: 1,
            last_outcome: None,
        };
        assert!(status.is_active());
    }

    #[test]
    fn should_serialize_escalated_outcome_with_service() {
        let json =
            serde_json::to_value(SequenceOutcome::Escalated(EmergencyCall::FireStation)).unwrap();
        assert_eq!(json["outcome"], "escalated");
        assert_eq!(json["service"], "fire_station");
    }
}
