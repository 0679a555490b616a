//! Security events: the named signals colleagues report to the mediator.
//!
//! The vocabulary is fixed; the mediator holds one dispatch reaction per
//! event. Names are upper snake case on the wire (`MOTION_DETECTED`, …).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownEventError;

/// A named event routed by the security mediator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityEvent {
    MotionDetected,
    SmokeDetected,
    GasDetected,
    AlarmTriggered,
    AlarmAcknowledged,
    LightsOn,
    LightsOff,
    LightsBlink,
    CallPolice,
    CallFire,
    RecordingStart,
    RecordingStop,
}

impl SecurityEvent {
    /// Every event in the vocabulary.
    pub const ALL: [Self; 12] = [
        Self::MotionDetected,
        Self::SmokeDetected,
        Self::GasDetected,
        Self::AlarmTriggered,
        Self::AlarmAcknowledged,
        Self::LightsOn,
        Self::LightsOff,
        Self::LightsBlink,
        Self::CallPolice,
        Self::CallFire,
        Self::RecordingStart,
        Self::RecordingStop,
    ];

    /// Wire name of the event.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MotionDetected => "MOTION_DETECTED",
            Self::SmokeDetected => "SMOKE_DETECTED",
            Self::GasDetected => "GAS_DETECTED",
            Self::AlarmTriggered => "ALARM_TRIGGERED",
            Self::AlarmAcknowledged => "ALARM_ACKNOWLEDGED",
            Self::LightsOn => "LIGHTS_ON",
            Self::LightsOff => "LIGHTS_OFF",
            Self::LightsBlink => "LIGHTS_BLINK",
            Self::CallPolice => "CALL_POLICE",
            Self::CallFire => "CALL_FIRE",
            Self::RecordingStart => "RECORDING_START",
            Self::RecordingStop => "RECORDING_STOP",
        }
    }

    /// Whether this event reports a hazard that may start a sequence.
    #[must_use]
    pub fn is_hazard(self) -> bool {
        matches!(
            self,
            Self::MotionDetected | Self::SmokeDetected | Self::GasDetected
        )
    }
}

impl fmt::Display for SecurityEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecurityEvent {
    type Err = UnknownEventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| UnknownEventError {
                name: s.to_string(),
            })
    }
}
