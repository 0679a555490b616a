//! Security commands: what the mediator asks colleagues to do.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hazard::AlarmType;

/// Role of a colleague registered with the mediator.
///
/// Several colleagues of the same kind may coexist (e.g. one light
/// colleague per floor); commands fan out to all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColleagueKind {
    Alarm,
    Light,
    Camera,
    Detector,
    EmergencyService,
}

impl ColleagueKind {
    /// Type name reported by `identify()`.
    #[must_use]
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Alarm => "AlarmColleague",
            Self::Light => "LightColleague",
            Self::Camera => "CameraColleague",
            Self::Detector => "DetectorColleague",
            Self::EmergencyService => "EmergencyServiceColleague",
        }
    }
}

impl fmt::Display for ColleagueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A command issued by the mediator to colleagues of one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityCommand {
    /// Arm the alarm and trigger the siren with the given type.
    ActivateAlarm(AlarmType),
    /// Disarm with the service code and silence the siren.
    DeactivateAlarm,
    /// Silence the siren; the alarm stays triggered.
    SilenceAlarm,
    /// Disarm with a user-supplied code.
    Disarm { code: String },
    TurnOnLights,
    TurnOffLights,
    StartBlinking,
    /// Toggle every light once.
    BlinkOnce,
    /// Stop blinking and restore steady light.
    StopBlinking,
    StartRecording,
    StopRecording,
    CallPolice,
    CallFireStation,
    CallAmbulance,
}

impl SecurityCommand {
    /// Kind of colleague this command is addressed to.
    #[must_use]
    pub fn target(&self) -> ColleagueKind {
        match self {
            Self::ActivateAlarm(_)
            | Self::DeactivateAlarm
            | Self::SilenceAlarm
            | Self::Disarm { .. } => ColleagueKind::Alarm,
            Self::TurnOnLights
            | Self::TurnOffLights
            | Self::StartBlinking
            | Self::BlinkOnce
            | Self::StopBlinking => ColleagueKind::Light,
            Self::StartRecording | Self::StopRecording => ColleagueKind::Camera,
            Self::CallPolice | Self::CallFireStation | Self::CallAmbulance => {
                ColleagueKind::EmergencyService
            }
        }
    }
}

impl fmt::Display for SecurityCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ActivateAlarm(kind) => write!(f, "ACTIVATE_ALARM({kind})"),
            Self::DeactivateAlarm => f.write_str("DEACTIVATE_ALARM"),
            Self::SilenceAlarm => f.write_str("SILENCE_ALARM"),
            // never echo the code
            Self::Disarm { .. } => f.write_str("DISARM"),
            Self::TurnOnLights => f.write_str("TURN_ON_LIGHTS"),
            Self::TurnOffLights => f.write_str("TURN_OFF_LIGHTS"),
            Self::StartBlinking => f.write_str("START_BLINKING"),
            Self::BlinkOnce => f.write_str("BLINK_ONCE"),
            Self::StopBlinking => f.write_str("STOP_BLINKING"),
            Self::StartRecording => f.write_str("START_RECORDING"),
            Self::StopRecording => f.write_str("STOP_RECORDING"),
            Self::CallPolice => f.write_str("CALL_POLICE"),
            Self::CallFireStation => f.write_str("CALL_FIRE_STATION"),
            Self::CallAmbulance => f.write_str("CALL_AMBULANCE"),
        }
    }
}
