//! Device vocabulary shared by the catalog and the colleagues that drive it.

use serde::{Deserialize, Serialize};

/// Category of a device in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceCategory {
    Light,
    Camera,
    SmokeDetector,
    GasDetector,
    Tv,
    Alarm,
    SoundSystem,
}

impl std::fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light => f.write_str("light"),
            Self::Camera => f.write_str("camera"),
            Self::SmokeDetector => f.write_str("smoke_detector"),
            Self::GasDetector => f.write_str("gas_detector"),
            Self::Tv => f.write_str("tv"),
            Self::Alarm => f.write_str("alarm"),
            Self::SoundSystem => f.write_str("sound_system"),
        }
    }
}

/// Arming state of an alarm panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmState {
    #[default]
    Disarmed,
    ArmedHome,
    ArmedAway,
    Triggered,
}

impl AlarmState {
    /// Whether the alarm will trigger on the next hazard.
    #[must_use]
    pub fn is_armed(self) -> bool {
        matches!(self, Self::ArmedHome | Self::ArmedAway)
    }
}
