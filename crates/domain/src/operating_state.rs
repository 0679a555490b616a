//! Operating state: the coarse power/performance profile of the home.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Coarse operating state of the whole system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatingState {
    #[default]
    Normal,
    HighPerformance,
    LowPower,
    Sleep,
}

impl OperatingState {
    /// Human readable name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::HighPerformance => "High Performance",
            Self::LowPower => "Low Power",
            Self::Sleep => "Sleep",
        }
    }
}

impl fmt::Display for OperatingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognised operating state name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operating state: {0}")]
pub struct ParseOperatingStateError(pub String);

impl FromStr for OperatingState {
    type Err = ParseOperatingStateError;

    /// Accepts the snake-case name or a short alias (`high`, `low`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "high" | "high_performance" => Ok(Self::HighPerformance),
            "low" | "low_power" => Ok(Self::LowPower),
            "sleep" => Ok(Self::Sleep),
            other => Err(ParseOperatingStateError(other.to_string())),
        }
    }
}
