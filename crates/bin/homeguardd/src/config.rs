//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `homeguard.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use homeguard_app::colleague::EmergencyNumbers;
use homeguard_app::notification::ChainConfig;
use homeguard_app::sequencer::SequenceTiming;
use homeguard_domain::severity::NotificationPreference;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Escalation timing.
    pub sequence: SequenceConfig,
    /// Notification chain composition.
    pub notifications: NotificationsConfig,
    /// Numbers dialled by the emergency colleague.
    pub emergency: EmergencyConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Tick length and per-step tick budgets.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// Length of one tick in milliseconds.
    pub tick_ms: u64,
    pub motion_hold_ticks: u32,
    pub primary_ack_ticks: u32,
    pub blink_ticks: u32,
}

/// Which handlers the notification chain contains.
///
/// When `preference` is set it wins over the individual toggles.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    pub preference: Option<NotificationPreference>,
    pub log: bool,
    pub console: bool,
    pub alarm: bool,
    pub sms: bool,
    pub email: bool,
    pub emergency: bool,
    pub sms_phone: String,
    pub email_address: String,
    pub alarm_duration_secs: u32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EmergencyConfig {
    pub police: String,
    pub fire_station: String,
    pub ambulance: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `homeguard.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting timing is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("homeguard.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("HOMEGUARD_TICK_MS")
            && let Ok(ms) = val.parse()
        {
            self.sequence.tick_ms = ms;
        }
        if let Some(val) = var("HOMEGUARD_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sequence.tick_ms == 0 {
            return Err(ConfigError::Validation(
                "tick_ms must be non-zero".to_string(),
            ));
        }
        let budgets = [
            ("motion_hold_ticks", self.sequence.motion_hold_ticks),
            ("primary_ack_ticks", self.sequence.primary_ack_ticks),
            ("blink_ticks", self.sequence.blink_ticks),
        ];
        if let Some((name, _)) = budgets.iter().find(|(_, ticks)| *ticks == 0) {
            return Err(ConfigError::Validation(format!("{name} must be non-zero")));
        }
        Ok(())
    }

    #[must_use]
    pub fn timing(&self) -> SequenceTiming {
        SequenceTiming {
            tick: Duration::from_millis(self.sequence.tick_ms),
            motion_hold_ticks: self.sequence.motion_hold_ticks,
            primary_ack_ticks: self.sequence.primary_ack_ticks,
            blink_ticks: self.sequence.blink_ticks,
        }
    }

    #[must_use]
    pub fn chain_config(&self) -> ChainConfig {
        let n = &self.notifications;
        ChainConfig {
            log: n.log,
            console: n.console,
            alarm: n.alarm,
            sms: n.sms,
            email: n.email,
            emergency: n.emergency,
            sms_phone: n.sms_phone.clone(),
            email_address: n.email_address.clone(),
            alarm_duration_secs: n.alarm_duration_secs,
        }
    }

    #[must_use]
    pub fn emergency_numbers(&self) -> EmergencyNumbers {
        EmergencyNumbers {
            police: self.emergency.police.clone(),
            fire_station: self.emergency.fire_station.clone(),
            ambulance: self.emergency.ambulance.clone(),
        }
    }
}

impl Default for SequenceConfig {
    fn default() -> Self {
        let timing = SequenceTiming::default();
        Self {
            tick_ms: 1000,
            motion_hold_ticks: timing.motion_hold_ticks,
            primary_ack_ticks: timing.primary_ack_ticks,
            blink_ticks: timing.blink_ticks,
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        let chain = ChainConfig::default();
        Self {
            preference: None,
            log: chain.log,
            console: chain.console,
            alarm: chain.alarm,
            sms: chain.sms,
            email: chain.email,
            emergency: chain.emergency,
            sms_phone: chain.sms_phone,
            email_address: chain.email_address,
            alarm_duration_secs: chain.alarm_duration_secs,
        }
    }
}

impl Default for EmergencyConfig {
    fn default() -> Self {
        let numbers = EmergencyNumbers::default();
        Self {
            police: numbers.police,
            fire_station: numbers.fire_station,
            ambulance: numbers.ambulance,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "homeguardd=info,homeguard_app=info,homeguard_adapter_virtual=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.sequence.tick_ms, 1000);
        assert_eq!(config.sequence.motion_hold_ticks, 5);
        assert_eq!(config.sequence.primary_ack_ticks, 10);
        assert_eq!(config.sequence.blink_ticks, 10);
        assert!(config.notifications.preference.is_none());
        assert!(!config.notifications.email);
        assert_eq!(config.emergency.police, "911");
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.timing().tick, Duration::from_secs(1));
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [sequence]
            tick_ms = 250
            motion_hold_ticks = 3
            primary_ack_ticks = 4
            blink_ticks = 6

            [notifications]
            preference = 'sms'
            email = true
            email_address = 'owner@example.com'
            sms_phone = '+15555550199'
            alarm_duration_secs = 9

            [emergency]
            police = '112'
            fire_station = '18'
            ambulance = '15'

            [logging]
            filter = 'debug'
        ";
        let config: Config = toml::from_str(toml).unwrap();

        let timing = config.timing();
        assert_eq!(timing.tick, Duration::from_millis(250));
        assert_eq!(timing.motion_hold_ticks, 3);
        assert_eq!(timing.primary_ack_ticks, 4);
        assert_eq!(timing.blink_ticks, 6);
        assert_eq!(
            config.notifications.preference,
            Some(NotificationPreference::Sms)
        );
        let chain = config.chain_config();
        assert!(chain.email);
        assert_eq!(chain.email_address, "owner@example.com");
        assert_eq!(chain.sms_phone, "+15555550199");
        assert_eq!(chain.alarm_duration_secs, 9);
        let numbers = config.emergency_numbers();
        assert_eq!(numbers.police, "112");
        assert_eq!(numbers.fire_station, "18");
        assert_eq!(numbers.ambulance, "15");
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [sequence]
            tick_ms = 10
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.sequence.tick_ms, 10);
        assert_eq!(config.sequence.blink_ticks, 10);
        assert_eq!(config.chain_config(), ChainConfig::default());
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.sequence.tick_ms, 1000);
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }

    #[test]
    fn should_reject_unknown_preference() {
        let result: Result<Config, _> = toml::from_str("[notifications]\npreference = 'pager'");
        assert!(result.is_err());
    }

    #[test]
    fn should_override_tick_from_env() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("HOMEGUARD_TICK_MS", "20")]));
        assert_eq!(config.sequence.tick_ms, 20);
    }

    #[test]
    fn should_ignore_unparsable_tick_override() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("HOMEGUARD_TICK_MS", "fast")]));
        assert_eq!(config.sequence.tick_ms, 1000);
    }

    #[test]
    fn should_prefer_rust_log_over_homeguard_log() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("HOMEGUARD_LOG", "warn"), ("RUST_LOG", "trace")]));
        assert_eq!(config.logging.filter, "trace");

        let mut config = Config::default();
        config.apply_overrides(env(&[("HOMEGUARD_LOG", "warn")]));
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn should_reject_zero_tick() {
        let mut config = Config::default();
        config.sequence.tick_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_budget_and_name_it() {
        let mut config = Config::default();
        config.sequence.blink_ticks = 0;

        let err = config.validate().unwrap_err();

        assert_eq!(
            err.to_string(),
            "invalid configuration: blink_ticks must be non-zero"
        );
    }

    #[test]
    fn should_accept_defaults() {
        assert!(Config::default().validate().is_ok());
    }
}
