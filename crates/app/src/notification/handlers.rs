//! Concrete notification handlers.
//!
//! Every side effect is simulated through the activity log; only the
//! console handler writes to stdout.

use std::sync::Arc;

use homeguard_domain::severity::NotificationSeverity;

use super::ChainHandler;
use crate::ports::ActivityLog;

pub const DEFAULT_SMS_PHONE: &str = "+15555550100";
pub const DEFAULT_ALARM_DURATION_SECS: u32 = 5;

/// Writes every event to the activity log.
pub struct LogHandler {
    log: Arc<dyn ActivityLog>,
}

impl LogHandler {
    pub fn new(log: Arc<dyn ActivityLog>) -> Self {
        Self { log }
    }
}

impl ChainHandler for LogHandler {
    fn name(&self) -> &'static str {
        "LogHandler"
    }

    fn severity_floor(&self) -> NotificationSeverity {
        NotificationSeverity::Debug
    }

    fn handle(&self, event: &str, message: &str) {
        self.log.log(
            NotificationSeverity::Info,
            &format!("[Notification] {event}: {message}"),
        );
    }
}

/// Prints the event to stdout.
pub struct ConsoleHandler;

impl ChainHandler for ConsoleHandler {
    fn name(&self) -> &'static str {
        "ConsoleHandler"
    }

    fn severity_floor(&self) -> NotificationSeverity {
        NotificationSeverity::Info
    }

    fn handle(&self, event: &str, message: &str) {
        println!("[NOTIFICATION] {event}: {message}");
    }
}

/// Sounds the house alarm for a while.
pub struct AlarmHandler {
    log: Arc<dyn ActivityLog>,
    duration_secs: u32,
}

impl AlarmHandler {
    pub fn new(log: Arc<dyn ActivityLog>) -> Self {
        Self {
            log,
            duration_secs: DEFAULT_ALARM_DURATION_SECS,
        }
    }

    /// Override the sounding duration. Zero is ignored.
    #[must_use]
    pub fn with_duration(mut self, secs: u32) -> Self {
        if secs > 0 {
            self.duration_secs = secs;
        }
        self
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }
}

impl ChainHandler for AlarmHandler {
    fn name(&self) -> &'static str {
        "AlarmHandler"
    }

    fn severity_floor(&self) -> NotificationSeverity {
        NotificationSeverity::Warning
    }

    fn handle(&self, event: &str, message: &str) {
        self.log.log(
            NotificationSeverity::Warning,
            &format!(
                "Alarm sounding for {}s ({event}: {message})",
                self.duration_secs
            ),
        );
    }
}

/// Sends a text message to the configured phone.
pub struct SmsHandler {
    log: Arc<dyn ActivityLog>,
    phone: String,
}

impl SmsHandler {
    pub fn new(log: Arc<dyn ActivityLog>, phone: &str) -> Self {
        Self {
            log,
            phone: phone.trim().to_string(),
        }
    }
}

impl ChainHandler for SmsHandler {
    fn name(&self) -> &'static str {
        "SmsHandler"
    }

    fn severity_floor(&self) -> NotificationSeverity {
        NotificationSeverity::Error
    }

    fn handle(&self, event: &str, message: &str) {
        let phone = if self.phone.is_empty() {
            "N/A"
        } else {
            self.phone.as_str()
        };
        self.log.log(
            NotificationSeverity::Error,
            &format!("SMS to {phone}: {event} - {message}"),
        );
    }
}

/// Sends an alert email.
pub struct EmailHandler {
    log: Arc<dyn ActivityLog>,
    address: String,
}

impl EmailHandler {
    pub fn new(log: Arc<dyn ActivityLog>, address: &str) -> Self {
        Self {
            log,
            address: address.trim().to_string(),
        }
    }
}

impl ChainHandler for EmailHandler {
    fn name(&self) -> &'static str {
        "EmailHandler"
    }

    fn severity_floor(&self) -> NotificationSeverity {
        NotificationSeverity::Error
    }

    fn handle(&self, event: &str, message: &str) {
        let to = if self.address.is_empty() {
            "N/A"
        } else {
            self.address.as_str()
        };
        self.log.log(
            NotificationSeverity::Error,
            &format!("Email to {to} [homeguard alert: {event}] {message}"),
        );
    }
}

/// Calls emergency services. Acts on critical events only.
pub struct EmergencyHandler {
    log: Arc<dyn ActivityLog>,
}

impl EmergencyHandler {
    pub fn new(log: Arc<dyn ActivityLog>) -> Self {
        Self { log }
    }
}

impl ChainHandler for EmergencyHandler {
    fn name(&self) -> &'static str {
        "EmergencyHandler"
    }

    fn severity_floor(&self) -> NotificationSeverity {
        NotificationSeverity::Critical
    }

    fn can_handle(&self, severity: NotificationSeverity) -> bool {
        severity == NotificationSeverity::Critical
    }

    fn handle(&self, event: &str, message: &str) {
        self.log.log(
            NotificationSeverity::Critical,
            &format!("Emergency services contacted: {event} - {message}"),
        );
    }
}
