//! Activity log port: fire-and-forget severity-tagged log lines.

use homeguard_domain::severity::NotificationSeverity;

/// Receives human readable activity lines (hazard hooks, notifications,
/// simulated calls).
///
/// Implementations must never block the caller: the sequencer writes to the
/// log between timed steps.
pub trait ActivityLog: Send + Sync {
    fn log(&self, severity: NotificationSeverity, message: &str);
}

impl<T: ActivityLog + ?Sized> ActivityLog for std::sync::Arc<T> {
    fn log(&self, severity: NotificationSeverity, message: &str) {
        (**self).log(severity, message);
    }
}
