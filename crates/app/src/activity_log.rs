//! In-process activity log that forwards to `tracing` and keeps the most
//! recent lines in memory.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use homeguard_domain::severity::NotificationSeverity;
use homeguard_domain::time::{Timestamp, now};

use crate::ports::ActivityLog;

/// Default number of lines kept in memory.
pub const DEFAULT_CAPACITY: usize = 1000;

/// One recorded activity line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub at: Timestamp,
    pub severity: NotificationSeverity,
    pub message: String,
}

/// Activity log backed by `tracing` with a bounded in-memory tail.
///
/// Lines below `min_severity` are neither emitted nor kept.
pub struct RecentActivityLog {
    min_severity: NotificationSeverity,
    capacity: usize,
    entries: Mutex<VecDeque<ActivityEntry>>,
}

impl Default for RecentActivityLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl RecentActivityLog {
    /// Create a log that keeps at most `capacity` lines.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            min_severity: NotificationSeverity::Debug,
            capacity: capacity.max(1),
            entries: Mutex::new(VecDeque::new()),
        }
    }

    /// Drop lines below `severity`.
    #[must_use]
    pub fn with_min_severity(mut self, severity: NotificationSeverity) -> Self {
        self.min_severity = severity;
        self
    }

    /// The `count` most recent lines, oldest first.
    #[must_use]
    pub fn recent(&self, count: usize) -> Vec<ActivityEntry> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let skip = entries.len().saturating_sub(count);
        entries.iter().skip(skip).cloned().collect()
    }

    /// Whether any kept line contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.iter().any(|e| e.message.contains(needle))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl ActivityLog for RecentActivityLog {
    fn log(&self, severity: NotificationSeverity, message: &str) {
        if severity < self.min_severity {
            return;
        }

        match severity {
            NotificationSeverity::Debug => {
                tracing::debug!(target: "homeguard::activity", "{message}");
            }
            NotificationSeverity::Info => {
                tracing::info!(target: "homeguard::activity", "{message}");
            }
            NotificationSeverity::Warning => {
                tracing::warn!(target: "homeguard::activity", "{message}");
            }
            NotificationSeverity::Error | NotificationSeverity::Critical => {
                tracing::error!(target: "homeguard::activity", %severity, "{message}");
            }
        }

        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(ActivityEntry {
            at: now(),
            severity,
            message: message.to_string(),
        });
    }
}
