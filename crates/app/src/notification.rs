//! Notification escalation chain.
//!
//! An ordered list of handlers, each with a severity floor. Every handler is
//! offered every event and decides on its own whether to act; the chain
//! never stops early. Handlers are kept in ascending floor order so an event
//! is always logged even when it also escalates to an emergency call.

pub mod handlers;

use std::sync::Arc;

use homeguard_domain::severity::{NotificationPreference, NotificationSeverity};

use crate::ports::ActivityLog;

pub use handlers::{
    AlarmHandler, ConsoleHandler, EmailHandler, EmergencyHandler, LogHandler, SmsHandler,
};

/// A link in the notification chain.
pub trait ChainHandler: Send + Sync {
    /// Stable handler name (`"LogHandler"`, …).
    fn name(&self) -> &'static str;

    /// Minimum severity this handler acts on.
    fn severity_floor(&self) -> NotificationSeverity;

    fn can_handle(&self, severity: NotificationSeverity) -> bool {
        severity >= self.severity_floor()
    }

    /// Perform the side effect. Only called when [`can_handle`](Self::can_handle)
    /// returned `true`.
    fn handle(&self, event: &str, message: &str);
}

/// Which handlers acted on a dispatched event, in chain order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub severity: NotificationSeverity,
    pub acted: Vec<&'static str>,
}

impl Delivery {
    #[must_use]
    pub fn acted_on(&self, handler: &str) -> bool {
        self.acted.contains(&handler)
    }
}

/// Ordered chain of notification handlers.
#[derive(Default)]
pub struct NotificationChain {
    handlers: Vec<Box<dyn ChainHandler>>,
}

impl NotificationChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler at the end of the chain.
    #[must_use]
    pub fn with(mut self, handler: impl ChainHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Offer the event to every handler in order.
    pub fn dispatch(&self, severity: NotificationSeverity, event: &str, message: &str) -> Delivery {
        let mut acted = Vec::new();
        for handler in &self.handlers {
            if handler.can_handle(severity) {
                handler.handle(event, message);
                acted.push(handler.name());
            }
        }
        Delivery { severity, acted }
    }

    /// Handler names in chain order.
    #[must_use]
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for NotificationChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationChain")
            .field("handlers", &self.handler_names())
            .finish()
    }
}

/// Which handler kinds a configured chain contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
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

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            log: true,
            console: true,
            alarm: true,
            sms: true,
            email: false,
            emergency: true,
            sms_phone: handlers::DEFAULT_SMS_PHONE.to_string(),
            email_address: String::new(),
            alarm_duration_secs: handlers::DEFAULT_ALARM_DURATION_SECS,
        }
    }
}

/// Builds notification chains in ascending severity-floor order.
pub struct NotificationChainBuilder {
    log: Arc<dyn ActivityLog>,
}

impl NotificationChainBuilder {
    pub fn new(log: Arc<dyn ActivityLog>) -> Self {
        Self { log }
    }

    /// log → console → alarm → SMS → emergency.
    #[must_use]
    pub fn default_chain(&self) -> NotificationChain {
        NotificationChain::new()
            .with(LogHandler::new(self.log.clone()))
            .with(ConsoleHandler)
            .with(AlarmHandler::new(self.log.clone()))
            .with(SmsHandler::new(self.log.clone(), handlers::DEFAULT_SMS_PHONE))
            .with(EmergencyHandler::new(self.log.clone()))
    }

    /// Chain containing the enabled handler kinds.
    ///
    /// Falls back to a single log handler when everything is disabled, so
    /// events are never silently lost.
    #[must_use]
    pub fn from_config(&self, config: &ChainConfig) -> NotificationChain {
        let mut chain = NotificationChain::new();
        if config.log {
            chain = chain.with(LogHandler::new(self.log.clone()));
        }
        if config.console {
            chain = chain.with(ConsoleHandler);
        }
        if config.alarm {
            chain = chain.with(
                AlarmHandler::new(self.log.clone()).with_duration(config.alarm_duration_secs),
            );
        }
        if config.sms {
            chain = chain.with(SmsHandler::new(self.log.clone(), &config.sms_phone));
        }
        if config.email {
            chain = chain.with(EmailHandler::new(self.log.clone(), &config.email_address));
        }
        if config.emergency {
            chain = chain.with(EmergencyHandler::new(self.log.clone()));
        }
        if chain.is_empty() {
            chain = chain.with(LogHandler::new(self.log.clone()));
        }
        chain
    }

    /// log → console.
    #[must_use]
    pub fn simple_chain(&self) -> NotificationChain {
        NotificationChain::new()
            .with(LogHandler::new(self.log.clone()))
            .with(ConsoleHandler)
    }

    /// Chain derived from a coarse user preference.
    #[must_use]
    pub fn from_preference(&self, preference: NotificationPreference) -> NotificationChain {
        let chain = NotificationChain::new().with(LogHandler::new(self.log.clone()));
        match preference {
            NotificationPreference::Log => chain,
            NotificationPreference::Alarm => chain.with(AlarmHandler::new(self.log.clone())),
            NotificationPreference::Sms => chain.with(SmsHandler::new(
                self.log.clone(),
                handlers::DEFAULT_SMS_PHONE,
            )),
        }
    }
}
