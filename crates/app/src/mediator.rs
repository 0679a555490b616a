//! Security mediator: the hub every colleague talks through.
//!
//! The mediator owns the colleague registry, the notification chain and the
//! sequencer. Colleagues and sequence workers only ever hold a
//! [`MediatorHandle`], a weak reference that stops resolving once the last
//! [`SecurityMediator`] clone is dropped.
//!
//! Locks are never held while a colleague runs: the registry is snapshotted,
//! released, and the events each colleague returns are routed afterwards.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::sync::watch;

use homeguard_domain::command::SecurityCommand;
use homeguard_domain::error::{
    HomeGuardError, NotFoundError, SequenceError, UnknownEventError,
};
use homeguard_domain::event::SecurityEvent;
use homeguard_domain::hazard::{HazardEvent, HazardKind};
use homeguard_domain::id::ColleagueId;
use homeguard_domain::sequence::SequenceStatus;
use homeguard_domain::severity::NotificationSeverity;

use crate::colleague::Colleague;
use crate::notification::{Delivery, NotificationChain};
use crate::ports::ActivityLog;
use crate::sequencer::{SequenceDriver, SequenceSlot, SequenceTiming, Sequencer};

const SELF_NAME: &str = "SecurityMediator";

struct Inner {
    colleagues: Mutex<Vec<Arc<dyn Colleague>>>,
    chain: NotificationChain,
    log: Arc<dyn ActivityLog>,
    sequencer: Sequencer,
}

/// Coordinates colleagues, notifications and response sequences.
#[derive(Clone)]
pub struct SecurityMediator {
    inner: Arc<Inner>,
}

impl SecurityMediator {
    pub fn new(chain: NotificationChain, log: Arc<dyn ActivityLog>, timing: SequenceTiming) -> Self {
        Self {
            inner: Arc::new(Inner {
                colleagues: Mutex::new(Vec::new()),
                chain,
                log,
                sequencer: Sequencer::new(timing),
            }),
        }
    }

    /// Non-owning handle to this mediator.
    #[must_use]
    pub fn handle(&self) -> MediatorHandle {
        MediatorHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    // ── Registry ───────────────────────────────────────────────────

    /// Register a colleague.
    ///
    /// Registering the same colleague twice is a no-op. A colleague that was
    /// registered with another mediator is moved here.
    pub fn register(&self, colleague: Arc<dyn Colleague>) {
        let id = colleague.id();
        if let Some(previous) = colleague.link().handle()
            && !previous.points_to(&self.inner)
            && let Some(other) = previous.mediator()
        {
            other.forget(id);
        }

        {
            let mut colleagues = self.lock_colleagues();
            if colleagues.iter().any(|c| c.id() == id) {
                return;
            }
            colleagues.push(Arc::clone(&colleague));
        }
        colleague.link().attach(self.handle());
        tracing::debug!(colleague = colleague.identify(), %id, "colleague registered");
    }

    /// Remove a colleague and clear its back-reference.
    ///
    /// Returns `false` when it was not registered.
    pub fn unregister(&self, id: ColleagueId) -> bool {
        let Some(colleague) = self.forget(id) else {
            return false;
        };
        colleague.link().detach();
        tracing::debug!(colleague = colleague.identify(), %id, "colleague unregistered");
        true
    }

    #[must_use]
    pub fn is_registered(&self, id: ColleagueId) -> bool {
        self.lock_colleagues().iter().any(|c| c.id() == id)
    }

    #[must_use]
    pub fn colleague_count(&self) -> usize {
        self.lock_colleagues().len()
    }

    fn forget(&self, id: ColleagueId) -> Option<Arc<dyn Colleague>> {
        let mut colleagues = self.lock_colleagues();
        let index = colleagues.iter().position(|c| c.id() == id)?;
        Some(colleagues.remove(index))
    }

    fn lock_colleagues(&self) -> std::sync::MutexGuard<'_, Vec<Arc<dyn Colleague>>> {
        self.inner
            .colleagues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn sender_name(&self, id: Option<ColleagueId>) -> &'static str {
        id.and_then(|id| {
            self.lock_colleagues()
                .iter()
                .find(|c| c.id() == id)
                .map(|c| c.identify())
        })
        .unwrap_or("external")
    }

    // ── Events ─────────────────────────────────────────────────────

    /// React to an event raised by `sender`.
    #[tracing::instrument(skip(self, event), fields(event = %event))]
    pub fn notify(&self, sender: &str, event: SecurityEvent) {
        match event {
            SecurityEvent::MotionDetected => self.on_motion_detected(sender),
            SecurityEvent::SmokeDetected => self.on_smoke_detected(sender),
            SecurityEvent::GasDetected => self.on_gas_detected(sender),
            SecurityEvent::AlarmTriggered => self.on_alarm_triggered(sender),
            SecurityEvent::AlarmAcknowledged => self.on_alarm_acknowledged(sender),
            SecurityEvent::LightsOn | SecurityEvent::LightsOff => {
                self.dispatch(NotificationSeverity::Debug, event, sender);
            }
            SecurityEvent::LightsBlink
            | SecurityEvent::RecordingStart
            | SecurityEvent::RecordingStop => {
                self.dispatch(NotificationSeverity::Info, event, sender);
            }
            SecurityEvent::CallPolice | SecurityEvent::CallFire => {
                self.dispatch(NotificationSeverity::Critical, event, sender);
            }
        }
    }

    /// [`notify`](Self::notify) by wire name.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownEventError`] for names outside the event vocabulary;
    /// the event is logged and ignored.
    pub fn notify_named(&self, sender: &str, name: &str) -> Result<(), UnknownEventError> {
        match name.parse::<SecurityEvent>() {
            Ok(event) => {
                self.notify(sender, event);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(sender, name, "ignoring unknown event");
                self.inner.log.log(
                    NotificationSeverity::Warning,
                    &format!("Unknown event {name} from {sender} ignored"),
                );
                Err(err)
            }
        }
    }

    /// Entry point for hazards sensed by colleagues.
    pub fn report_hazard(&self, hazard: HazardEvent) {
        let sender = self.sender_name(hazard.source_id);
        match hazard.kind.event() {
            Some(event) => self.notify(sender, event),
            None => {
                let message = format!("{} reported by {sender}", hazard.kind);
                self.inner.log.log(NotificationSeverity::Error, &message);
                self.inner
                    .chain
                    .dispatch(NotificationSeverity::Error, "SYSTEM_ERROR", &message);
            }
        }
    }

    fn dispatch(&self, severity: NotificationSeverity, event: SecurityEvent, sender: &str) -> Delivery {
        self.inner
            .chain
            .dispatch(severity, event.as_str(), &format!("raised by {sender}"))
    }

    fn on_motion_detected(&self, sender: &str) {
        self.on_hazard(
            HazardKind::Motion,
            NotificationSeverity::Warning,
            &format!("Motion detected by {sender}"),
        );
    }

    fn on_smoke_detected(&self, sender: &str) {
        self.on_hazard(
            HazardKind::Smoke,
            NotificationSeverity::Critical,
            &format!("Smoke detected by {sender}"),
        );
    }

    fn on_gas_detected(&self, sender: &str) {
        self.on_hazard(
            HazardKind::Gas,
            NotificationSeverity::Critical,
            &format!("Gas leak detected by {sender}"),
        );
    }

    /// Claim the sequence slot first; a dropped hazard only leaves the Info
    /// line behind.
    fn on_hazard(&self, hazard: HazardKind, severity: NotificationSeverity, message: &str) {
        let claim = match self.inner.sequencer.claim(hazard) {
            Ok(claim) => claim,
            Err(SequenceError::Busy { active }) => {
                tracing::info!(%hazard, %active, "sequence already active, hazard dropped");
                self.inner.log.log(
                    NotificationSeverity::Info,
                    &format!("Ignoring {hazard} hazard: {active} sequence already active"),
                );
                return;
            }
            Err(err) => {
                tracing::warn!(%hazard, error = %err, "no response sequence");
                return;
            }
        };

        self.inner.log.log(severity, message);
        if let Some(event) = hazard.event() {
            self.inner.chain.dispatch(severity, event.as_str(), message);
        }
        let generation = claim.launch(Arc::new(self.handle()));
        tracing::debug!(%hazard, generation, "response sequence started");
    }

    fn on_alarm_triggered(&self, sender: &str) {
        let message = format!("Alarm triggered by {sender}");
        self.inner.log.log(NotificationSeverity::Warning, &message);
        self.inner
            .chain
            .dispatch(NotificationSeverity::Warning, "ALARM_TRIGGERED", &message);
    }

    fn on_alarm_acknowledged(&self, sender: &str) {
        let message = format!("Alarm acknowledged via {sender}");
        self.inner.log.log(NotificationSeverity::Info, &message);
        self.inner
            .chain
            .dispatch(NotificationSeverity::Info, "ALARM_ACKNOWLEDGED", &message);
        self.inner.sequencer.acknowledge();
    }

    // ── Commands ───────────────────────────────────────────────────

    /// Send `command` to every colleague of its target kind.
    ///
    /// Returns how many colleagues received it. Failures are logged and do
    /// not stop the remaining colleagues.
    #[tracing::instrument(skip(self, command), fields(command = %command))]
    pub fn command(&self, command: SecurityCommand) -> usize {
        self.fan_out(&command).0
    }

    fn fan_out(&self, command: &SecurityCommand) -> (usize, Vec<HomeGuardError>) {
        let target = command.target();
        let recipients: Vec<Arc<dyn Colleague>> = self
            .lock_colleagues()
            .iter()
            .filter(|c| c.kind() == target)
            .cloned()
            .collect();

        if recipients.is_empty() {
            let err = NotFoundError {
                entity: "Colleague",
                id: target.type_name().to_string(),
            };
            tracing::warn!(%command, "{err}, step skipped");
            self.inner.log.log(
                NotificationSeverity::Warning,
                &format!("No {} registered, {command} skipped", target.type_name()),
            );
            return (0, vec![err.into()]);
        }

        let mut failures = Vec::new();
        for colleague in &recipients {
            match colleague.receive(command) {
                Ok(events) => {
                    for event in events {
                        self.notify(colleague.identify(), event);
                    }
                }
                Err(err) => {
                    tracing::warn!(colleague = colleague.identify(), error = ?err, "colleague failed, continuing");
                    let detail = match std::error::Error::source(&err) {
                        Some(source) => format!("{err}: {source}"),
                        None => err.to_string(),
                    };
                    self.inner.log.log(
                        NotificationSeverity::Warning,
                        &format!("{} failed on {command}: {detail}", colleague.identify()),
                    );
                    failures.push(err);
                }
            }
        }
        (recipients.len(), failures)
    }

    // ── Operator API ───────────────────────────────────────────────

    pub fn handle_motion_detected(&self) {
        self.notify(SELF_NAME, SecurityEvent::MotionDetected);
    }

    pub fn handle_smoke_detected(&self) {
        self.notify(SELF_NAME, SecurityEvent::SmokeDetected);
    }

    pub fn handle_gas_detected(&self) {
        self.notify(SELF_NAME, SecurityEvent::GasDetected);
    }

    /// Acknowledge the active sequence. Returns `false` when idle.
    pub fn acknowledge_alarm(&self) -> bool {
        let acknowledged = self.inner.sequencer.acknowledge();
        if acknowledged {
            self.inner
                .log
                .log(NotificationSeverity::Info, "Alarm acknowledged by operator");
        }
        acknowledged
    }

    /// Disarm the alarm with a user code.
    ///
    /// A correct code disarms the panel, which acknowledges the active
    /// sequence.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::InvalidCredential`](homeguard_domain::error::DeviceError)
    /// for a wrong code (the alarm stays triggered) and [`NotFoundError`]
    /// when no alarm colleague is registered.
    #[tracing::instrument(skip_all)]
    pub fn disarm_alarm(&self, code: &str) -> Result<(), HomeGuardError> {
        let command = SecurityCommand::Disarm {
            code: code.to_string(),
        };
        let (_, failures) = self.fan_out(&command);
        match failures.into_iter().next() {
            None => Ok(()),
            Some(err) => {
                self.inner.log.log(
                    NotificationSeverity::Warning,
                    "Disarm attempt rejected",
                );
                Err(err)
            }
        }
    }

    #[must_use]
    pub fn is_sequence_active(&self) -> bool {
        self.inner.sequencer.is_active()
    }

    pub fn reset_sequence(&self) {
        self.inner.sequencer.reset();
        self.inner
            .log
            .log(NotificationSeverity::Info, "Response sequence reset");
    }

    #[must_use]
    pub fn sequence_status(&self) -> SequenceStatus {
        self.inner.sequencer.status()
    }

    #[must_use]
    pub fn subscribe_sequence(&self) -> watch::Receiver<SequenceSlot> {
        self.inner.sequencer.subscribe()
    }

    /// Resolve once no sequence is active.
    pub async fn wait_for_idle(&self) {
        self.inner.sequencer.wait_idle().await;
    }
}

impl fmt::Debug for SecurityMediator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityMediator")
            .field("colleagues", &self.colleague_count())
            .field("chain", &self.inner.chain)
            .field("sequence", &self.sequence_status())
            .finish()
    }
}

/// Weak reference to a [`SecurityMediator`].
#[derive(Clone)]
pub struct MediatorHandle {
    inner: Weak<Inner>,
}

impl MediatorHandle {
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// The mediator, if it still exists.
    #[must_use]
    pub fn mediator(&self) -> Option<SecurityMediator> {
        self.inner.upgrade().map(|inner| SecurityMediator { inner })
    }

    pub fn report_hazard(&self, hazard: HazardEvent) {
        match self.mediator() {
            Some(mediator) => mediator.report_hazard(hazard),
            None => tracing::warn!(kind = %hazard.kind, "mediator gone, hazard dropped"),
        }
    }

    fn points_to(&self, inner: &Arc<Inner>) -> bool {
        std::ptr::eq(self.inner.as_ptr(), Arc::as_ptr(inner))
    }
}

impl fmt::Debug for MediatorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediatorHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

impl SequenceDriver for MediatorHandle {
    fn command(&self, command: SecurityCommand) -> usize {
        match self.mediator() {
            Some(mediator) => mediator.command(command),
            None => {
                tracing::warn!(%command, "mediator gone, step skipped");
                0
            }
        }
    }

    fn announce(&self, severity: NotificationSeverity, event: &str, message: &str) {
        if let Some(mediator) = self.mediator() {
            mediator.inner.chain.dispatch(severity, event, message);
        }
    }
}
