//! Colleagues: device-facing participants coordinated by the mediator.
//!
//! A colleague never talks to another colleague. It receives commands from
//! the mediator and answers with the events the command caused; hazards it
//! senses on its own are reported through its [`ColleagueLink`].

pub mod alarm;
pub mod camera;
pub mod detector;
pub mod emergency;
pub mod light;

use std::sync::{Mutex, PoisonError};

use homeguard_domain::command::{ColleagueKind, SecurityCommand};
use homeguard_domain::error::HomeGuardError;
use homeguard_domain::event::SecurityEvent;
use homeguard_domain::hazard::{HazardEvent, HazardKind};
use homeguard_domain::id::ColleagueId;

use crate::mediator::MediatorHandle;

pub use alarm::AlarmColleague;
pub use camera::CameraColleague;
pub use detector::DetectorColleague;
pub use emergency::{EmergencyNumbers, EmergencyService, EmergencyServiceColleague, ServiceCall};
pub use light::LightColleague;

/// A participant the mediator can address.
pub trait Colleague: Send + Sync {
    fn id(&self) -> ColleagueId;

    fn kind(&self) -> ColleagueKind;

    /// Name used for provenance in log lines.
    fn identify(&self) -> &'static str {
        self.kind().type_name()
    }

    /// Back-reference to the mediator this colleague is registered with.
    fn link(&self) -> &ColleagueLink;

    /// Execute a command addressed to this colleague's kind.
    ///
    /// Returns the events the command raised; the mediator routes them
    /// after the call.
    ///
    /// # Errors
    ///
    /// Returns a [`HomeGuardError`] when a device refuses the command.
    fn receive(&self, command: &SecurityCommand) -> Result<Vec<SecurityEvent>, HomeGuardError>;
}

/// Optional, non-owning handle to the mediator.
#[derive(Debug, Default)]
pub struct ColleagueLink {
    handle: Mutex<Option<MediatorHandle>>,
}

impl ColleagueLink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current handle, if registered.
    #[must_use]
    pub fn handle(&self) -> Option<MediatorHandle> {
        self.handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether the colleague is registered with a live mediator.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.handle().is_some_and(|h| h.is_alive())
    }

    pub(crate) fn attach(&self, handle: MediatorHandle) {
        *self.handle.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
    }

    pub(crate) fn detach(&self) {
        *self.handle.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Report a hazard to the mediator.
    ///
    /// Returns `false` when the colleague is not registered or the mediator
    /// is gone; the hazard is dropped with a warning.
    pub fn report_hazard(&self, kind: HazardKind, source: ColleagueId) -> bool {
        match self.handle() {
            Some(handle) if handle.is_alive() => {
                handle.report_hazard(HazardEvent::new(kind, Some(source)));
                true
            }
            _ => {
                tracing::warn!(%kind, "colleague not attached to a mediator, hazard dropped");
                false
            }
        }
    }
}
