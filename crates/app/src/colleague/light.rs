use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use homeguard_domain::command::{ColleagueKind, SecurityCommand};
use homeguard_domain::error::{DeviceError, HomeGuardError};
use homeguard_domain::event::SecurityEvent;
use homeguard_domain::id::ColleagueId;

use super::{Colleague, ColleagueLink};
use crate::ports::Device;

/// Drives every light in the home as one group.
pub struct LightColleague {
    id: ColleagueId,
    link: ColleagueLink,
    lights: Vec<Arc<dyn Device>>,
    blinking: AtomicBool,
}

impl LightColleague {
    pub fn new(lights: Vec<Arc<dyn Device>>) -> Self {
        Self {
            id: ColleagueId::new(),
            link: ColleagueLink::new(),
            lights,
            blinking: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn is_blinking(&self) -> bool {
        self.blinking.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Apply `op` to every light; a failing light does not stop the rest.
    fn each(&self, op: impl Fn(&dyn Device) -> Result<(), DeviceError>) -> Result<(), DeviceError> {
        let mut first_failure = None;
        for light in &self.lights {
            if let Err(err) = op(light.as_ref()) {
                tracing::warn!(light = light.name(), error = %err, "light did not respond");
                first_failure.get_or_insert(err);
            }
        }
        first_failure.map_or(Ok(()), Err)
    }
}

impl Colleague for LightColleague {
    fn id(&self) -> ColleagueId {
        self.id
    }

    fn kind(&self) -> ColleagueKind {
        ColleagueKind::Light
    }

    fn link(&self) -> &ColleagueLink {
        &self.link
    }

    fn receive(&self, command: &SecurityCommand) -> Result<Vec<SecurityEvent>, HomeGuardError> {
        match command {
            SecurityCommand::TurnOnLights => {
                self.each(|l| l.turn_on())?;
                Ok(vec![SecurityEvent::LightsOn])
            }
            SecurityCommand::TurnOffLights => {
                self.blinking.store(false, Ordering::SeqCst);
                self.each(|l| l.turn_off())?;
                Ok(vec![SecurityEvent::LightsOff])
            }
            SecurityCommand::StartBlinking => {
                self.blinking.store(true, Ordering::SeqCst);
                Ok(vec![SecurityEvent::LightsBlink])
            }
            SecurityCommand::BlinkOnce => {
                self.each(|l| l.toggle())?;
                Ok(Vec::new())
            }
            SecurityCommand::StopBlinking => {
                self.blinking.store(false, Ordering::SeqCst);
                self.each(|l| l.turn_on())?;
                Ok(Vec::new())
            }
            _ => Ok(Vec::new()),
        }
    }
}
