use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use homeguard_domain::command::{ColleagueKind, SecurityCommand};
use homeguard_domain::error::HomeGuardError;
use homeguard_domain::event::SecurityEvent;
use homeguard_domain::id::ColleagueId;
use homeguard_domain::severity::NotificationSeverity;
use homeguard_domain::time::{Timestamp, now};

use super::{Colleague, ColleagueLink};
use crate::ports::ActivityLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmergencyService {
    Police,
    FireStation,
    Ambulance,
}

impl fmt::Display for EmergencyService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Police => f.write_str("police"),
            Self::FireStation => f.write_str("fire station"),
            Self::Ambulance => f.write_str("ambulance"),
        }
    }
}

/// Phone numbers dialled for each service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmergencyNumbers {
    pub police: String,
    pub fire_station: String,
    pub ambulance: String,
}

impl Default for EmergencyNumbers {
    fn default() -> Self {
        Self {
            police: "911".to_string(),
            fire_station: "911".to_string(),
            ambulance: "911".to_string(),
        }
    }
}

/// One placed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCall {
    pub service: EmergencyService,
    pub number: String,
    pub at: Timestamp,
}

/// Places (simulated) calls to emergency services.
pub struct EmergencyServiceColleague {
    id: ColleagueId,
    link: ColleagueLink,
    numbers: EmergencyNumbers,
    log: Arc<dyn ActivityLog>,
    calls: Mutex<Vec<ServiceCall>>,
}

impl EmergencyServiceColleague {
    pub fn new(log: Arc<dyn ActivityLog>) -> Self {
        Self::with_numbers(log, EmergencyNumbers::default())
    }

    pub fn with_numbers(log: Arc<dyn ActivityLog>, numbers: EmergencyNumbers) -> Self {
        Self {
            id: ColleagueId::new(),
            link: ColleagueLink::new(),
            numbers,
            log,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call placed so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn place_call(&self, service: EmergencyService) {
        let number = match service {
            EmergencyService::Police => &self.numbers.police,
            EmergencyService::FireStation => &self.numbers.fire_station,
            EmergencyService::Ambulance => &self.numbers.ambulance,
        };
        self.log.log(
            NotificationSeverity::Critical,
            &format!("Calling {service} at {number}"),
        );
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ServiceCall {
                service,
                number: number.clone(),
                at: now(),
            });
    }
}

impl Colleague for EmergencyServiceColleague {
    fn id(&self) -> ColleagueId {
        self.id
    }

    fn kind(&self) -> ColleagueKind {
        ColleagueKind::EmergencyService
    }

    fn link(&self) -> &ColleagueLink {
        &self.link
    }

    fn receive(&self, command: &SecurityCommand) -> Result<Vec<SecurityEvent>, HomeGuardError> {
        match command {
            SecurityCommand::CallPolice => {
                self.place_call(EmergencyService::Police);
                Ok(vec![SecurityEvent::CallPolice])
            }
            SecurityCommand::CallFireStation => {
                self.place_call(EmergencyService::FireStation);
                Ok(vec![SecurityEvent::CallFire])
            }
            SecurityCommand::CallAmbulance => {
                self.place_call(EmergencyService::Ambulance);
                Ok(Vec::new())
            }
            _ => Ok(Vec::new()),
        }
    }
}
