use std::sync::Arc;

use homeguard_domain::command::{ColleagueKind, SecurityCommand};
use homeguard_domain::error::HomeGuardError;
use homeguard_domain::event::SecurityEvent;
use homeguard_domain::hazard::HazardKind;
use homeguard_domain::id::ColleagueId;

use super::{Colleague, ColleagueLink};
use crate::ports::DetectorDevice;

/// Reports smoke and gas. Detectors take no commands.
pub struct DetectorColleague {
    id: ColleagueId,
    link: ColleagueLink,
    detectors: Vec<Arc<dyn DetectorDevice>>,
}

impl DetectorColleague {
    pub fn new(detectors: Vec<Arc<dyn DetectorDevice>>) -> Self {
        Self {
            id: ColleagueId::new(),
            link: ColleagueLink::new(),
            detectors,
        }
    }

    pub fn report_smoke(&self) -> bool {
        self.link.report_hazard(HazardKind::Smoke, self.id)
    }

    pub fn report_gas(&self) -> bool {
        self.link.report_hazard(HazardKind::Gas, self.id)
    }

    /// Report every triggered detector and clear its latch.
    ///
    /// Returns the number of hazards reported.
    pub fn scan(&self) -> usize {
        let mut reported = 0;
        for detector in &self.detectors {
            if !detector.is_triggered() {
                continue;
            }
            tracing::debug!(detector = detector.name(), hazard = %detector.hazard(), "detector triggered");
            if self.link.report_hazard(detector.hazard(), self.id) {
                reported += 1;
            }
            detector.reset();
        }
        reported
    }
}

impl Colleague for DetectorColleague {
    fn id(&self) -> ColleagueId {
        self.id
    }

    fn kind(&self) -> ColleagueKind {
        ColleagueKind::Detector
    }

    fn link(&self) -> &ColleagueLink {
        &self.link
    }

    fn receive(&self, _command: &SecurityCommand) -> Result<Vec<SecurityEvent>, HomeGuardError> {
        Ok(Vec::new())
    }
}
