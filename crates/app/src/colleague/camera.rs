use std::sync::Arc;

use homeguard_domain::command::{ColleagueKind, SecurityCommand};
use homeguard_domain::error::HomeGuardError;
use homeguard_domain::event::SecurityEvent;
use homeguard_domain::hazard::HazardKind;
use homeguard_domain::id::ColleagueId;

use super::{Colleague, ColleagueLink};
use crate::ports::CameraDevice;

/// Drives the security cameras and reports the motion they see.
pub struct CameraColleague {
    id: ColleagueId,
    link: ColleagueLink,
    cameras: Vec<Arc<dyn CameraDevice>>,
}

impl CameraColleague {
    pub fn new(cameras: Vec<Arc<dyn CameraDevice>>) -> Self {
        Self {
            id: ColleagueId::new(),
            link: ColleagueLink::new(),
            cameras,
        }
    }

    pub fn enable_motion_detection(&self, enabled: bool) {
        for camera in &self.cameras {
            camera.enable_motion_detection(enabled);
        }
    }

    /// Report motion seen by one of the cameras.
    ///
    /// Returns `false` when the hazard could not be delivered.
    pub fn report_motion(&self) -> bool {
        self.link.report_hazard(HazardKind::Motion, self.id)
    }

    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.cameras.iter().any(|c| c.is_recording())
    }
}

impl Colleague for CameraColleague {
    fn id(&self) -> ColleagueId {
        self.id
    }

    fn kind(&self) -> ColleagueKind {
        ColleagueKind::Camera
    }

    fn link(&self) -> &ColleagueLink {
        &self.link
    }

    fn receive(&self, command: &SecurityCommand) -> Result<Vec<SecurityEvent>, HomeGuardError> {
        let (start, event) = match command {
            SecurityCommand::StartRecording => (true, SecurityEvent::RecordingStart),
            SecurityCommand::StopRecording => (false, SecurityEvent::RecordingStop),
            _ => return Ok(Vec::new()),
        };

        let mut first_failure = None;
        for camera in &self.cameras {
            let result = if start {
                camera.start_recording()
            } else {
                camera.stop_recording()
            };
            if let Err(err) = result {
                tracing::warn!(camera = camera.name(), error = %err, %command, "camera did not respond");
                first_failure.get_or_insert(err);
            }
        }
        match first_failure {
            Some(err) => Err(err.into()),
            None => Ok(vec![event]),
        }
    }
}
