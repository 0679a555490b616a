//! Virtual security camera.

use std::sync::Mutex;

use homeguard_app::ports::{CameraDevice, Device};
use homeguard_domain::device::DeviceCategory;
use homeguard_domain::error::DeviceError;
use homeguard_domain::id::DeviceId;

use super::{Fault, lock, unavailable};

#[derive(Debug)]
struct Feed {
    on: bool,
    recording: bool,
    motion_detection: bool,
}

/// A simulated camera. Starts powered, not recording.
#[derive(Debug)]
pub struct VirtualCamera {
    id: DeviceId,
    name: String,
    feed: Mutex<Feed>,
    fault: Fault,
}

impl VirtualCamera {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: DeviceId::new(),
            name: name.into(),
            feed: Mutex::new(Feed {
                on: true,
                recording: false,
                motion_detection: false,
            }),
            fault: Fault::default(),
        }
    }

    pub fn set_failed(&self, failed: bool) {
        self.fault.set(failed);
    }
}

impl Device for VirtualCamera {
    fn id(&self) -> DeviceId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> DeviceCategory {
        DeviceCategory::Camera
    }

    fn turn_on(&self) -> Result<(), DeviceError> {
        self.fault.check(&self.name)?;
        lock(&self.feed).on = true;
        Ok(())
    }

    fn turn_off(&self) -> Result<(), DeviceError> {
        self.fault.check(&self.name)?;
        let mut feed = lock(&self.feed);
        feed.on = false;
        feed.recording = false;
        Ok(())
    }

    fn is_on(&self) -> bool {
        lock(&self.feed).on
    }

    fn is_critical(&self) -> bool {
        true
    }
}

impl CameraDevice for VirtualCamera {
    fn start_recording(&self) -> Result<(), DeviceError> {
        self.fault.check(&self.name)?;
        let mut feed = lock(&self.feed);
        if !feed.on {
            return Err(unavailable(&self.name));
        }
        feed.recording = true;
        tracing::debug!(camera = %self.name, "recording started");
        Ok(())
    }

    fn stop_recording(&self) -> Result<(), DeviceError> {
        self.fault.check(&self.name)?;
        lock(&self.feed).recording = false;
        Ok(())
    }

    fn enable_motion_detection(&self, enabled: bool) {
        lock(&self.feed).motion_detection = enabled;
    }

    fn is_recording(&self) -> bool {
        lock(&self.feed).recording
    }

    fn is_motion_detection_enabled(&self) -> bool {
        lock(&self.feed).motion_detection
    }
}
