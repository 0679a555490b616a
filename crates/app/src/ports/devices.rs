//! Device capability ports.
//!
//! The device catalog owns every device; colleagues only hold shared
//! references to the capability they drive. Operations that can fail on a
//! real device return [`DeviceError`] so callers can skip the effect and
//! keep going.

use homeguard_domain::device::{AlarmState, DeviceCategory};
use homeguard_domain::error::DeviceError;
use homeguard_domain::hazard::{AlarmType, HazardKind};
use homeguard_domain::id::DeviceId;

/// Capabilities every device exposes.
pub trait Device: Send + Sync {
    fn id(&self) -> DeviceId;

    fn name(&self) -> &str;

    fn category(&self) -> DeviceCategory;

    /// Power the device on.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Unavailable`] if the device has failed.
    fn turn_on(&self) -> Result<(), DeviceError>;

    /// Power the device off.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Unavailable`] if the device has failed.
    fn turn_off(&self) -> Result<(), DeviceError>;

    /// Flip the power state.
    ///
    /// # Errors
    ///
    /// Propagates the error of the underlying on/off call.
    fn toggle(&self) -> Result<(), DeviceError> {
        if self.is_on() {
            self.turn_off()
        } else {
            self.turn_on()
        }
    }

    fn is_on(&self) -> bool;

    /// Critical devices (alarms, detectors, cameras) stay powered when the
    /// home goes to sleep.
    fn is_critical(&self) -> bool {
        false
    }
}

/// An alarm panel with a siren.
pub trait AlarmDevice: Device {
    /// Arm the panel. No-op when already armed or triggered.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Unavailable`] if the panel has failed.
    fn arm(&self) -> Result<(), DeviceError>;

    /// Trigger the siren. Only an armed panel triggers.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Unavailable`] if the panel has failed.
    fn trigger(&self, alarm_type: AlarmType) -> Result<(), DeviceError>;

    /// Stop the siren without changing the arming state.
    fn silence(&self);

    /// Disarm with a PIN code.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::InvalidCredential`] when `code` does not match.
    /// The panel state is left untouched in that case.
    fn disarm(&self, code: &str) -> Result<(), DeviceError>;

    fn alarm_state(&self) -> AlarmState;

    fn is_siren_active(&self) -> bool;

    fn last_trigger(&self) -> Option<AlarmType>;
}

/// A security camera.
pub trait CameraDevice: Device {
    /// # Errors
    ///
    /// Returns [`DeviceError::Unavailable`] if the camera is off or failed.
    fn start_recording(&self) -> Result<(), DeviceError>;

    /// # Errors
    ///
    /// Returns [`DeviceError::Unavailable`] if the camera has failed.
    fn stop_recording(&self) -> Result<(), DeviceError>;

    fn enable_motion_detection(&self, enabled: bool);

    fn is_recording(&self) -> bool;

    fn is_motion_detection_enabled(&self) -> bool;
}

/// A smoke or gas detector.
pub trait DetectorDevice: Device {
    /// Hazard this detector senses.
    fn hazard(&self) -> HazardKind;

    /// Whether the last reading crossed the threshold.
    fn is_triggered(&self) -> bool;

    /// Clear the triggered latch.
    fn reset(&self);
}
