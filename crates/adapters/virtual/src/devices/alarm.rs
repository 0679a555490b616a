//! Virtual alarm panel with a PIN-protected disarm.

use std::sync::Mutex;

use homeguard_app::ports::{AlarmDevice, Device};
use homeguard_domain::device::{AlarmState, DeviceCategory};
use homeguard_domain::error::DeviceError;
use homeguard_domain::hazard::AlarmType;
use homeguard_domain::id::DeviceId;

use super::{Fault, lock, unavailable};

pub const DEFAULT_PIN: &str = "1234";
pub const MIN_PIN_LEN: usize = 4;

#[derive(Debug)]
struct Panel {
    powered: bool,
    state: AlarmState,
    siren: bool,
    last_trigger: Option<AlarmType>,
}

/// A simulated alarm panel. Powered on from the start.
#[derive(Debug)]
pub struct VirtualAlarm {
    id: DeviceId,
    name: String,
    pin: Mutex<String>,
    panel: Mutex<Panel>,
    fault: Fault,
}

impl VirtualAlarm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: DeviceId::new(),
            name: name.into(),
            pin: Mutex::new(DEFAULT_PIN.to_string()),
            panel: Mutex::new(Panel {
                powered: true,
                state: AlarmState::Disarmed,
                siren: false,
                last_trigger: None,
            }),
            fault: Fault::default(),
        }
    }

    /// Replace the disarm PIN.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::WeakPin`] when `pin` is shorter than
    /// [`MIN_PIN_LEN`]; the old PIN stays in effect.
    pub fn set_pin(&self, pin: &str) -> Result<(), DeviceError> {
        if pin.chars().count() < MIN_PIN_LEN {
            return Err(DeviceError::WeakPin {
                device: self.name.clone(),
                min_len: MIN_PIN_LEN,
            });
        }
        *lock(&self.pin) = pin.to_string();
        Ok(())
    }

    /// Arm in stay-at-home mode.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Unavailable`] when the panel is off or failed.
    pub fn arm_home(&self) -> Result<(), DeviceError> {
        self.arm_as(AlarmState::ArmedHome)
    }

    pub fn set_failed(&self, failed: bool) {
        self.fault.set(failed);
    }

    fn arm_as(&self, mode: AlarmState) -> Result<(), DeviceError> {
        self.fault.check(&self.name)?;
        let mut panel = lock(&self.panel);
        if !panel.powered {
            return Err(unavailable(&self.name));
        }
        if panel.state == AlarmState::Disarmed {
            panel.state = mode;
            tracing::debug!(alarm = %self.name, ?mode, "alarm armed");
        }
        Ok(())
    }

    fn set_power(&self, powered: bool) -> Result<(), DeviceError> {
        self.fault.check(&self.name)?;
        let mut panel = lock(&self.panel);
        panel.powered = powered;
        if !powered {
            panel.siren = false;
        }
        Ok(())
    }
}

impl Device for VirtualAlarm {
    fn id(&self) -> DeviceId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> DeviceCategory {
        DeviceCategory::Alarm
    }

    fn turn_on(&self) -> Result<(), DeviceError> {
        self.set_power(true)
    }

    fn turn_off(&self) -> Result<(), DeviceError> {
        self.set_power(false)
    }

    fn is_on(&self) -> bool {
        lock(&self.panel).powered
    }

    fn is_critical(&self) -> bool {
        true
    }
}

impl AlarmDevice for VirtualAlarm {
    fn arm(&self) -> Result<(), DeviceError> {
        self.arm_as(AlarmState::ArmedAway)
    }

    fn trigger(&self, alarm_type: AlarmType) -> Result<(), DeviceError> {
        self.fault.check(&self.name)?;
        let mut panel = lock(&self.panel);
        if panel.state.is_armed() {
            panel.state = AlarmState::Triggered;
            panel.siren = true;
            panel.last_trigger = Some(alarm_type);
            tracing::debug!(alarm = %self.name, %alarm_type, "alarm triggered");
        }
        Ok(())
    }

    fn silence(&self) {
        lock(&self.panel).siren = false;
    }

    fn disarm(&self, code: &str) -> Result<(), DeviceError> {
        if *lock(&self.pin) != code {
            return Err(DeviceError::InvalidCredential {
                device: self.name.clone(),
            });
        }
        let mut panel = lock(&self.panel);
        panel.state = AlarmState::Disarmed;
        panel.siren = false;
        Ok(())
    }

    fn alarm_state(&self) -> AlarmState {
        lock(&self.panel).state
    }

    fn is_siren_active(&self) -> bool {
        lock(&self.panel).siren
    }

    fn last_trigger(&self) -> Option<AlarmType> {
        lock(&self.panel).last_trigger
    }
}
