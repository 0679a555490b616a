//! Virtual light: responds to `turn_on`, `turn_off`, `toggle`.

use std::sync::Mutex;

use homeguard_app::ports::Device;
use homeguard_domain::device::DeviceCategory;
use homeguard_domain::error::DeviceError;
use homeguard_domain::id::DeviceId;

use super::{Fault, lock};

/// A simulated light that can be turned on and off.
#[derive(Debug)]
pub struct VirtualLight {
    id: DeviceId,
    name: String,
    on: Mutex<bool>,
    fault: Fault,
}

impl VirtualLight {
    /// A light that starts off.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: DeviceId::new(),
            name: name.into(),
            on: Mutex::new(false),
            fault: Fault::default(),
        }
    }

    pub fn set_failed(&self, failed: bool) {
        self.fault.set(failed);
    }

    fn switch(&self, on: bool) -> Result<(), DeviceError> {
        self.fault.check(&self.name)?;
        *lock(&self.on) = on;
        tracing::debug!(light = %self.name, on, "light switched");
        Ok(())
    }
}

impl Device for VirtualLight {
    fn id(&self) -> DeviceId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> DeviceCategory {
        DeviceCategory::Light
    }

    fn turn_on(&self) -> Result<(), DeviceError> {
        self.switch(true)
    }

    fn turn_off(&self) -> Result<(), DeviceError> {
        self.switch(false)
    }

    fn is_on(&self) -> bool {
        *lock(&self.on)
    }
}
