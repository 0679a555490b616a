//! Virtual non-critical appliances (TV, sound system).

use std::sync::Mutex;

use homeguard_app::ports::Device;
use homeguard_domain::device::DeviceCategory;
use homeguard_domain::error::DeviceError;
use homeguard_domain::id::DeviceId;

use super::{Fault, lock};

/// A simulated appliance that only switches power. Starts on.
#[derive(Debug)]
pub struct VirtualAppliance {
    id: DeviceId,
    name: String,
    category: DeviceCategory,
    on: Mutex<bool>,
    fault: Fault,
}

impl VirtualAppliance {
    pub fn tv(name: impl Into<String>) -> Self {
        Self::new(name.into(), DeviceCategory::Tv)
    }

    pub fn sound_system(name: impl Into<String>) -> Self {
        Self::new(name.into(), DeviceCategory::SoundSystem)
    }

    fn new(name: String, category: DeviceCategory) -> Self {
        Self {
            id: DeviceId::new(),
            name,
            category,
            on: Mutex::new(true),
            fault: Fault::default(),
        }
    }

    pub fn set_failed(&self, failed: bool) {
        self.fault.set(failed);
    }
}

impl Device for VirtualAppliance {
    fn id(&self) -> DeviceId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> DeviceCategory {
        self.category
    }

    fn turn_on(&self) -> Result<(), DeviceError> {
        self.fault.check(&self.name)?;
        *lock(&self.on) = true;
        Ok(())
    }

    fn turn_off(&self) -> Result<(), DeviceError> {
        self.fault.check(&self.name)?;
        *lock(&self.on) = false;
        Ok(())
    }

    fn is_on(&self) -> bool {
        *lock(&self.on)
    }
}
