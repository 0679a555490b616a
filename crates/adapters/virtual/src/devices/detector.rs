//! Virtual smoke and gas detectors with a numeric reading.

use std::sync::Mutex;

use homeguard_app::ports::{DetectorDevice, Device};
use homeguard_domain::device::DeviceCategory;
use homeguard_domain::error::DeviceError;
use homeguard_domain::hazard::HazardKind;
use homeguard_domain::id::DeviceId;

use super::{Fault, lock};

/// Smoke level at which a smoke detector latches.
pub const SMOKE_THRESHOLD: f64 = 30.0;
/// Gas concentration (ppm) at which a gas detector latches.
pub const GAS_THRESHOLD: f64 = 100.0;

#[derive(Debug)]
struct Sensing {
    on: bool,
    reading: f64,
    triggered: bool,
}

/// A simulated detector. Once the reading reaches the threshold the
/// detector stays triggered until [`reset`](DetectorDevice::reset).
#[derive(Debug)]
pub struct VirtualDetector {
    id: DeviceId,
    name: String,
    hazard: HazardKind,
    threshold: f64,
    sensing: Mutex<Sensing>,
    fault: Fault,
}

impl VirtualDetector {
    pub fn smoke(name: impl Into<String>) -> Self {
        Self::new(name.into(), HazardKind::Smoke, SMOKE_THRESHOLD)
    }

    pub fn gas(name: impl Into<String>) -> Self {
        Self::new(name.into(), HazardKind::Gas, GAS_THRESHOLD)
    }

    fn new(name: String, hazard: HazardKind, threshold: f64) -> Self {
        Self {
            id: DeviceId::new(),
            name,
            hazard,
            threshold,
            sensing: Mutex::new(Sensing {
                on: true,
                reading: 0.0,
                triggered: false,
            }),
            fault: Fault::default(),
        }
    }

    /// Feed a new reading. Returns whether the detector is triggered.
    pub fn set_reading(&self, value: f64) -> bool {
        let mut sensing = lock(&self.sensing);
        sensing.reading = value;
        if sensing.on && value >= self.threshold && !sensing.triggered {
            sensing.triggered = true;
            tracing::debug!(detector = %self.name, value, "threshold crossed");
        }
        sensing.triggered
    }

    #[must_use]
    pub fn reading(&self) -> f64 {
        lock(&self.sensing).reading
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn set_failed(&self, failed: bool) {
        self.fault.set(failed);
    }
}

impl Device for VirtualDetector {
    fn id(&self) -> DeviceId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> DeviceCategory {
        match self.hazard {
            HazardKind::Gas => DeviceCategory::GasDetector,
            _ => DeviceCategory::SmokeDetector,
        }
    }

    fn turn_on(&self) -> Result<(), DeviceError> {
        self.fault.check(&self.name)?;
        lock(&self.sensing).on = true;
        Ok(())
    }

    fn turn_off(&self) -> Result<(), DeviceError> {
        self.fault.check(&self.name)?;
        lock(&self.sensing).on = false;
        Ok(())
    }

    fn is_on(&self) -> bool {
        lock(&self.sensing).on
    }

    fn is_critical(&self) -> bool {
        true
    }
}

impl DetectorDevice for VirtualDetector {
    fn hazard(&self) -> HazardKind {
        self.hazard
    }

    fn is_triggered(&self) -> bool {
        lock(&self.sensing).triggered
    }

    fn reset(&self) {
        lock(&self.sensing).triggered = false;
    }
}
