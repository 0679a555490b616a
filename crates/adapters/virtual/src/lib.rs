//! # homeguard-adapter-virtual
//!
//! A simulated home for development and demonstration.
//!
//! ## Responsibilities
//! - Provide in-memory lights, an alarm panel, cameras, detectors and
//!   appliances implementing the device ports from `homeguard-app`
//! - Assemble them into [`VirtualHome`], the [`DeviceCatalog`] the operating
//!   state behaviors drive
//! - Let tests and the console inject readings and device failures
//!
//! ## Dependency rule
//! Depends on `homeguard-domain` and `homeguard-app` (for port traits).

pub mod devices;

use std::sync::Arc;

use homeguard_app::ports::{AlarmDevice, CameraDevice, DetectorDevice, Device, DeviceCatalog};
use homeguard_domain::hazard::HazardKind;

pub use devices::{VirtualAlarm, VirtualAppliance, VirtualCamera, VirtualDetector, VirtualLight};

/// The demo home: three lights, one alarm panel, two cameras, a smoke and a
/// gas detector, a TV and a sound system.
#[derive(Debug)]
pub struct VirtualHome {
    lights: Vec<Arc<VirtualLight>>,
    alarm: Arc<VirtualAlarm>,
    cameras: Vec<Arc<VirtualCamera>>,
    detectors: Vec<Arc<VirtualDetector>>,
    appliances: Vec<Arc<VirtualAppliance>>,
}

impl Default for VirtualHome {
    fn default() -> Self {
        Self {
            lights: vec![
                Arc::new(VirtualLight::new("Living Room Light")),
                Arc::new(VirtualLight::new("Kitchen Light")),
                Arc::new(VirtualLight::new("Hallway Light")),
            ],
            alarm: Arc::new(VirtualAlarm::new("Main Alarm")),
            cameras: vec![
                Arc::new(VirtualCamera::new("Front Door Camera")),
                Arc::new(VirtualCamera::new("Backyard Camera")),
            ],
            detectors: vec![
                Arc::new(VirtualDetector::smoke("Kitchen Smoke Detector")),
                Arc::new(VirtualDetector::gas("Basement Gas Detector")),
            ],
            appliances: vec![
                Arc::new(VirtualAppliance::tv("Living Room TV")),
                Arc::new(VirtualAppliance::sound_system("Sound System")),
            ],
        }
    }
}

impl VirtualHome {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lights(&self) -> &[Arc<VirtualLight>] {
        &self.lights
    }

    #[must_use]
    pub fn alarm(&self) -> &Arc<VirtualAlarm> {
        &self.alarm
    }

    #[must_use]
    pub fn cameras(&self) -> &[Arc<VirtualCamera>] {
        &self.cameras
    }

    #[must_use]
    pub fn detectors(&self) -> &[Arc<VirtualDetector>] {
        &self.detectors
    }

    #[must_use]
    pub fn appliances(&self) -> &[Arc<VirtualAppliance>] {
        &self.appliances
    }

    /// First detector sensing `hazard`.
    #[must_use]
    pub fn detector(&self, hazard: HazardKind) -> Option<&Arc<VirtualDetector>> {
        self.detectors.iter().find(|d| d.hazard() == hazard)
    }

    /// Lights as plain devices, for the light colleague.
    #[must_use]
    pub fn light_devices(&self) -> Vec<Arc<dyn Device>> {
        self.lights
            .iter()
            .map(|l| Arc::clone(l) as Arc<dyn Device>)
            .collect()
    }

    #[must_use]
    pub fn alarm_device(&self) -> Arc<dyn AlarmDevice> {
        Arc::clone(&self.alarm) as Arc<dyn AlarmDevice>
    }

    #[must_use]
    pub fn camera_devices(&self) -> Vec<Arc<dyn CameraDevice>> {
        self.cameras
            .iter()
            .map(|c| Arc::clone(c) as Arc<dyn CameraDevice>)
            .collect()
    }

    #[must_use]
    pub fn detector_devices(&self) -> Vec<Arc<dyn DetectorDevice>> {
        self.detectors
            .iter()
            .map(|d| Arc::clone(d) as Arc<dyn DetectorDevice>)
            .collect()
    }
}

impl DeviceCatalog for VirtualHome {
    fn devices(&self) -> Vec<Arc<dyn Device>> {
        let mut all: Vec<Arc<dyn Device>> = self.light_devices();
        all.push(Arc::clone(&self.alarm) as Arc<dyn Device>);
        all.extend(self.cameras.iter().map(|c| Arc::clone(c) as Arc<dyn Device>));
        all.extend(
            self.detectors
                .iter()
                .map(|d| Arc::clone(d) as Arc<dyn Device>),
        );
        all.extend(
            self.appliances
                .iter()
                .map(|a| Arc::clone(a) as Arc<dyn Device>),
        );
        all
    }
}
