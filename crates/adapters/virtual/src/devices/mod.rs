//! Virtual device implementations: light, alarm panel, camera, detector,
//! appliance.
//!
//! Every device can be put into a failed state with `set_failed(true)`;
//! a failed device answers every fallible operation with
//! [`DeviceError::Unavailable`].

mod alarm;
mod appliance;
mod camera;
mod detector;
mod light;

pub use alarm::{MIN_PIN_LEN, VirtualAlarm};
pub use appliance::VirtualAppliance;
pub use camera::VirtualCamera;
pub use detector::{GAS_THRESHOLD, SMOKE_THRESHOLD, VirtualDetector};
pub use light::VirtualLight;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use homeguard_domain::error::DeviceError;

/// Failure switch shared by every virtual device.
#[derive(Debug, Default)]
struct Fault(AtomicBool);

impl Fault {
    fn set(&self, failed: bool) {
        self.0.store(failed, Ordering::SeqCst);
    }

    fn check(&self, device: &str) -> Result<(), DeviceError> {
        if self.0.load(Ordering::SeqCst) {
            Err(unavailable(device))
        } else {
            Ok(())
        }
    }
}

fn unavailable(device: &str) -> DeviceError {
    DeviceError::Unavailable {
        device: device.to_string(),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
