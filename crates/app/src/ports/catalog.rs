//! Device catalog port: bulk operations over every device in the home.

use std::sync::Arc;

use homeguard_domain::device::DeviceCategory;
use homeguard_domain::error::DeviceError;

use super::devices::Device;

/// Result of a bulk power operation.
///
/// A failing device never stops the others from switching.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BulkOutcome {
    pub switched: usize,
    pub failures: Vec<DeviceError>,
}

impl BulkOutcome {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// The catalog that owns every device.
///
/// Only [`devices`](Self::devices) is required; the bulk operations have
/// default implementations in terms of it.
pub trait DeviceCatalog: Send + Sync {
    /// Snapshot of every device, in catalog order.
    fn devices(&self) -> Vec<Arc<dyn Device>>;

    /// Turn every device on.
    fn turn_all_on(&self) -> BulkOutcome {
        apply(self.devices(), |_| true, |d| d.turn_on())
    }

    /// Turn every non-critical device off.
    fn turn_all_off(&self) -> BulkOutcome {
        apply(self.devices(), |d| !d.is_critical(), |d| d.turn_off())
    }

    /// Turn on every device of `category`.
    fn turn_on_category(&self, category: DeviceCategory) -> BulkOutcome {
        apply(
            self.devices(),
            |d| d.category() == category,
            |d| d.turn_on(),
        )
    }

    /// Turn off every non-critical device of `category`.
    fn turn_off_category(&self, category: DeviceCategory) -> BulkOutcome {
        apply(
            self.devices(),
            |d| d.category() == category && !d.is_critical(),
            |d| d.turn_off(),
        )
    }
}

fn apply(
    devices: Vec<Arc<dyn Device>>,
    filter: impl Fn(&dyn Device) -> bool,
    op: impl Fn(&dyn Device) -> Result<(), DeviceError>,
) -> BulkOutcome {
    let mut outcome = BulkOutcome::default();
    for device in &devices {
        let device: &dyn Device = device.as_ref();
        if !filter(device) {
            continue;
        }
        match op(device) {
            Ok(()) => outcome.switched += 1,
            Err(err) => outcome.failures.push(err),
        }
    }
    outcome
}

impl<T: DeviceCatalog + ?Sized> DeviceCatalog for Arc<T> {
    fn devices(&self) -> Vec<Arc<dyn Device>> {
        (**self).devices()
    }

    fn turn_all_on(&self) -> BulkOutcome {
        (**self).turn_all_on()
    }

    fn turn_all_off(&self) -> BulkOutcome {
        (**self).turn_all_off()
    }

    fn turn_on_category(&self, category: DeviceCategory) -> BulkOutcome {
        (**self).turn_on_category(category)
    }

    fn turn_off_category(&self, category: DeviceCategory) -> BulkOutcome {
        (**self).turn_off_category(category)
    }
}
