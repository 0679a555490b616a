//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the orchestration core and the outside
//! world: the device catalog and its capability traits, and the activity
//! log. They are defined here (in `app`) so that both the use-case layer and
//! the adapter layer can depend on them without creating circular
//! dependencies.

pub mod activity_log;
pub mod catalog;
pub mod devices;

pub use activity_log::ActivityLog;
pub use catalog::{BulkOutcome, DeviceCatalog};
pub use devices::{AlarmDevice, CameraDevice, DetectorDevice, Device};
