//! # homeguard-app
//!
//! Application layer: orchestration and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `Device`, `AlarmDevice`, `CameraDevice`, `DetectorDevice`: device capabilities
//!   - `DeviceCatalog`: bulk power operations over every device
//!   - `ActivityLog`: fire-and-forget activity lines
//! - Coordinate the home:
//!   - `SecurityMediator`: colleague registry, event dispatch, command fan-out
//!   - `Sequencer`: timed, cancellable escalation sequences
//!   - `NotificationChain`: severity-ordered notification handlers
//!   - `StateManager`: operating states with undo/redo history
//! - Provide in-process infrastructure that needs no IO (`RecentActivityLog`)
//!
//! ## Dependency rule
//! Depends on `homeguard-domain` only (plus `tokio` for timers and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod activity_log;
pub mod colleague;
pub mod mediator;
pub mod notification;
pub mod ports;
pub mod sequencer;
pub mod services;
