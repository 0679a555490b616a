//! Common error types used across the workspace.
//!
//! Each failure family has its own typed error; [`HomeGuardError`] composes
//! them through `#[from]` so callers can use `?` at every layer. None of these
//! is fatal: the orchestration engine logs them and keeps going.

use crate::hazard::HazardKind;

/// Top-level error for the homeguard workspace.
#[derive(Debug, thiserror::Error)]
pub enum HomeGuardError {
    #[error("device error")]
    Device(#[from] DeviceError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("sequence error")]
    Sequence(#[from] SequenceError),

    #[error("history error")]
    History(#[from] HistoryError),

    #[error("unknown event")]
    UnknownEvent(#[from] UnknownEventError),
}

/// A device refused or failed an operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    /// The device is offline or has failed.
    #[error("device {device} is unavailable")]
    Unavailable { device: String },

    /// A disarm or PIN-change attempt used the wrong code.
    #[error("invalid credential for device {device}")]
    InvalidCredential { device: String },

    /// The new PIN does not satisfy the minimum length.
    #[error("pin for device {device} must be at least {min_len} characters")]
    WeakPin { device: String, min_len: usize },
}

/// A referenced collaborator does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// The escalation sequencer refused a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    /// A hazard arrived while another sequence was running; it was dropped.
    #[error("a {active} sequence is already active")]
    Busy { active: HazardKind },

    /// The hazard kind has no response sequence.
    #[error("no response sequence for {kind} hazards")]
    Unsupported { kind: HazardKind },
}

/// Undo/redo was requested at a history boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    #[error("no previous state to return to")]
    NothingToUndo,

    #[error("no next state to advance to")]
    NothingToRedo,
}

/// An event name outside the mediator's vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown security event: {name}")]
pub struct UnknownEventError {
    pub name: String,
}
