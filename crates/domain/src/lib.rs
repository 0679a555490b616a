//! # homeguard-domain
//!
//! Pure domain model for the homeguard security orchestration engine.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Hazards** (motion, smoke, gas, …) and the alarm types they map to
//! - Define **Security events** (the named events colleagues report) and
//!   **Security commands** (what the mediator asks colleagues to do)
//! - Define **Notification severities** used by the escalation chain
//! - Define the **Sequence state** of the timed escalation sequencer
//! - Define the **Operating state** and its undo/redo **history**
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or async runtimes.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod command;
pub mod device;
pub mod event;
pub mod hazard;
pub mod operating_state;
pub mod sequence;
pub mod severity;
pub mod state_history;
