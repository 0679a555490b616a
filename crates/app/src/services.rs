//! Application services: use-case implementations.
//!
//! Services accept port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete
//! adapters.

pub mod state_manager;

pub use state_manager::{StateBehavior, StateManager, behavior_for};
