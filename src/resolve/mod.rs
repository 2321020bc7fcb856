//! Move resolution.
//!
//! Applies hypothetical deployments and attacks to a working graph by
//! expected value, with exact undo.

pub mod simulate;

pub use simulate::{AttackSnapshot, SimulationError};
