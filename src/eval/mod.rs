//! Position evaluation.
//!
//! The combat model estimates capture probabilities; the utility function
//! scores a whole map from one player's perspective.

pub mod combat;
pub mod utility;

pub use combat::probability_to_take;
pub use utility::{border_risk, utility, UtilityConfig};
