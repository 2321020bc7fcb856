//! Move generation outside the optimizers.
//!
//! Routes interior armies toward the front and chooses starting
//! territories.

pub mod frontier;
pub mod start;

pub use frontier::nearest_border_step;
pub use start::pick_starting_territory;
