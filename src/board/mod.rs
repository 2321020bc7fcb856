//! Board representation.
//!
//! Contains the territory graph, ownership, and the decision records the
//! engine emits.

pub mod graph;
pub mod order;
pub mod territory;

pub use graph::{Graph, GraphError};
pub use order::{placed_total, AttackTransfer, Placement};
pub use territory::{Group, GroupId, Owner, Territory, TerritoryId};
