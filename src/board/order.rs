//! Decision records.
//!
//! The two kinds of moves a player submits each round: reinforcement
//! placements and attacks/transfers between adjacent territories.

use super::territory::TerritoryId;

/// Place `armies` new armies on `territory`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub territory: TerritoryId,
    pub armies: i32,
}

impl Placement {
    pub fn new(territory: TerritoryId, armies: i32) -> Self {
        Self { territory, armies }
    }
}

/// Move `armies` from `from` to the adjacent territory `to`.
///
/// Resolved as combat when `to` belongs to someone else, otherwise as a
/// plain transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttackTransfer {
    pub from: TerritoryId,
    pub to: TerritoryId,
    pub armies: i32,
}

impl AttackTransfer {
    pub fn new(from: TerritoryId, to: TerritoryId, armies: i32) -> Self {
        Self { from, to, armies }
    }
}

/// Sums the armies in a list of placements.
pub fn placed_total(placements: &[Placement]) -> i32 {
    placements.iter().map(|p| p.armies).sum()
}
