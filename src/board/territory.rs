//! Territories, groups, and ownership.
//!
//! A territory is the atomic unit of ownership on the map. Groups (super
//! regions in the Warlight protocol) cluster territories and award a bonus
//! to the player holding every member.

use std::fmt;

/// Identifier of a territory as used by the match engine.
pub type TerritoryId = u32;

/// Identifier of a group as used by the match engine.
pub type GroupId = u32;

/// The holder of a territory.
///
/// `Unknown` marks territories hidden by fog of war; `Neutral` marks
/// unclaimed territories that still defend with their armies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Owner {
    #[default]
    Unknown,
    Neutral,
    Player(String),
}

impl Owner {
    /// Creates an owner for a named player.
    pub fn player(name: impl Into<String>) -> Self {
        Owner::Player(name.into())
    }

    /// Parses an owner from its protocol token.
    pub fn parse(token: &str) -> Self {
        match token {
            "unknown" => Owner::Unknown,
            "neutral" => Owner::Neutral,
            name => Owner::Player(name.to_string()),
        }
    }

    /// Returns the protocol token for this owner.
    pub fn as_str(&self) -> &str {
        match self {
            Owner::Unknown => "unknown",
            Owner::Neutral => "neutral",
            Owner::Player(name) => name,
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single territory on the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Territory {
    pub id: TerritoryId,
    pub group: GroupId,
    pub owner: Owner,
    /// Army count. Never negative at rest; simulation may move it transiently.
    pub armies: i32,
    /// Scratch value for the heuristic deployment planner.
    pub wanted_armies: i32,
    pub(crate) neighbors: Vec<TerritoryId>,
}

impl Territory {
    pub(crate) fn new(id: TerritoryId, group: GroupId) -> Self {
        Territory {
            id,
            group,
            owner: Owner::Unknown,
            armies: 0,
            wanted_armies: 0,
            neighbors: Vec::new(),
        }
    }

    /// Neighbor ids in insertion order.
    pub fn neighbors(&self) -> &[TerritoryId] {
        &self.neighbors
    }

    pub fn is_neighbor(&self, id: TerritoryId) -> bool {
        self.neighbors.contains(&id)
    }

    pub fn owned_by(&self, owner: &Owner) -> bool {
        &self.owner == owner
    }
}

/// A group of territories with a capture bonus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: GroupId,
    pub bonus: i32,
    pub(crate) members: Vec<TerritoryId>,
}

impl Group {
    pub(crate) fn new(id: GroupId, bonus: i32) -> Self {
        Group {
            id,
            bonus,
            members: Vec::new(),
        }
    }

    /// Member territory ids in insertion order.
    pub fn members(&self) -> &[TerritoryId] {
        &self.members
    }
}
