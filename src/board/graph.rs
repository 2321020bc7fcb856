//! Map snapshot.
//!
//! The graph is an arena: territories and groups live in vectors and are
//! addressed by id through index maps. Cloning duplicates the whole arena,
//! so a working snapshot never aliases the authoritative map.

use std::collections::HashMap;

use super::territory::{Group, GroupId, Owner, Territory, TerritoryId};

/// Errors raised while building or updating a graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("territory {0} already exists")]
    DuplicateTerritory(TerritoryId),

    #[error("group {0} already exists")]
    DuplicateGroup(GroupId),

    #[error("unknown territory {0}")]
    UnknownTerritory(TerritoryId),

    #[error("unknown group {0}")]
    UnknownGroup(GroupId),

    #[error("territory {0} cannot neighbor itself")]
    SelfLoop(TerritoryId),
}

/// Territories and groups at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    territories: Vec<Territory>,
    groups: Vec<Group>,
    territory_index: HashMap<TerritoryId, usize>,
    group_index: HashMap<GroupId, usize>,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Graph::default()
    }

    /// Adds a group with the given capture bonus.
    pub fn add_group(&mut self, id: GroupId, bonus: i32) -> Result<(), GraphError> {
        if self.group_index.contains_key(&id) {
            return Err(GraphError::DuplicateGroup(id));
        }
        self.group_index.insert(id, self.groups.len());
        self.groups.push(Group::new(id, bonus));
        Ok(())
    }

    /// Adds a territory and registers it as a member of `group`.
    pub fn add_territory(&mut self, id: TerritoryId, group: GroupId) -> Result<(), GraphError> {
        if self.territory_index.contains_key(&id) {
            return Err(GraphError::DuplicateTerritory(id));
        }
        let gi = *self
            .group_index
            .get(&group)
            .ok_or(GraphError::UnknownGroup(group))?;
        self.groups[gi].members.push(id);
        self.territory_index.insert(id, self.territories.len());
        self.territories.push(Territory::new(id, group));
        Ok(())
    }

    /// Connects two territories in both directions. Adding an existing edge is a no-op.
    pub fn add_edge(&mut self, a: TerritoryId, b: TerritoryId) -> Result<(), GraphError> {
        if a == b {
            return Err(GraphError::SelfLoop(a));
        }
        let ia = self.index_of(a).ok_or(GraphError::UnknownTerritory(a))?;
        let ib = self.index_of(b).ok_or(GraphError::UnknownTerritory(b))?;
        if !self.territories[ia].neighbors.contains(&b) {
            self.territories[ia].neighbors.push(b);
        }
        if !self.territories[ib].neighbors.contains(&a) {
            self.territories[ib].neighbors.push(a);
        }
        Ok(())
    }

    /// Sets owner and army count of a territory.
    pub fn set_territory(
        &mut self,
        id: TerritoryId,
        owner: Owner,
        armies: i32,
    ) -> Result<(), GraphError> {
        let t = self
            .territory_mut(id)
            .ok_or(GraphError::UnknownTerritory(id))?;
        t.owner = owner;
        t.armies = armies;
        Ok(())
    }

    pub fn territory(&self, id: TerritoryId) -> Option<&Territory> {
        self.index_of(id).map(|i| &self.territories[i])
    }

    pub fn territory_mut(&mut self, id: TerritoryId) -> Option<&mut Territory> {
        self.index_of(id).map(move |i| &mut self.territories[i])
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.group_index.get(&id).map(|&i| &self.groups[i])
    }

    /// All territories in insertion order.
    pub fn territories(&self) -> &[Territory] {
        &self.territories
    }

    /// All groups in insertion order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Territories held by `owner`, in insertion order.
    pub fn owned_by<'a>(&'a self, owner: &'a Owner) -> impl Iterator<Item = &'a Territory> + 'a {
        self.territories.iter().filter(move |t| t.owned_by(owner))
    }

    /// Returns true if the territory has at least one neighbor with a different owner.
    pub fn is_border(&self, id: TerritoryId) -> bool {
        let Some(t) = self.territory(id) else {
            return false;
        };
        t.neighbors
            .iter()
            .filter_map(|&n| self.territory(n))
            .any(|n| n.owner != t.owner)
    }

    /// Returns true if any neighbor of the territory is held by `owner`.
    pub fn has_neighbor_owned_by(&self, id: TerritoryId, owner: &Owner) -> bool {
        self.neighbors_of(id).any(|n| n.owned_by(owner))
    }

    /// Sums the armies on neighbors of `id` held by `owner`.
    pub fn adjacent_armies(&self, id: TerritoryId, owner: &Owner) -> i32 {
        self.neighbors_of(id)
            .filter(|n| n.owned_by(owner))
            .map(|n| n.armies)
            .sum()
    }

    /// Iterates the neighbor territories of `id`. Empty for unknown ids.
    pub fn neighbors_of(&self, id: TerritoryId) -> impl Iterator<Item = &Territory> + '_ {
        self.territory(id)
            .map(|t| t.neighbors.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(move |&n| self.territory(n))
    }

    #[inline]
    pub(crate) fn index_of(&self, id: TerritoryId) -> Option<usize> {
        self.territory_index.get(&id).copied()
    }

    #[inline]
    pub(crate) fn at_mut(&mut self, index: usize) -> &mut Territory {
        &mut self.territories[index]
    }
}
