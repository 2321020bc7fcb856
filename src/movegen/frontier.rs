//! Routing toward the front.
//!
//! Interior territories are useless for combat; their armies should walk
//! toward the nearest border territory. BFS over the whole adjacency finds
//! that border and the first hop along the way.

use std::collections::{HashMap, VecDeque};

use crate::board::{Graph, TerritoryId};

/// Returns the neighbor of `origin` on a shortest path to the nearest border
/// territory.
///
/// Returns `origin` itself when it is already a border territory, and `None`
/// when no border territory is reachable or `origin` is unknown. Ties go to
/// the first border discovered in neighbor insertion order.
pub fn nearest_border_step(graph: &Graph, origin: TerritoryId) -> Option<TerritoryId> {
    graph.territory(origin)?;
    if graph.is_border(origin) {
        return Some(origin);
    }

    let mut parent: HashMap<TerritoryId, TerritoryId> = HashMap::new();
    parent.insert(origin, origin);
    let mut queue = VecDeque::new();
    queue.push_back(origin);

    while let Some(cur) = queue.pop_front() {
        for next in graph.neighbors_of(cur) {
            if parent.contains_key(&next.id) {
                continue;
            }
            parent.insert(next.id, cur);
            if graph.is_border(next.id) {
                return Some(first_hop(&parent, origin, next.id));
            }
            queue.push_back(next.id);
        }
    }

    None
}

/// Walks parent pointers back from `node` to the hop adjacent to `origin`.
fn first_hop(
    parent: &HashMap<TerritoryId, TerritoryId>,
    origin: TerritoryId,
    mut node: TerritoryId,
) -> TerritoryId {
    while let Some(&p) = parent.get(&node) {
        if p == origin {
            break;
        }
        node = p;
    }
    node
}
