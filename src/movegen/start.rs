//! Starting territory selection.
//!
//! Bots pick starting territories in alternation from a list offered by the
//! match engine. Territories with few neighbors are easier to hold; once we
//! own a pick, expanding next to it keeps our start compact.

use crate::board::{Graph, TerritoryId};

/// Picks one territory from `pickable`.
///
/// Candidates adjacent to one of `previous_picks` are preferred; among the
/// candidates the one with the fewest neighbors wins, earliest in `pickable`
/// on ties. Ids missing from `full_map` are ignored.
pub fn pick_starting_territory(
    full_map: &Graph,
    pickable: &[TerritoryId],
    previous_picks: &[TerritoryId],
) -> Option<TerritoryId> {
    let known: Vec<_> = pickable
        .iter()
        .filter_map(|&id| full_map.territory(id))
        .collect();

    let frontier: Vec<_> = known
        .iter()
        .copied()
        .filter(|t| previous_picks.iter().any(|&p| t.is_neighbor(p)))
        .collect();

    let pool = if frontier.is_empty() { known } else { frontier };
    pool.into_iter()
        .min_by_key(|t| t.neighbors().len())
        .map(|t| t.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1 touches 2, 3, 4; 5 touches only 4; 6 touches only 2.
    fn map() -> Graph {
        let mut g = Graph::new();
        g.add_group(1, 2).unwrap();
        for id in 1..=6 {
            g.add_territory(id, 1).unwrap();
        }
        for (a, b) in [(1, 2), (1, 3), (1, 4), (4, 5), (2, 6), (2, 3)] {
            g.add_edge(a, b).unwrap();
        }
        g
    }

    #[test]
    fn picks_fewest_neighbors() {
        assert_eq!(pick_starting_territory(&map(), &[1, 5, 2], &[]), Some(5));
    }

    #[test]
    fn ties_go_to_first_listed() {
        assert_eq!(pick_starting_territory(&map(), &[6, 5], &[]), Some(6));
        assert_eq!(pick_starting_territory(&map(), &[5, 6], &[]), Some(5));
    }

    #[test]
    fn expands_next_to_previous_pick() {
        // 5 has fewer neighbors, but 3 touches our pick at 2.
        assert_eq!(pick_starting_territory(&map(), &[5, 3], &[2]), Some(3));
    }

    #[test]
    fn empty_or_unknown_list() {
        assert_eq!(pick_starting_territory(&map(), &[], &[]), None);
        assert_eq!(pick_starting_territory(&map(), &[40, 41], &[]), None);
    }
}
