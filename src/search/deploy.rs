//! Deployment planning.
//!
//! Distributes the round's reinforcement pool over owned border
//! territories. The annealing planner scores allocations with the utility
//! function; the heuristic planner follows fixed "wanted armies" rules and
//! serves as a fallback.

use std::time::Duration;

use log::debug;
use rand::Rng;

use crate::board::{Graph, Owner, Placement, TerritoryId};
use crate::eval::{utility, UtilityConfig};
use crate::resolve::SimulationError;
use crate::search::anneal::{anneal, random_allocation, Schedule};
use crate::search::SearchConfig;

/// Utility differences below this are treated as no difference.
const MARGINAL_EPSILON: f64 = 1e-9;

/// Assumed neutral army count when no neutral neighbor is larger.
const DEFAULT_NEUTRAL_ARMIES: i32 = 2;

/// Territories that may receive reinforcements: owned border territories,
/// or every owned territory when none of them touches another owner.
pub fn eligible_territories(graph: &Graph, me: &Owner) -> Vec<TerritoryId> {
    let border: Vec<TerritoryId> = graph
        .owned_by(me)
        .filter(|t| graph.is_border(t.id))
        .map(|t| t.id)
        .collect();
    if !border.is_empty() {
        return border;
    }
    graph.owned_by(me).map(|t| t.id).collect()
}

/// Plans where to place `army_pool` armies within `budget`.
///
/// The returned placements always sum to `army_pool`, unless `me` owns no
/// territory or the pool is empty, in which case the plan is empty.
pub fn plan_deployments<R: Rng>(
    graph: &Graph,
    me: &Owner,
    opponent: &Owner,
    army_pool: i32,
    budget: Duration,
    config: &SearchConfig,
    rng: &mut R,
) -> Result<Vec<Placement>, SimulationError> {
    let ids = eligible_territories(graph, me);
    if ids.is_empty() || army_pool <= 0 {
        return Ok(Vec::new());
    }

    let mut working = graph.clone();
    let schedule = Schedule::new(budget, config.initial_temperature);
    let initial = random_allocation(army_pool, ids.len(), rng);
    let outcome = anneal(initial, &schedule, 1, rng, |alloc| {
        deployed_utility(&mut working, &ids, alloc, me, opponent, &config.utility)
    })?;
    debug!(
        "deploy: {} slots, {} iterations, {} accepted, best utility {:.3}",
        ids.len(),
        outcome.iterations,
        outcome.accepted,
        outcome.best_utility
    );

    let alloc = reclaim_idle(&mut working, &ids, outcome.best, me, opponent, &config.utility)?;
    Ok(to_placements(&ids, &alloc))
}

/// Scores `alloc` by applying it, evaluating, and taking it back off.
fn deployed_utility(
    working: &mut Graph,
    ids: &[TerritoryId],
    alloc: &[i32],
    me: &Owner,
    opponent: &Owner,
    config: &UtilityConfig,
) -> Result<f64, SimulationError> {
    working.apply_deployments(ids, alloc)?;
    let util = utility(working, me, opponent, config);
    working.deapply_deployments(ids, alloc)?;
    Ok(util)
}

/// Pulls armies off slots where they change nothing and deals them out
/// again: round-robin over slots still holding armies, or all onto the
/// default slot when none remain.
fn reclaim_idle(
    working: &mut Graph,
    ids: &[TerritoryId],
    mut alloc: Vec<i32>,
    me: &Owner,
    opponent: &Owner,
    config: &UtilityConfig,
) -> Result<Vec<i32>, SimulationError> {
    let mut reclaimed = 0;
    for i in 0..alloc.len() {
        let amount = alloc[i];
        if amount == 0 {
            continue;
        }
        let with = deployed_utility(working, ids, &alloc, me, opponent, config)?;
        alloc[i] = 0;
        let without = deployed_utility(working, ids, &alloc, me, opponent, config)?;
        if (with - without).abs() > MARGINAL_EPSILON {
            alloc[i] = amount;
        } else {
            reclaimed += amount;
        }
    }
    if reclaimed == 0 {
        return Ok(alloc);
    }

    let holders: Vec<usize> = (0..alloc.len()).filter(|&i| alloc[i] > 0).collect();
    if holders.is_empty() {
        alloc[default_slot(working, ids, opponent)] += reclaimed;
    } else {
        for k in 0..reclaimed as usize {
            alloc[holders[k % holders.len()]] += 1;
        }
    }
    Ok(alloc)
}

/// The slot facing the most opponent armies; the first slot on ties.
fn default_slot(graph: &Graph, ids: &[TerritoryId], opponent: &Owner) -> usize {
    let mut best = 0;
    let mut best_threat = i32::MIN;
    for (i, &id) in ids.iter().enumerate() {
        let threat = graph.adjacent_armies(id, opponent);
        if threat > best_threat {
            best = i;
            best_threat = threat;
        }
    }
    best
}

fn to_placements(ids: &[TerritoryId], alloc: &[i32]) -> Vec<Placement> {
    ids.iter()
        .zip(alloc)
        .filter(|&(_, &n)| n > 0)
        .map(|(&id, &n)| Placement::new(id, n))
        .collect()
}

/// Plans deployments with fixed rules, without search.
///
/// Borders facing the opponent want 1.5x the adjacent opponent armies;
/// borders facing only neutrals want twice the largest neutral stack (at
/// least 2). Threatened borders are served first, scaled down when their
/// demand exceeds the pool. Leftover armies go round-robin to the borders
/// that wanted something, or to every border when none did.
pub fn heuristic_deployments(
    graph: &Graph,
    me: &Owner,
    opponent: &Owner,
    army_pool: i32,
) -> Vec<Placement> {
    let ids = eligible_territories(graph, me);
    if ids.is_empty() || army_pool <= 0 {
        return Vec::new();
    }

    let mut working = graph.clone();
    let threatened: Vec<bool> = ids
        .iter()
        .map(|&id| working.has_neighbor_owned_by(id, opponent))
        .collect();

    let mut threatened_demand = 0;
    for (&id, &under_threat) in ids.iter().zip(&threatened) {
        let wanted = wanted_armies(&working, id, me, opponent, under_threat);
        if under_threat {
            threatened_demand += wanted;
        }
        set_wanted(&mut working, id, wanted);
    }

    if threatened_demand > army_pool {
        for (&id, &under_threat) in ids.iter().zip(&threatened) {
            let scaled = if under_threat {
                wanted(&working, id) * army_pool / threatened_demand
            } else {
                0
            };
            set_wanted(&mut working, id, scaled);
        }
    } else {
        let mut left = army_pool - threatened_demand;
        for (&id, &under_threat) in ids.iter().zip(&threatened) {
            if under_threat {
                continue;
            }
            left -= wanted(&working, id);
            if left < 0 {
                set_wanted(&mut working, id, 0);
            }
        }
    }

    let mut allocated: i32 = ids.iter().map(|&id| wanted(&working, id)).sum();
    debug_assert!(allocated <= army_pool);
    let spread_everywhere = allocated == 0;
    let mut k = 0;
    while allocated < army_pool {
        let id = ids[k % ids.len()];
        let current = wanted(&working, id);
        if spread_everywhere || current > 0 {
            set_wanted(&mut working, id, current + 1);
            allocated += 1;
        }
        k += 1;
    }

    ids.iter()
        .map(|&id| Placement::new(id, wanted(&working, id)))
        .filter(|p| p.armies > 0)
        .collect()
}

fn wanted_armies(
    graph: &Graph,
    id: TerritoryId,
    me: &Owner,
    opponent: &Owner,
    under_threat: bool,
) -> i32 {
    let Some(t) = graph.territory(id) else {
        return 0;
    };
    let target = if under_threat {
        graph.adjacent_armies(id, opponent) * 3 / 2
    } else {
        let largest = graph
            .neighbors_of(id)
            .filter(|n| !n.owned_by(me) && !n.owned_by(opponent))
            .map(|n| n.armies)
            .max()
            .unwrap_or(0)
            .max(DEFAULT_NEUTRAL_ARMIES);
        2 * largest
    };
    (target - t.armies).max(0)
}

fn wanted(graph: &Graph, id: TerritoryId) -> i32 {
    graph.territory(id).map_or(0, |t| t.wanted_armies)
}

fn set_wanted(graph: &mut Graph, id: TerritoryId, value: i32) {
    if let Some(t) = graph.territory_mut(id) {
        t.wanted_armies = value;
    }
}
