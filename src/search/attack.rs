//! Attack planning.
//!
//! For each owned border territory, anneals over how to split its spare
//! armies between the attackable neighbors and a reserve that stays home,
//! then enforces capture-probability thresholds so that no half-hearted
//! attack survives. Interior territories send their armies one hop toward
//! the front instead.

use std::time::{Duration, Instant};

use log::{debug, warn};
use rand::Rng;

use crate::board::{AttackTransfer, Graph, Owner, TerritoryId};
use crate::eval::{probability_to_take, utility, UtilityConfig};
use crate::movegen::nearest_border_step;
use crate::resolve::{AttackSnapshot, SimulationError};
use crate::search::anneal::{anneal, random_allocation, Schedule};
use crate::search::SearchConfig;

/// Index of the reserve bucket in an attack allocation.
const RESERVE: usize = 0;

/// Plans the attacks launched from `source` within `budget`.
///
/// Returns nothing unless `source` is an owned border territory with more
/// than one army. The armies sent never exceed `armies - 1`.
pub fn plan_attacks<R: Rng>(
    graph: &Graph,
    source: TerritoryId,
    me: &Owner,
    opponent: &Owner,
    budget: Duration,
    config: &SearchConfig,
    rng: &mut R,
) -> Result<Vec<AttackTransfer>, SimulationError> {
    let src = graph
        .territory(source)
        .ok_or(SimulationError::UnknownTerritory(source))?;
    if !src.owned_by(me) || src.armies <= 1 || !graph.is_border(source) {
        return Ok(Vec::new());
    }

    // Bucket 0 is the source itself: armies parked there are not attacking.
    let mut to_ids = vec![source];
    to_ids.extend(
        graph
            .neighbors_of(source)
            .filter(|n| !n.owned_by(me))
            .map(|n| n.id),
    );
    let available = src.armies - 1;

    let mut working = graph.clone();
    let snapshot = AttackSnapshot::capture(&working, source, &to_ids)?;
    let schedule = Schedule::new(budget, config.initial_temperature);
    let initial = random_allocation(available, to_ids.len(), rng);
    let max_jumps = (available / config.attack_jump_divisor.max(1)).max(1) as usize;

    let outcome = anneal(initial, &schedule, max_jumps, rng, |alloc| {
        attack_utility(&mut working, &snapshot, alloc, me, opponent, &config.utility)
    })?;
    debug!(
        "attack from {}: {} targets, {} iterations, {} accepted, best utility {:.3}",
        source,
        to_ids.len() - 1,
        outcome.iterations,
        outcome.accepted,
        outcome.best_utility
    );

    let alloc = enforce_thresholds(outcome.best, &snapshot.defenders, config);
    Ok(to_ids
        .iter()
        .zip(&alloc)
        .skip(1)
        .filter(|&(_, &n)| n > 0)
        .map(|(&to, &n)| AttackTransfer::new(source, to, n))
        .collect())
}

/// Scores `alloc` by simulating it and restoring the snapshot, on every path.
fn attack_utility(
    working: &mut Graph,
    snapshot: &AttackSnapshot,
    alloc: &[i32],
    me: &Owner,
    opponent: &Owner,
    config: &UtilityConfig,
) -> Result<f64, SimulationError> {
    let simulated = working.simulate_attacks(snapshot.from, alloc, &snapshot.to_ids, me);
    let util = simulated.map(|()| utility(working, me, opponent, config));
    snapshot.restore(working, alloc)?;
    util
}

/// Cancels weak attacks, tops up marginal ones from the reserve, and deals
/// what is left of the reserve round-robin to the attacks that survive.
fn enforce_thresholds(mut alloc: Vec<i32>, defenders: &[i32], config: &SearchConfig) -> Vec<i32> {
    let take = |attack: i32, defenders: i32| {
        probability_to_take(attack.max(0) as u32, defenders.max(0) as u32)
    };

    let mut reserve = alloc[RESERVE];
    for i in 1..alloc.len() {
        if alloc[i] == 0 {
            continue;
        }
        let p = take(alloc[i], defenders[i]);
        if p < config.low_take_threshold {
            reserve += alloc[i];
            alloc[i] = 0;
        } else if p < config.high_take_threshold {
            while reserve > 0 && take(alloc[i], defenders[i]) < config.high_take_threshold {
                alloc[i] += 1;
                reserve -= 1;
            }
            if take(alloc[i], defenders[i]) < config.high_take_threshold {
                reserve += alloc[i];
                alloc[i] = 0;
            }
        }
    }

    let survivors: Vec<usize> = (1..alloc.len()).filter(|&i| alloc[i] > 0).collect();
    if !survivors.is_empty() {
        for k in 0..reserve as usize {
            alloc[survivors[k % survivors.len()]] += 1;
        }
        reserve = 0;
    }
    alloc[RESERVE] = reserve;
    alloc
}

/// Plans the whole attack/transfer phase for `me`.
///
/// Border territories with spare armies get an even share of the remaining
/// budget for [`plan_attacks`]; interior territories route `armies - 1` one
/// hop toward the front, up to `config.max_transfers` per turn. A source
/// whose search fails is skipped.
pub fn plan_attack_transfers<R: Rng>(
    graph: &Graph,
    me: &Owner,
    opponent: &Owner,
    budget: Duration,
    config: &SearchConfig,
    rng: &mut R,
) -> Vec<AttackTransfer> {
    let start = Instant::now();
    let sources: Vec<TerritoryId> = graph
        .owned_by(me)
        .filter(|t| t.armies > 1)
        .map(|t| t.id)
        .collect();
    let border_count = sources.iter().filter(|&&id| graph.is_border(id)).count();

    let mut moves = Vec::new();
    let mut border_done = 0;
    let mut transfers = 0;

    for &id in &sources {
        if graph.is_border(id) {
            let remaining = budget.saturating_sub(start.elapsed());
            let share = remaining / (border_count - border_done) as u32;
            border_done += 1;
            match plan_attacks(graph, id, me, opponent, share, config, rng) {
                Ok(attacks) => moves.extend(attacks),
                Err(e) => warn!("attack search from {} failed: {}", id, e),
            }
        } else if transfers < config.max_transfers {
            let Some(next) = nearest_border_step(graph, id) else {
                continue;
            };
            if next == id {
                continue;
            }
            if let Some(t) = graph.territory(id) {
                moves.push(AttackTransfer::new(id, next, t.armies - 1));
                transfers += 1;
            }
        }
    }

    moves
}
