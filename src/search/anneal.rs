//! Time-boxed simulated annealing over integer allocations.
//!
//! Both optimizers search the same kind of space: a fixed number of armies
//! split across a handful of slots. A candidate is generated by moving single
//! armies between slots, scored by an objective, and accepted with the
//! Metropolis rule. The temperature falls linearly with elapsed wall-clock
//! time and hits zero exactly at the deadline, which ends the search.

use std::time::{Duration, Instant};

use rand::Rng;

use crate::resolve::SimulationError;

/// Linear cooling from `initial` at the start to zero at the deadline.
pub(crate) struct Schedule {
    start: Instant,
    budget: Duration,
    initial: f64,
}

impl Schedule {
    pub(crate) fn new(budget: Duration, initial: f64) -> Self {
        Schedule {
            start: Instant::now(),
            budget,
            initial,
        }
    }

    /// Current temperature; zero once the budget is spent.
    pub(crate) fn temperature(&self) -> f64 {
        let budget = self.budget.as_secs_f64();
        if budget <= 0.0 {
            return 0.0;
        }
        let frac = self.start.elapsed().as_secs_f64() / budget;
        if frac >= 1.0 {
            0.0
        } else {
            self.initial * (1.0 - frac)
        }
    }
}

/// Metropolis acceptance: improvements always, regressions with
/// probability `exp(delta / temperature)`.
pub(crate) fn accept(delta: f64, temperature: f64, rng: &mut impl Rng) -> bool {
    if delta > 0.0 {
        return true;
    }
    if temperature <= 0.0 {
        return false;
    }
    rng.gen::<f64>() < (delta / temperature).exp()
}

/// Deals `total` armies one at a time to uniformly chosen slots.
pub(crate) fn random_allocation(total: i32, slots: usize, rng: &mut impl Rng) -> Vec<i32> {
    let mut alloc = vec![0; slots];
    if slots == 0 {
        return alloc;
    }
    for _ in 0..total.max(0) {
        alloc[rng.gen_range(0..slots)] += 1;
    }
    alloc
}

/// Moves one army from a non-empty slot to a different slot.
///
/// Returns false when no such move exists.
pub(crate) fn move_unit(alloc: &mut [i32], rng: &mut impl Rng) -> bool {
    let slots = alloc.len();
    if slots < 2 || alloc.iter().all(|&n| n <= 0) {
        return false;
    }
    let from = loop {
        let i = rng.gen_range(0..slots);
        if alloc[i] > 0 {
            break i;
        }
    };
    let mut to = rng.gen_range(0..slots - 1);
    if to >= from {
        to += 1;
    }
    alloc[from] -= 1;
    alloc[to] += 1;
    true
}

/// Summary of one annealing run.
#[derive(Debug, Clone)]
pub struct AnnealOutcome {
    pub best: Vec<i32>,
    pub best_utility: f64,
    pub iterations: u64,
    pub accepted: u64,
}

/// Anneals from `initial` until the schedule reaches zero.
///
/// Each step applies between 1 and `max_jumps` single-army moves. The best
/// allocation ever scored is returned, so the starting allocation is the
/// fallback when nothing better turns up.
pub(crate) fn anneal<R, F>(
    initial: Vec<i32>,
    schedule: &Schedule,
    max_jumps: usize,
    rng: &mut R,
    mut objective: F,
) -> Result<AnnealOutcome, SimulationError>
where
    R: Rng,
    F: FnMut(&[i32]) -> Result<f64, SimulationError>,
{
    let mut current = initial;
    let mut current_utility = objective(&current)?;
    let mut best = current.clone();
    let mut best_utility = current_utility;
    let mut candidate = current.clone();
    let mut iterations = 0u64;
    let mut accepted = 0u64;

    loop {
        let temperature = schedule.temperature();
        if temperature <= 0.0 {
            break;
        }

        candidate.copy_from_slice(&current);
        let jumps = rng.gen_range(1..=max_jumps.max(1));
        let mut moved = false;
        for _ in 0..jumps {
            moved |= move_unit(&mut candidate, rng);
        }
        if !moved {
            // A single slot or nothing to move: the start is the only solution.
            break;
        }

        iterations += 1;
        let utility = objective(&candidate)?;
        if accept(utility - current_utility, temperature, rng) {
            std::mem::swap(&mut current, &mut candidate);
            current_utility = utility;
            accepted += 1;
            if utility > best_utility {
                best.copy_from_slice(&current);
                best_utility = utility;
            }
        }
    }

    Ok(AnnealOutcome {
        best,
        best_utility,
        iterations,
        accepted,
    })
}
