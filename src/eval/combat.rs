//! Combat outcome model.
//!
//! Each attacking army destroys a defender with probability 0.6 and each
//! defending army destroys an attacker with probability 0.7. The capture
//! probability treats the attacker's kills as Binomial(attackers, 0.6) and
//! asks whether they reach the defender count.
//!
//! The binomial terms are summed in log space (log-factorial table), so the
//! model stays exact to f64 precision for army counts far beyond anything a
//! real match produces.

/// Probability that a single attacking army destroys one defender.
pub const ATTACKER_KILL_RATE: f64 = 0.6;

/// Below `CERTAIN_RATIO * attackers` defenders, capture is certain.
const CERTAIN_RATIO: f64 = 0.504;

/// Spread above the certain ratio inside which capture is still possible.
const SPREAD_RATIO: f64 = 0.16;

/// Probability that `attackers` armies capture a territory held by `defenders`.
///
/// Monotone non-decreasing in `attackers`, non-increasing in `defenders`, and
/// always within `[0, 1]`.
pub fn probability_to_take(attackers: u32, defenders: u32) -> f64 {
    let a = attackers as f64;
    let d = defenders as f64;

    if d < CERTAIN_RATIO * a {
        return 1.0;
    }
    if d > CERTAIN_RATIO * a + SPREAD_RATIO * a + 1.0 {
        return 0.0;
    }

    let needed = defenders;
    if needed == 0 {
        return 1.0;
    }
    if needed > attackers {
        return 0.0;
    }
    if needed == attackers {
        // Fixed boundary term; only reachable with one or two attackers.
        return binomial_pmf(3, 3, ATTACKER_KILL_RATE);
    }

    (1.0 - binomial_cdf(needed - 1, attackers, ATTACKER_KILL_RATE)).clamp(0.0, 1.0)
}

/// Defenders destroyed by an attack of `attack` armies, in expectation (floored).
#[inline]
pub fn expected_defenders_destroyed(attack: i32) -> i32 {
    (attack * 6).div_euclid(10)
}

/// Attackers destroyed by `defenders` armies, in expectation (floored),
/// capped by the size of the attack.
#[inline]
pub fn expected_attackers_destroyed(attack: i32, defenders: i32) -> i32 {
    attack.min((defenders * 7).div_euclid(10))
}

/// Probability of exactly `k` successes in `n` trials.
pub fn binomial_pmf(k: u32, n: u32, p: f64) -> f64 {
    if k > n {
        return 0.0;
    }
    let ln_fact = ln_factorials(n);
    ln_pmf(k, n, p, &ln_fact).exp()
}

/// Probability of at most `k` successes in `n` trials.
pub fn binomial_cdf(k: u32, n: u32, p: f64) -> f64 {
    if k >= n {
        return 1.0;
    }
    let ln_fact = ln_factorials(n);
    let total: f64 = (0..=k).map(|i| ln_pmf(i, n, p, &ln_fact).exp()).sum();
    total.min(1.0)
}

fn ln_pmf(k: u32, n: u32, p: f64, ln_fact: &[f64]) -> f64 {
    let (k, n) = (k as usize, n as usize);
    let ln_choose = ln_fact[n] - ln_fact[k] - ln_fact[n - k];
    let successes = if k == 0 { 0.0 } else { k as f64 * p.ln() };
    let failures = if n == k { 0.0 } else { (n - k) as f64 * (1.0 - p).ln() };
    ln_choose + successes + failures
}

/// `ln(i!)` for `i` in `0..=n`.
fn ln_factorials(n: u32) -> Vec<f64> {
    let mut table = Vec::with_capacity(n as usize + 1);
    let mut acc = 0.0f64;
    table.push(acc);
    for i in 1..=n {
        acc += (i as f64).ln();
        table.push(acc);
    }
    table
}
