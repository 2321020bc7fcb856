//! Position evaluation.
//!
//! Scores a map from one player's perspective: one point per owned
//! territory plus, for every group, the squared ownership ratio times the
//! group bonus. The quadratic term rewards finishing a group far more than
//! spreading thin across several.
//!
//! An optional at-risk term subtracts, for every owned border territory, the
//! probability that the opponent's adjacent armies would capture it.

use serde::{Deserialize, Serialize};

use crate::board::{Graph, Owner};
use crate::eval::combat::probability_to_take;

/// Evaluator variant selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UtilityConfig {
    /// Subtract the capture risk of owned border territories.
    pub at_risk_penalty: bool,
    /// Multiplier on each territory's capture probability.
    pub risk_weight: f64,
}

impl Default for UtilityConfig {
    fn default() -> Self {
        UtilityConfig {
            at_risk_penalty: false,
            risk_weight: 1.0,
        }
    }
}

/// Evaluates `graph` for `me` against `opponent`. Higher is better for `me`.
pub fn utility(graph: &Graph, me: &Owner, opponent: &Owner, config: &UtilityConfig) -> f64 {
    let mut util = 0.0;

    for group in graph.groups() {
        let members = group.members();
        if members.is_empty() {
            continue;
        }
        let owned = members
            .iter()
            .filter_map(|&id| graph.territory(id))
            .filter(|t| t.owned_by(me))
            .count();
        util += owned as f64;

        let ratio = owned as f64 / members.len() as f64;
        util += ratio * ratio * group.bonus as f64;
    }

    if config.at_risk_penalty {
        util -= config.risk_weight * border_risk(graph, me, opponent);
    }

    util
}

/// Sums the capture probability of every border territory `me` holds.
pub fn border_risk(graph: &Graph, me: &Owner, opponent: &Owner) -> f64 {
    graph
        .owned_by(me)
        .filter(|t| graph.is_border(t.id))
        .map(|t| {
            let enemy = graph.adjacent_armies(t.id, opponent).max(0) as u32;
            if enemy == 0 {
                0.0
            } else {
                probability_to_take(enemy, t.armies.max(0) as u32)
            }
        })
        .sum()
}
