//! Search and planning.
//!
//! Budgeted local search over deployments and attacks, scored by the
//! utility function through the what-if simulator.

pub mod anneal;
pub mod attack;
pub mod deploy;

use serde::{Deserialize, Serialize};

use crate::eval::UtilityConfig;

pub use anneal::AnnealOutcome;
pub use attack::{plan_attack_transfers, plan_attacks};
pub use deploy::{eligible_territories, heuristic_deployments, plan_deployments};

/// Which planner produces the deployment phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployStrategy {
    /// Simulated annealing over the utility function.
    #[default]
    Anneal,
    /// Deterministic "wanted armies" rules.
    Heuristic,
}

/// Tuning knobs shared by both optimizers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Temperature at the start of every annealing run.
    pub initial_temperature: f64,
    /// Attacks below this capture probability are cancelled.
    pub low_take_threshold: f64,
    /// Attacks at or above this capture probability are kept as planned.
    pub high_take_threshold: f64,
    /// An attack step moves up to `armies / attack_jump_divisor` armies at once.
    pub attack_jump_divisor: i32,
    /// Maximum interior-to-front transfers issued per turn.
    pub max_transfers: usize,
    pub deploy_strategy: DeployStrategy,
    pub utility: UtilityConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            initial_temperature: 1.0,
            low_take_threshold: 0.35,
            high_take_threshold: 0.6125,
            attack_jump_divisor: 4,
            max_transfers: 10,
            deploy_strategy: DeployStrategy::Anneal,
            utility: UtilityConfig {
                at_risk_penalty: true,
                risk_weight: 1.0,
            },
        }
    }
}
