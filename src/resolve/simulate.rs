//! What-if simulation on a working graph.
//!
//! Deployments and attacks are applied in place and undone exactly, so an
//! optimizer can score thousands of candidates against one snapshot.
//! Attacks resolve by expected value: the attacker destroys
//! `floor(0.6 * a)` defenders and loses `min(a, floor(0.7 * d))` armies.
//! Nothing here rolls dice.
//!
//! Every call validates its whole input before touching the graph, so a
//! rejected call leaves the snapshot unchanged.

use crate::board::{Graph, Owner, TerritoryId};
use crate::eval::combat::{expected_attackers_destroyed, expected_defenders_destroyed};

/// Misuse of the simulation API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    #[error("{what}: expected {expected} entries, got {got}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("unknown territory {0}")]
    UnknownTerritory(TerritoryId),
}

fn check_len(what: &'static str, expected: usize, got: usize) -> Result<(), SimulationError> {
    if expected == got {
        Ok(())
    } else {
        Err(SimulationError::LengthMismatch {
            what,
            expected,
            got,
        })
    }
}

impl Graph {
    fn indices_of(&self, ids: &[TerritoryId]) -> Result<Vec<usize>, SimulationError> {
        ids.iter()
            .map(|&id| self.index_of(id).ok_or(SimulationError::UnknownTerritory(id)))
            .collect()
    }

    /// Adds `amounts[i]` armies to territory `ids[i]`.
    pub fn apply_deployments(
        &mut self,
        ids: &[TerritoryId],
        amounts: &[i32],
    ) -> Result<(), SimulationError> {
        check_len("deployment amounts", ids.len(), amounts.len())?;
        let indices = self.indices_of(ids)?;
        for (&i, &n) in indices.iter().zip(amounts) {
            self.at_mut(i).armies += n;
        }
        Ok(())
    }

    /// Exact inverse of [`Graph::apply_deployments`].
    pub fn deapply_deployments(
        &mut self,
        ids: &[TerritoryId],
        amounts: &[i32],
    ) -> Result<(), SimulationError> {
        check_len("deployment amounts", ids.len(), amounts.len())?;
        let indices = self.indices_of(ids)?;
        for (&i, &n) in indices.iter().zip(amounts) {
            self.at_mut(i).armies -= n;
        }
        Ok(())
    }

    /// Resolves `attack_amounts[i]` armies from `from` into `to_ids[i]` by
    /// expected value. Entries targeting `from` itself are held back and skipped.
    pub fn simulate_attacks(
        &mut self,
        from: TerritoryId,
        attack_amounts: &[i32],
        to_ids: &[TerritoryId],
        attacker: &Owner,
    ) -> Result<(), SimulationError> {
        check_len("attack targets", attack_amounts.len(), to_ids.len())?;
        let src = self
            .index_of(from)
            .ok_or(SimulationError::UnknownTerritory(from))?;
        let targets = self.indices_of(to_ids)?;

        for ((&dst, &to), &attack) in targets.iter().zip(to_ids).zip(attack_amounts) {
            if to == from {
                continue;
            }
            let defenders = self.at_mut(dst).armies;
            let killed = expected_defenders_destroyed(attack);
            let lost = expected_attackers_destroyed(attack, defenders);

            if killed >= defenders {
                let target = self.at_mut(dst);
                target.owner = attacker.clone();
                target.armies = attack - lost;
                self.at_mut(src).armies -= attack;
            } else {
                self.at_mut(src).armies -= lost;
                self.at_mut(dst).armies -= killed;
            }
        }
        Ok(())
    }

    /// Restores the state captured before [`Graph::simulate_attacks`].
    ///
    /// `original_defenders[i]` and `original_owners[i]` are written back to
    /// `to_ids[i]`; the source gets `original_attacker_total` armies back.
    pub fn undo_simulation(
        &mut self,
        from: TerritoryId,
        attack_amounts: &[i32],
        original_defenders: &[i32],
        to_ids: &[TerritoryId],
        original_owners: &[Owner],
        original_attacker_total: i32,
    ) -> Result<(), SimulationError> {
        check_len("attack amounts", to_ids.len(), attack_amounts.len())?;
        check_len("defender counts", to_ids.len(), original_defenders.len())?;
        check_len("owners", to_ids.len(), original_owners.len())?;
        let src = self
            .index_of(from)
            .ok_or(SimulationError::UnknownTerritory(from))?;
        let targets = self.indices_of(to_ids)?;

        for ((&dst, &armies), owner) in targets.iter().zip(original_defenders).zip(original_owners) {
            let t = self.at_mut(dst);
            t.armies = armies;
            t.owner = owner.clone();
        }
        self.at_mut(src).armies = original_attacker_total;
        Ok(())
    }
}

/// Pre-attack state of a source and its targets, ready for
/// [`Graph::undo_simulation`].
#[derive(Debug, Clone, PartialEq)]
pub struct AttackSnapshot {
    pub from: TerritoryId,
    pub to_ids: Vec<TerritoryId>,
    pub defenders: Vec<i32>,
    pub owners: Vec<Owner>,
    pub attacker_total: i32,
}

impl AttackSnapshot {
    /// Records the current armies and owners of `from` and every id in `to_ids`.
    pub fn capture(
        graph: &Graph,
        from: TerritoryId,
        to_ids: &[TerritoryId],
    ) -> Result<Self, SimulationError> {
        let attacker_total = graph
            .territory(from)
            .ok_or(SimulationError::UnknownTerritory(from))?
            .armies;
        let mut defenders = Vec::with_capacity(to_ids.len());
        let mut owners = Vec::with_capacity(to_ids.len());
        for &id in to_ids {
            let t = graph
                .territory(id)
                .ok_or(SimulationError::UnknownTerritory(id))?;
            defenders.push(t.armies);
            owners.push(t.owner.clone());
        }
        Ok(AttackSnapshot {
            from,
            to_ids: to_ids.to_vec(),
            defenders,
            owners,
            attacker_total,
        })
    }

    /// Writes the captured state back into `graph`.
    pub fn restore(&self, graph: &mut Graph, attack_amounts: &[i32]) -> Result<(), SimulationError> {
        graph.undo_simulation(
            self.from,
            attack_amounts,
            &self.defenders,
            &self.to_ids,
            &self.owners,
            self.attacker_total,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn me() -> Owner {
        Owner::player("player1")
    }

    /// Star: 1 in the middle, owned by me with 20 armies; 2, 3, 4 around it.
    fn star() -> Graph {
        let mut g = Graph::new();
        g.add_group(1, 2).unwrap();
        for id in 1..=4 {
            g.add_territory(id, 1).unwrap();
        }
        for id in 2..=4 {
            g.add_edge(1, id).unwrap();
        }
        g.set_territory(1, me(), 20).unwrap();
        g.set_territory(2, Owner::Neutral, 2).unwrap();
        g.set_territory(3, Owner::player("player2"), 10).unwrap();
        g.set_territory(4, Owner::Neutral, 4).unwrap();
        g
    }

    #[test]
    fn deploy_then_deapply_restores() {
        let original = star();
        let mut g = original.clone();
        g.apply_deployments(&[1, 2], &[3, 4]).unwrap();
        assert_eq!(g.territory(1).unwrap().armies, 23);
        assert_eq!(g.territory(2).unwrap().armies, 6);
        g.deapply_deployments(&[1, 2], &[3, 4]).unwrap();
        assert_eq!(g, original);
    }

    #[test]
    fn winning_attack_captures() {
        let mut g = star();
        g.simulate_attacks(1, &[5], &[2], &me()).unwrap();
        let target = g.territory(2).unwrap();
        assert_eq!(target.owner, me());
        // floor(0.7 * 2) = 1 attacker lost
        assert_eq!(target.armies, 4);
        assert_eq!(g.territory(1).unwrap().armies, 15);
    }

    #[test]
    fn losing_attack_trades_armies() {
        let mut g = star();
        g.simulate_attacks(1, &[6], &[3], &me()).unwrap();
        let target = g.territory(3).unwrap();
        assert_eq!(target.owner, Owner::player("player2"));
        // floor(0.6 * 6) = 3 defenders lost, min(6, floor(0.7 * 10)) = 6 attackers lost
        assert_eq!(target.armies, 7);
        assert_eq!(g.territory(1).unwrap().armies, 14);
    }

    #[test]
    fn reserve_entry_is_skipped() {
        let original = star();
        let mut g = original.clone();
        g.simulate_attacks(1, &[7], &[1], &me()).unwrap();
        assert_eq!(g, original);
    }

    #[test]
    fn simulate_then_undo_restores() {
        let original = star();
        let mut g = original.clone();
        let to = [1, 2, 3, 4];
        let amounts = [2, 5, 6, 6];
        let snapshot = AttackSnapshot::capture(&g, 1, &to).unwrap();
        g.simulate_attacks(1, &amounts, &to, &me()).unwrap();
        assert_ne!(g, original);
        snapshot.restore(&mut g, &amounts).unwrap();
        assert_eq!(g, original);
    }

    #[test]
    fn length_mismatch_fails_without_mutation() {
        let original = star();
        let mut g = original.clone();
        let err = g.simulate_attacks(1, &[1, 2], &[2], &me()).unwrap_err();
        assert!(matches!(err, SimulationError::LengthMismatch { .. }));
        let err = g.apply_deployments(&[1], &[]).unwrap_err();
        assert!(matches!(err, SimulationError::LengthMismatch { .. }));
        let err = g
            .undo_simulation(1, &[1], &[2, 3], &[2], &[Owner::Neutral], 20)
            .unwrap_err();
        assert!(matches!(err, SimulationError::LengthMismatch { .. }));
        assert_eq!(g, original);
    }

    #[test]
    fn unknown_target_fails_without_mutation() {
        let original = star();
        let mut g = original.clone();
        assert_eq!(
            g.simulate_attacks(1, &[5, 5], &[2, 99], &me()),
            Err(SimulationError::UnknownTerritory(99))
        );
        assert_eq!(
            g.apply_deployments(&[1, 42], &[1, 1]),
            Err(SimulationError::UnknownTerritory(42))
        );
        assert_eq!(g, original);
    }
}
