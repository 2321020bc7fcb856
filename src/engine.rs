//! Engine state management.
//!
//! Holds the match settings, the full map as set up by the match engine, the
//! visible map of the current round, and the RNG shared by every search.
//! Each protocol command is dispatched here; replies go to the writer passed
//! in, diagnostics go to the log.

use std::io::{self, Write};

use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::board::{placed_total, Graph, GraphError, Owner, Placement, TerritoryId};
use crate::config::EngineConfig;
use crate::movegen::pick_starting_territory;
use crate::protocol::{
    format_attacks, format_placements, Command, MapSection, Phase, Setting, TerritoryUpdate,
};
use crate::search::{heuristic_deployments, plan_attack_transfers, plan_deployments, DeployStrategy};

/// Armies on a wasteland when the map is set up.
pub const WASTELAND_ARMIES: i32 = 6;

/// Timebank assumed until the match engine reports one.
const DEFAULT_TIMEBANK_MS: u64 = 10_000;

/// Holds the mutable state of the engine between commands.
pub struct Engine {
    pub config: EngineConfig,
    pub me: Owner,
    pub opponent: Owner,
    pub timebank_ms: u64,
    pub time_per_move_ms: u64,
    pub max_rounds: u32,
    /// Army pool for the next placement phase.
    pub starting_armies: i32,
    pub starting_regions: Vec<TerritoryId>,
    pub starting_pick_amount: u32,
    /// Starting territories chosen so far.
    pub picks: Vec<TerritoryId>,
    /// Territories, groups and edges with the last known owners and armies.
    pub full_map: Graph,
    /// The map of the current round; fogged territories are `Unknown`.
    pub visible_map: Graph,
    rng: SmallRng,
}

impl Engine {
    /// Creates an engine; the RNG is seeded from `config.seed` when set.
    pub fn new(config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Engine {
            config,
            me: Owner::player("player1"),
            opponent: Owner::player("player2"),
            timebank_ms: DEFAULT_TIMEBANK_MS,
            time_per_move_ms: 0,
            max_rounds: 0,
            starting_armies: 0,
            starting_regions: Vec::new(),
            starting_pick_amount: 0,
            picks: Vec::new(),
            full_map: Graph::new(),
            visible_map: Graph::new(),
            rng,
        }
    }

    /// Dispatches one parsed command. Only I/O failures are returned; game
    /// level problems are logged and the command is skipped.
    pub fn handle<W: Write>(&mut self, cmd: Command, out: &mut W) -> io::Result<()> {
        match cmd {
            Command::Settings(setting) => self.apply_setting(setting),
            Command::SetupMap(section) => {
                if let Err(e) = self.setup_map(section) {
                    warn!("setup_map: {}", e);
                }
            }
            Command::PickStartingRegion {
                time_ms,
                candidates,
            } => {
                self.timebank_ms = time_ms;
                self.handle_pick(&candidates, out)?;
            }
            Command::UpdateMap(updates) => self.update_map(&updates),
            Command::OpponentMoves(moves) => {
                if !moves.is_empty() {
                    debug!("opponent moves: {}", moves);
                }
            }
            Command::Go { phase, time_ms } => {
                self.timebank_ms = time_ms;
                match phase {
                    Phase::PlaceArmies => self.handle_place_armies(out)?,
                    Phase::AttackTransfer => self.handle_attack_transfer(out)?,
                }
            }
        }
        Ok(())
    }

    /// Stores a `settings` value.
    pub fn apply_setting(&mut self, setting: Setting) {
        match setting {
            Setting::Timebank(ms) => self.timebank_ms = ms,
            Setting::TimePerMove(ms) => self.time_per_move_ms = ms,
            Setting::MaxRounds(n) => self.max_rounds = n,
            Setting::YourBot(name) => self.me = Owner::player(name),
            Setting::OpponentBot(name) => self.opponent = Owner::player(name),
            Setting::StartingArmies(n) => self.starting_armies = n,
            Setting::StartingRegions(ids) => self.starting_regions = ids,
            Setting::StartingPickAmount(n) => self.starting_pick_amount = n,
        }
    }

    /// Adds one `setup_map` section to the full map.
    ///
    /// Entries before a failing one stay applied.
    pub fn setup_map(&mut self, section: MapSection) -> Result<(), GraphError> {
        match section {
            MapSection::SuperRegions(groups) => {
                for (id, bonus) in groups {
                    self.full_map.add_group(id, bonus)?;
                }
            }
            MapSection::Regions(territories) => {
                for (id, group) in territories {
                    self.full_map.add_territory(id, group)?;
                }
            }
            MapSection::Neighbors(entries) => {
                for (id, neighbors) in entries {
                    for n in neighbors {
                        self.full_map.add_edge(id, n)?;
                    }
                }
            }
            MapSection::Wastelands(ids) => {
                for id in ids {
                    self.full_map.set_territory(id, Owner::Neutral, WASTELAND_ARMIES)?;
                }
            }
            MapSection::OpponentStartingRegions(ids) => {
                for id in ids {
                    let armies = self.full_map.territory(id).map_or(0, |t| t.armies);
                    self.full_map.set_territory(id, self.opponent.clone(), armies)?;
                }
            }
        }
        self.visible_map = self.full_map.clone();
        Ok(())
    }

    /// Rebuilds the visible map from an `update_map` line.
    ///
    /// Listed territories are also recorded in the full map. Unlisted ones
    /// keep their last known armies and become `Unknown`.
    pub fn update_map(&mut self, updates: &[TerritoryUpdate]) {
        for u in updates {
            if let Err(e) = self.full_map.set_territory(u.id, u.owner.clone(), u.armies) {
                warn!("update_map: {}", e);
            }
        }

        let mut visible = self.full_map.clone();
        let hidden: Vec<TerritoryId> = visible
            .territories()
            .iter()
            .map(|t| t.id)
            .filter(|id| !updates.iter().any(|u| u.id == *id))
            .collect();
        for id in hidden {
            if let Some(t) = visible.territory_mut(id) {
                t.owner = Owner::Unknown;
            }
        }
        self.visible_map = visible;
    }

    /// Chooses a starting territory and prints its id.
    pub fn handle_pick<W: Write>(&mut self, candidates: &[TerritoryId], out: &mut W) -> io::Result<()> {
        let choice = pick_starting_territory(&self.full_map, candidates, &self.picks)
            .or_else(|| candidates.first().copied());
        match choice {
            Some(id) => {
                self.picks.push(id);
                info!("picked starting territory {}", id);
                writeln!(out, "{}", id)?;
            }
            None => warn!("pick_starting_region: no candidates"),
        }
        out.flush()
    }

    /// Plans this round's placements on the visible map.
    ///
    /// The annealer falls back to the heuristic when it fails.
    pub fn plan_placements(&mut self) -> Vec<Placement> {
        let budget = self.config.phase_budget(self.timebank_ms);
        let pool = self.starting_armies;
        match self.config.search.deploy_strategy {
            DeployStrategy::Heuristic => {
                heuristic_deployments(&self.visible_map, &self.me, &self.opponent, pool)
            }
            DeployStrategy::Anneal => plan_deployments(
                &self.visible_map,
                &self.me,
                &self.opponent,
                pool,
                budget,
                &self.config.search,
                &mut self.rng,
            )
            .unwrap_or_else(|e| {
                warn!("deployment search failed, using heuristic: {}", e);
                heuristic_deployments(&self.visible_map, &self.me, &self.opponent, pool)
            }),
        }
    }

    /// Handles `go place_armies`: plans, applies the placements to the
    /// visible map, and prints them.
    pub fn handle_place_armies<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let placements = self.plan_placements();
        let ids: Vec<TerritoryId> = placements.iter().map(|p| p.territory).collect();
        let amounts: Vec<i32> = placements.iter().map(|p| p.armies).collect();
        if let Err(e) = self.visible_map.apply_deployments(&ids, &amounts) {
            warn!("could not apply placements: {}", e);
        }
        info!(
            "placing {} of {} armies on {} territories",
            placed_total(&placements),
            self.starting_armies,
            placements.len()
        );
        writeln!(out, "{}", format_placements(self.me.as_str(), &placements))?;
        out.flush()
    }

    /// Handles `go attack/transfer`.
    pub fn handle_attack_transfer<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let budget = self.config.phase_budget(self.timebank_ms);
        let moves = plan_attack_transfers(
            &self.visible_map,
            &self.me,
            &self.opponent,
            budget,
            &self.config.search,
            &mut self.rng,
        );
        info!("issuing {} attacks/transfers", moves.len());
        writeln!(out, "{}", format_attacks(self.me.as_str(), &moves))?;
        out.flush()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::parse_command;

    fn seeded() -> Engine {
        Engine::new(EngineConfig {
            seed: Some(42),
            max_phase_time_ms: 30,
            ..EngineConfig::default()
        })
    }

    fn feed(engine: &mut Engine, lines: &[&str]) -> Vec<String> {
        let mut out = Vec::new();
        for line in lines {
            if let Some(cmd) = parse_command(line).unwrap() {
                engine.handle(cmd, &mut out).unwrap();
            }
        }
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    const TWO_TERRITORY_SETUP: [&str; 6] = [
        "settings your_bot player1",
        "settings opponent_bot player2",
        "setup_map super_regions 1 2",
        "setup_map regions 1 1 2 1",
        "setup_map neighbors 1 2",
        "settings starting_armies 5",
    ];

    #[test]
    fn new_engine_has_no_map() {
        let engine = Engine::default();
        assert!(engine.full_map.territories().is_empty());
        assert!(engine.picks.is_empty());
        assert_eq!(engine.me, Owner::player("player1"));
    }

    #[test]
    fn settings_are_stored() {
        let mut engine = seeded();
        feed(
            &mut engine,
            &[
                "settings timebank 5000",
                "settings time_per_move 500",
                "settings max_rounds 45",
                "settings your_bot alpha",
                "settings opponent_bot beta",
                "settings starting_armies 7",
                "settings starting_regions 1 4",
                "settings starting_pick_amount 2",
            ],
        );
        assert_eq!(engine.timebank_ms, 5000);
        assert_eq!(engine.time_per_move_ms, 500);
        assert_eq!(engine.max_rounds, 45);
        assert_eq!(engine.me, Owner::player("alpha"));
        assert_eq!(engine.opponent, Owner::player("beta"));
        assert_eq!(engine.starting_armies, 7);
        assert_eq!(engine.starting_regions, vec![1, 4]);
        assert_eq!(engine.starting_pick_amount, 2);
    }

    #[test]
    fn setup_map_builds_graph() {
        let mut engine = seeded();
        feed(
            &mut engine,
            &[
                "setup_map super_regions 1 2 2 5",
                "setup_map regions 1 1 2 1 3 2",
                "setup_map neighbors 1 2,3 2 3",
                "setup_map wastelands 3",
            ],
        );
        let map = &engine.full_map;
        assert_eq!(map.territories().len(), 3);
        assert_eq!(map.group(2).unwrap().bonus, 5);
        assert!(map.territory(3).unwrap().is_neighbor(1));
        assert!(map.territory(3).unwrap().is_neighbor(2));
        assert_eq!(map.territory(3).unwrap().owner, Owner::Neutral);
        assert_eq!(map.territory(3).unwrap().armies, WASTELAND_ARMIES);
    }

    #[test]
    fn bad_setup_is_skipped() {
        let mut engine = seeded();
        feed(&mut engine, &["setup_map super_regions 1 2", "setup_map regions 1 9"]);
        assert!(engine.full_map.territories().is_empty());
    }

    #[test]
    fn update_map_fogs_unlisted() {
        let mut engine = seeded();
        feed(&mut engine, &TWO_TERRITORY_SETUP);
        feed(&mut engine, &["update_map 1 player1 3"]);
        assert_eq!(engine.visible_map.territory(1).unwrap().armies, 3);
        assert_eq!(engine.visible_map.territory(2).unwrap().owner, Owner::Unknown);

        feed(&mut engine, &["update_map 2 player2 4"]);
        let v = &engine.visible_map;
        assert_eq!(v.territory(1).unwrap().owner, Owner::Unknown);
        assert_eq!(v.territory(1).unwrap().armies, 3);
        assert_eq!(v.territory(2).unwrap().owner, Owner::player("player2"));
    }

    #[test]
    fn pick_prints_one_candidate() {
        let mut engine = seeded();
        feed(&mut engine, &TWO_TERRITORY_SETUP);
        let lines = feed(&mut engine, &["pick_starting_region 10000 2 1"]);
        assert_eq!(lines, vec!["2"]);
        assert_eq!(engine.picks, vec![2]);
    }

    #[test]
    fn two_owned_territories_place_everything_and_sit_still() {
        let mut engine = seeded();
        feed(&mut engine, &TWO_TERRITORY_SETUP);
        feed(&mut engine, &["update_map 1 player1 2 2 player1 2"]);

        let lines = feed(&mut engine, &["go place_armies 10000"]);
        assert_eq!(lines.len(), 1);
        let total: i32 = lines[0]
            .split(", ")
            .map(|m| {
                let parts: Vec<&str> = m.split_whitespace().collect();
                assert_eq!(parts[0], "player1");
                assert_eq!(parts[1], "place_armies");
                parts[3].parse::<i32>().unwrap()
            })
            .sum();
        assert_eq!(total, 5);
        let on_map: i32 = engine.visible_map.territories().iter().map(|t| t.armies).sum();
        assert_eq!(on_map, 9);

        let lines = feed(&mut engine, &["go attack/transfer 10000"]);
        assert_eq!(lines, vec!["No moves"]);
    }

    #[test]
    fn heuristic_strategy_places_everything() {
        let mut engine = seeded();
        engine.config.search.deploy_strategy = DeployStrategy::Heuristic;
        feed(&mut engine, &TWO_TERRITORY_SETUP);
        feed(&mut engine, &["update_map 1 player1 2 2 player1 2"]);
        let placements = engine.plan_placements();
        assert_eq!(placed_total(&placements), 5);
    }

    #[test]
    fn attacks_weak_neighbor() {
        let mut engine = seeded();
        feed(&mut engine, &TWO_TERRITORY_SETUP);
        feed(&mut engine, &["update_map 1 player1 12 2 neutral 2"]);
        let lines = feed(&mut engine, &["go attack/transfer 10000"]);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("player1 attack/transfer 1 2 "), "{}", lines[0]);
    }

    #[test]
    fn opponent_moves_print_nothing() {
        let mut engine = seeded();
        let lines = feed(&mut engine, &["opponent_moves player2 place_armies 3 5"]);
        assert!(lines.is_empty());
    }
}
