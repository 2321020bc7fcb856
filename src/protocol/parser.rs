//! Warlight command parser.
//!
//! Parses lines sent by the match engine into structured `Command` variants
//! that the main loop can dispatch on.

use thiserror::Error;

use crate::board::{GroupId, Owner, TerritoryId};

/// Errors produced while parsing a protocol line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("unknown command: '{0}'")]
    UnknownCommand(String),

    #[error("unknown {what}: '{token}'")]
    UnknownKeyword { what: &'static str, token: String },

    #[error("missing {0}")]
    Missing(&'static str),

    #[error("invalid {what}: '{token}'")]
    InvalidNumber { what: &'static str, token: String },

    #[error("{what} expects groups of {group} tokens, got {got}")]
    Ragged {
        what: &'static str,
        group: usize,
        got: usize,
    },
}

/// A `settings` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setting {
    Timebank(u64),
    TimePerMove(u64),
    MaxRounds(u32),
    YourBot(String),
    OpponentBot(String),
    StartingArmies(i32),
    StartingRegions(Vec<TerritoryId>),
    StartingPickAmount(u32),
}

/// A `setup_map` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapSection {
    /// `(group, bonus)` pairs.
    SuperRegions(Vec<(GroupId, i32)>),
    /// `(territory, group)` pairs.
    Regions(Vec<(TerritoryId, GroupId)>),
    /// Each territory with the neighbors listed on its entry.
    Neighbors(Vec<(TerritoryId, Vec<TerritoryId>)>),
    Wastelands(Vec<TerritoryId>),
    OpponentStartingRegions(Vec<TerritoryId>),
}

/// One `<id> <owner> <armies>` triple of an `update_map` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerritoryUpdate {
    pub id: TerritoryId,
    pub owner: Owner,
    pub armies: i32,
}

/// The two move phases of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    PlaceArmies,
    AttackTransfer,
}

/// A parsed engine-to-bot command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Settings(Setting),
    SetupMap(MapSection),
    /// Choose one of `candidates` as a starting territory.
    PickStartingRegion {
        time_ms: u64,
        candidates: Vec<TerritoryId>,
    },
    /// Every territory currently visible to the bot.
    UpdateMap(Vec<TerritoryUpdate>),
    /// The opponent's visible moves of the last round, unparsed.
    OpponentMoves(String),
    /// Produce moves for `phase` within `time_ms`.
    Go { phase: Phase, time_ms: u64 },
}

/// Parses a single line of input into a `Command`.
///
/// Returns `Ok(None)` for blank lines.
pub fn parse_command(line: &str) -> Result<Option<Command>, ProtocolError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let cmd = match head {
        "settings" => Command::Settings(parse_setting(args)?),
        "setup_map" => Command::SetupMap(parse_map_section(args)?),
        "pick_starting_region" => {
            let (&time, ids) = args.split_first().ok_or(ProtocolError::Missing("pick time"))?;
            Command::PickStartingRegion {
                time_ms: number("pick time", time)?,
                candidates: numbers("territory id", ids)?,
            }
        }
        "update_map" => Command::UpdateMap(parse_updates(args)?),
        "opponent_moves" => Command::OpponentMoves(args.join(" ")),
        "go" => parse_go(args)?,
        other => return Err(ProtocolError::UnknownCommand(other.to_string())),
    };
    Ok(Some(cmd))
}

fn number<T: std::str::FromStr>(what: &'static str, token: &str) -> Result<T, ProtocolError> {
    token.parse().map_err(|_| ProtocolError::InvalidNumber {
        what,
        token: token.to_string(),
    })
}

fn numbers<T: std::str::FromStr>(what: &'static str, tokens: &[&str]) -> Result<Vec<T>, ProtocolError> {
    tokens.iter().map(|t| number(what, t)).collect()
}

fn pair<A: std::str::FromStr, B: std::str::FromStr>(
    what_a: &'static str,
    what_b: &'static str,
    chunk: &[&str],
) -> Result<(A, B), ProtocolError> {
    Ok((number(what_a, chunk[0])?, number(what_b, chunk[1])?))
}

fn chunks<'a>(
    what: &'static str,
    tokens: &'a [&'a str],
    group: usize,
) -> Result<std::slice::ChunksExact<'a, &'a str>, ProtocolError> {
    if tokens.len() % group != 0 {
        return Err(ProtocolError::Ragged {
            what,
            group,
            got: tokens.len(),
        });
    }
    Ok(tokens.chunks_exact(group))
}

/// Parses `settings <key> <value...>`.
fn parse_setting(args: &[&str]) -> Result<Setting, ProtocolError> {
    let (&key, values) = args.split_first().ok_or(ProtocolError::Missing("setting name"))?;
    let first = || values.first().copied().ok_or(ProtocolError::Missing("setting value"));

    Ok(match key {
        "timebank" => Setting::Timebank(number("timebank", first()?)?),
        "time_per_move" => Setting::TimePerMove(number("time_per_move", first()?)?),
        "max_rounds" => Setting::MaxRounds(number("max_rounds", first()?)?),
        "your_bot" => Setting::YourBot(first()?.to_string()),
        "opponent_bot" => Setting::OpponentBot(first()?.to_string()),
        "starting_armies" => Setting::StartingArmies(number("starting_armies", first()?)?),
        "starting_regions" => Setting::StartingRegions(numbers("territory id", values)?),
        "starting_pick_amount" => {
            Setting::StartingPickAmount(number("starting_pick_amount", first()?)?)
        }
        other => {
            return Err(ProtocolError::UnknownKeyword {
                what: "setting",
                token: other.to_string(),
            })
        }
    })
}

/// Parses `setup_map <section> <entries...>`.
fn parse_map_section(args: &[&str]) -> Result<MapSection, ProtocolError> {
    let (&section, rest) = args.split_first().ok_or(ProtocolError::Missing("map section"))?;

    Ok(match section {
        "super_regions" => MapSection::SuperRegions(
            chunks("super_regions", rest, 2)?
                .map(|c| pair("group id", "bonus", c))
                .collect::<Result<_, _>>()?,
        ),
        "regions" => MapSection::Regions(
            chunks("regions", rest, 2)?
                .map(|c| pair("territory id", "group id", c))
                .collect::<Result<_, _>>()?,
        ),
        "neighbors" => MapSection::Neighbors(
            chunks("neighbors", rest, 2)?
                .map(parse_neighbor_entry)
                .collect::<Result<_, _>>()?,
        ),
        "wastelands" => MapSection::Wastelands(numbers("territory id", rest)?),
        "opponent_starting_regions" => {
            MapSection::OpponentStartingRegions(numbers("territory id", rest)?)
        }
        other => {
            return Err(ProtocolError::UnknownKeyword {
                what: "map section",
                token: other.to_string(),
            })
        }
    })
}

/// Parses one `<id> <a,b,c>` entry of `setup_map neighbors`.
fn parse_neighbor_entry(chunk: &[&str]) -> Result<(TerritoryId, Vec<TerritoryId>), ProtocolError> {
    let list: Vec<&str> = chunk[1].split(',').filter(|s| !s.is_empty()).collect();
    Ok((number("territory id", chunk[0])?, numbers("territory id", &list)?))
}

/// Parses one `<id> <owner> <armies>` triple of `update_map`.
fn parse_update(chunk: &[&str]) -> Result<TerritoryUpdate, ProtocolError> {
    Ok(TerritoryUpdate {
        id: number("territory id", chunk[0])?,
        owner: Owner::parse(chunk[1]),
        armies: number("armies", chunk[2])?,
    })
}

fn parse_updates(args: &[&str]) -> Result<Vec<TerritoryUpdate>, ProtocolError> {
    chunks("update_map", args, 3)?.map(parse_update).collect()
}

/// Parses `go place_armies <ms>` and `go attack/transfer <ms>`.
fn parse_go(args: &[&str]) -> Result<Command, ProtocolError> {
    let phase = match args.first() {
        Some(&"place_armies") => Phase::PlaceArmies,
        Some(&"attack/transfer") => Phase::AttackTransfer,
        Some(other) => {
            return Err(ProtocolError::UnknownKeyword {
                what: "phase",
                token: other.to_string(),
            })
        }
        None => return Err(ProtocolError::Missing("phase")),
    };
    let time = args.get(1).ok_or(ProtocolError::Missing("move time"))?;
    Ok(Command::Go {
        phase,
        time_ms: number("move time", time)?,
    })
}
