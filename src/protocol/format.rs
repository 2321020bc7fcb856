//! Move serialization for the Warlight protocol.
//!
//! Placements print as `<bot> place_armies <id> <n>`, attacks and transfers
//! as `<bot> attack/transfer <from> <to> <n>`. Moves are joined with ", " and
//! an empty list prints `No moves`.

use crate::board::{AttackTransfer, Placement};

/// Line sent when a phase has nothing to submit.
pub const NO_MOVES: &str = "No moves";

/// Formats one placement.
pub fn format_placement(bot: &str, p: &Placement) -> String {
    format!("{} place_armies {} {}", bot, p.territory, p.armies)
}

/// Formats one attack or transfer.
pub fn format_attack(bot: &str, m: &AttackTransfer) -> String {
    format!("{} attack/transfer {} {} {}", bot, m.from, m.to, m.armies)
}

fn join(moves: Vec<String>) -> String {
    if moves.is_empty() {
        NO_MOVES.to_string()
    } else {
        moves.join(", ")
    }
}

/// Formats the placement phase reply.
pub fn format_placements(bot: &str, placements: &[Placement]) -> String {
    join(placements.iter().map(|p| format_placement(bot, p)).collect())
}

/// Formats the attack/transfer phase reply.
pub fn format_attacks(bot: &str, moves: &[AttackTransfer]) -> String {
    join(moves.iter().map(|m| format_attack(bot, m)).collect())
}
