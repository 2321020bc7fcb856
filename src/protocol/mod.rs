//! Warlight protocol handling.
//!
//! Line parsing for the match engine's commands and serialization of the
//! bot's replies.

pub mod format;
pub mod parser;

pub use format::{format_attacks, format_placements, NO_MOVES};
pub use parser::{parse_command, Command, MapSection, Phase, ProtocolError, Setting, TerritoryUpdate};
