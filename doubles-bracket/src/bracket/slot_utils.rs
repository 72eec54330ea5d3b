use chrono::{DateTime, Utc};

use super::types::BracketMode;

/// Game id for a slot, e.g. `T2-C1` for round 2 on court 1
pub fn game_id(round: u32, court: u32) -> String {
    format!("T{}-C{}", round, court)
}

/// 0-based position of a slot in round-major order
pub fn slot_index(round: u32, court: u32, courts: u32) -> usize {
    ((round - 1) * courts + (court - 1)) as usize
}

/// Session label: mode, generation time and roster size
pub fn session_id(mode: BracketMode, player_count: usize, at: DateTime<Utc>) -> String {
    format!("{}-{}-{}p", mode.label(), at.format("%Y%m%d%H%M%S"), player_count)
}
