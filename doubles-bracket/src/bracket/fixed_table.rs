//! Precomputed round-robin tables for 5 to 10 players.
//!
//! Players are numbered by rank (1 is strongest, 10 is written `A`) and each
//! table entry `ab:cd` pits ranks a and b against ranks c and d.

use std::collections::HashSet;

use chrono::Utc;
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::BracketError;

use super::assignment::{assemble_schedule, build_game, validate_players};
use super::candidates::Candidate;
use super::rules;
use super::slot_utils::session_id;
use super::types::{
    BracketMode, BracketSettings, FixedTableInfo, Player, RankAssignment, RankSpread, Schedule,
};

pub const MIN_FIXED_PLAYERS: usize = 5;
pub const MAX_FIXED_PLAYERS: usize = 10;

const FIXED_TABLES: [(usize, &str); 6] = [
    (5, "14:23 12:35 15:24 13:45 25:34"),
    (6, "13:25 26:45 16:35 23:46 15:24 14:36"),
    (7, "17:26 25:36 14:56 27:45 15:37 34:67 13:24"),
    (8, "18:27 36:45 16:25 38:47 17:46 28:35 26:37 15:48"),
    (9, "18:27 36:45 16:79 25:34 58:69 14:23 57:68 19:38 29:47"),
    (10, "1A:29 37:48 19:56 2A:38 39:57 28:46 16:3A 17:45 26:58 79:4A"),
];

/// One table entry, as 1-based ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Combination {
    pub team_a: [u8; 2],
    pub team_b: [u8; 2],
}

impl Combination {
    pub fn ranks(&self) -> [u8; 4] {
        [self.team_a[0], self.team_a[1], self.team_b[0], self.team_b[1]]
    }

    pub fn label(&self) -> String {
        format!(
            "{}{}:{}{}",
            rank_token(self.team_a[0]),
            rank_token(self.team_a[1]),
            rank_token(self.team_b[0]),
            rank_token(self.team_b[1])
        )
    }

    /// Balance label from the gap between the teams' average ranks.
    pub fn spread(&self) -> RankSpread {
        let sum = |t: [u8; 2]| i32::from(t[0]) + i32::from(t[1]);
        // average gap <= 1 means sum gap <= 2
        match (sum(self.team_a) - sum(self.team_b)).abs() {
            0..=2 => RankSpread::Balanced,
            3..=4 => RankSpread::Even,
            _ => RankSpread::Uneven,
        }
    }
}

pub fn rank_token(rank: u8) -> char {
    match rank {
        10 => 'A',
        r => char::from_digit(u32::from(r), 10).unwrap_or('?'),
    }
}

fn parse_rank(token: char) -> Option<u8> {
    match token {
        'A' | 'a' => Some(10),
        '1'..='9' => token.to_digit(10).map(|d| d as u8),
        _ => None,
    }
}

pub fn parse_combination(raw: &str) -> Result<Combination, BracketError> {
    let malformed = || BracketError::MalformedCombination(raw.to_string());
    let (a, b) = raw.split_once(':').ok_or_else(malformed)?;
    let team = |s: &str| -> Result<[u8; 2], BracketError> {
        let ranks: Vec<u8> = s.chars().map(parse_rank).collect::<Option<_>>().ok_or_else(malformed)?;
        match ranks.as_slice() {
            [x, y] if x != y => Ok([*x, *y]),
            _ => Err(malformed()),
        }
    };
    let combination = Combination {
        team_a: team(a)?,
        team_b: team(b)?,
    };
    let ranks: HashSet<u8> = combination.ranks().into_iter().collect();
    if ranks.len() != 4 {
        return Err(malformed());
    }
    Ok(combination)
}

/// The parsed table for a player count.
pub fn table_for(player_count: usize) -> Result<Vec<Combination>, BracketError> {
    let (_, raw) = FIXED_TABLES
        .iter()
        .find(|(n, _)| *n == player_count)
        .ok_or(BracketError::UnsupportedFixedTableSize(player_count))?;
    raw.split_whitespace().map(parse_combination).collect()
}

/// Orders the roster by rank: roster index at position 0 gets rank 1.
///
/// With skill ranking, stronger players come first and players of equal skill
/// are shuffled among themselves. Otherwise the order is fully random.
pub fn assign_ranks<R: Rng + ?Sized>(players: &[Player], use_skill_ranking: bool, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..players.len()).collect();
    order.shuffle(rng);
    if use_skill_ranking {
        order.sort_by(|&a, &b| players[b].skill.cmp(&players[a].skill));
    }
    order
}

/// Builds a bracket from the fixed table for the roster size.
///
/// Games are laid out court by court in table order. A new round starts when
/// the courts are full or when the next game shares a player with one already
/// in the round.
pub fn generate_fixed_table_bracket<R: Rng + ?Sized>(
    players: &[Player],
    court_count: u32,
    use_skill_ranking: bool,
    rng: &mut R,
) -> Result<Schedule, BracketError> {
    if !(MIN_FIXED_PLAYERS..=MAX_FIXED_PLAYERS).contains(&players.len()) {
        return Err(BracketError::UnsupportedFixedTableSize(players.len()));
    }
    if court_count == 0 {
        return Err(BracketError::NoCourts);
    }
    validate_players(players)?;

    let table = table_for(players.len())?;
    let order = assign_ranks(players, use_skill_ranking, rng);
    let by_rank = |rank: u8| order[usize::from(rank) - 1];

    let mut games = Vec::with_capacity(table.len());
    let mut round = 1;
    let mut court = 0;
    let mut busy: HashSet<u8> = HashSet::new();
    for combination in &table {
        let ranks = combination.ranks();
        if court == court_count || ranks.iter().any(|r| busy.contains(r)) {
            round += 1;
            court = 0;
            busy.clear();
        }
        court += 1;
        busy.extend(ranks);

        let team_a = [by_rank(combination.team_a[0]), by_rank(combination.team_a[1])];
        let team_b = [by_rank(combination.team_b[0]), by_rank(combination.team_b[1])];
        let members = [&players[team_a[0]], &players[team_a[1]], &players[team_b[0]], &players[team_b[1]]];
        let candidate = Candidate {
            team_a,
            team_b,
            kind: rules::classify(members),
        };
        let info = FixedTableInfo {
            combination: combination.label(),
            spread: combination.spread(),
        };
        debug!("round {} court {}: {} ({:?})", round, court, info.combination, info.spread);
        games.push(build_game(players, round, court, candidate, Some(info)));
    }

    let ranks: Vec<RankAssignment> = order
        .iter()
        .enumerate()
        .map(|(pos, &i)| {
            let rank = (pos + 1) as u8;
            RankAssignment {
                name: players[i].name.clone(),
                rank,
                token: rank_token(rank),
            }
        })
        .collect();

    let settings = BracketSettings {
        mode: BracketMode::FixedTable,
        court_count,
        round_count: round,
        gender_targeting: false,
        skill_targeting: use_skill_ranking,
        gender_targets: None,
        manual_kinds: None,
    };
    let now = Utc::now();
    let schedule = assemble_schedule(
        players,
        session_id(BracketMode::FixedTable, players.len(), now),
        now,
        settings,
        games,
        ranks,
    );
    info!(
        "{}: {} fixed-table games over {} rounds",
        schedule.session_id,
        schedule.games.len(),
        round
    );
    Ok(schedule)
}
