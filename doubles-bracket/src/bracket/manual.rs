use chrono::Utc;
use log::{info, warn};
use rand::Rng;

use crate::config::EngineConfig;
use crate::error::BracketError;

use super::assignment::{check_dimensions, validate_players, Session};
use super::filler::GameKindFiller;
use super::planner::{kind_feasible, GenderCounts};
use super::slot_utils::{session_id, slot_index};
use super::types::{BracketMode, BracketSettings, GameKind, Player, Schedule};

/// Generates a bracket where the caller fixes the kind of every slot.
///
/// `kinds` lists one kind per slot in round-major order (round 1 court 1,
/// round 1 court 2, ...). Within a round, same-gender slots are filled before
/// mixed ones; each game keeps the court it was requested on.
pub fn generate_manual_bracket<R: Rng + ?Sized>(
    players: &[Player],
    court_count: u32,
    round_count: u32,
    kinds: &[GameKind],
    config: &EngineConfig,
    rng: &mut R,
) -> Result<Schedule, BracketError> {
    check_dimensions(court_count, round_count)?;
    validate_players(players)?;

    let expected = (court_count * round_count) as usize;
    if kinds.len() != expected {
        return Err(BracketError::ManualPlanLength {
            expected,
            actual: kinds.len(),
        });
    }

    let counts = GenderCounts::from_roster(players);
    for &kind in kinds {
        if !kind_feasible(kind, &counts) {
            return Err(BracketError::InfeasibleKind {
                kind,
                males: counts.male_side(),
                females: counts.female_side(),
            });
        }
    }

    let now = Utc::now();
    let mut session = Session::new(
        players,
        config,
        session_id(BracketMode::Manual, players.len(), now),
        now,
    );

    for round in 1..=round_count {
        let mut available: Vec<usize> = (0..players.len()).collect();
        let mut courts: Vec<u32> = (1..=court_count).collect();
        courts.sort_by_key(|&c| kinds[slot_index(round, c, court_count)] == GameKind::Mixed);

        for court in courts {
            let filler = GameKindFiller::for_kind(kinds[slot_index(round, court, court_count)]);
            if !filler.can_fill(players, &available) {
                warn!(
                    "round {} court {}: not enough free players for {}, slot skipped",
                    round,
                    court,
                    filler.kind()
                );
                continue;
            }
            match session.search_slot(&available, Some(filler), rng) {
                Some(candidate) => {
                    if session.commit(round, court, candidate) {
                        let members = candidate.members();
                        available.retain(|i| !members.contains(i));
                    }
                }
                None => warn!(
                    "round {} court {}: no legal {} grouping, slot skipped",
                    round,
                    court,
                    filler.kind()
                ),
            }
        }
    }

    let settings = BracketSettings {
        mode: BracketMode::Manual,
        court_count,
        round_count,
        gender_targeting: false,
        skill_targeting: false,
        gender_targets: None,
        manual_kinds: Some(kinds.to_vec()),
    };
    let schedule = session.into_schedule(settings);
    info!(
        "{}: {} of {} requested games placed",
        schedule.session_id,
        schedule.games.len(),
        expected
    );
    Ok(schedule)
}

/// Parses a comma-separated list of game kinds, e.g. `mixed,mixed,male,female`.
pub fn parse_kind_list(raw: &str) -> Result<Vec<GameKind>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<GameKind>())
        .collect()
}
