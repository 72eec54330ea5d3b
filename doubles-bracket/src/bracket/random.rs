use chrono::Utc;
use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::BracketError;

use super::assignment::{check_dimensions, validate_players, Session};
use super::candidates::Candidate;
use super::planner::{kind_priority, plan_for_roster, validate_distribution};
use super::slot_utils::session_id;
use super::types::{BracketMode, BracketSettings, KindTargets, Player, Schedule};

/// Settings for a heuristic bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomBracketOptions {
    pub court_count: u32,
    pub round_count: u32,
    #[serde(default)]
    pub gender_targeting: bool,
    #[serde(default)]
    pub skill_targeting: bool,
    /// Explicit game counts per kind; only read when gender targeting is on
    #[serde(default)]
    pub distribution: Option<KindTargets>,
}

impl RandomBracketOptions {
    pub fn new(court_count: u32, round_count: u32) -> Self {
        Self {
            court_count,
            round_count,
            gender_targeting: false,
            skill_targeting: false,
            distribution: None,
        }
    }

    pub fn total_games(&self) -> u32 {
        self.court_count * self.round_count
    }
}

/// Generates a bracket with the round/court assignment loop.
///
/// Slots that cannot be filled are left out; the call only fails on invalid
/// requests.
pub fn generate_random_bracket<R: Rng + ?Sized>(
    players: &[Player],
    options: &RandomBracketOptions,
    config: &EngineConfig,
    rng: &mut R,
) -> Result<Schedule, BracketError> {
    check_dimensions(options.court_count, options.round_count)?;
    validate_players(players)?;

    let total = options.total_games();
    let targets = if options.gender_targeting {
        match options.distribution {
            Some(distribution) => {
                validate_distribution(&distribution, players, total)?;
                Some(distribution)
            }
            None => Some(plan_for_roster(players, total)),
        }
    } else {
        if options.distribution.is_some() {
            warn!("game distribution ignored because gender targeting is off");
        }
        None
    };

    let now = Utc::now();
    let mut session = Session::new(
        players,
        config,
        session_id(BracketMode::Random, players.len(), now),
        now,
    )
    .with_skill_targeting(options.skill_targeting)
    .with_targets(targets);

    for round in 1..=options.round_count {
        let mut available: Vec<usize> = (0..players.len()).collect();
        for court in 1..=options.court_count {
            if available.len() < 4 {
                debug!(
                    "round {} court {}: only {} players free, slot skipped",
                    round,
                    court,
                    available.len()
                );
                continue;
            }
            match fill_slot(&session, &available, rng) {
                Some(candidate) => {
                    if session.commit(round, court, candidate) {
                        let members = candidate.members();
                        available.retain(|i| !members.contains(i));
                    }
                }
                None => debug!("round {} court {}: no legal grouping, slot skipped", round, court),
            }
        }
    }

    if let Some(targets) = session.targets() {
        let committed = session.committed();
        if committed != targets {
            info!(
                "distribution reached {}/{}/{} of planned {}/{}/{} (male-only/female-only/mixed)",
                committed.male_only,
                committed.female_only,
                committed.mixed,
                targets.male_only,
                targets.female_only,
                targets.mixed
            );
        }
    }

    let settings = BracketSettings {
        mode: BracketMode::Random,
        court_count: options.court_count,
        round_count: options.round_count,
        gender_targeting: options.gender_targeting,
        skill_targeting: options.skill_targeting,
        gender_targets: targets,
        manual_kinds: None,
    };
    let schedule = session.into_schedule(settings);
    info!(
        "{}: {} of {} games for {} players",
        schedule.session_id,
        schedule.games.len(),
        total,
        players.len()
    );
    Ok(schedule)
}

/// Tries kinds in priority order when targeting, otherwise any legal grouping.
fn fill_slot<R: Rng + ?Sized>(session: &Session<'_>, available: &[usize], rng: &mut R) -> Option<Candidate> {
    let Some(targets) = session.targets() else {
        return session.search_slot(available, None, rng);
    };
    for filler in kind_priority(targets, session.committed()) {
        if !filler.can_fill(session.players(), available) {
            continue;
        }
        if let Some(candidate) = session.search_slot(available, Some(filler), rng) {
            return Some(candidate);
        }
        debug!("{} preferred but not fillable, falling back", filler.kind());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::types::{GameKind, Gender};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn roster(males: usize, females: usize) -> Vec<Player> {
        let mut players = Vec::new();
        for i in 0..males {
            players.push(Player::new(format!("M{}", i), Gender::Male, (i % 9 + 1) as u8));
        }
        for i in 0..females {
            players.push(Player::new(format!("F{}", i), Gender::Female, (i % 9 + 1) as u8));
        }
        players
    }

    #[test]
    fn rejects_zero_courts_and_rounds() {
        let players = roster(4, 4);
        let config = EngineConfig::default();
        let mut rng = StdRng::seed_from_u64(0);
        let err = generate_random_bracket(&players, &RandomBracketOptions::new(0, 2), &config, &mut rng);
        assert!(matches!(err, Err(BracketError::NoCourts)));
        let err = generate_random_bracket(&players, &RandomBracketOptions::new(2, 0), &config, &mut rng);
        assert!(matches!(err, Err(BracketError::NoRounds)));
    }

    #[test]
    fn too_few_players_gives_empty_schedule() {
        let players = roster(2, 1);
        let config = EngineConfig::default();
        let mut rng = StdRng::seed_from_u64(0);
        let schedule =
            generate_random_bracket(&players, &RandomBracketOptions::new(1, 3), &config, &mut rng).unwrap();
        assert!(schedule.games.is_empty());
        assert_eq!(schedule.skipped_slots(), 3);
    }

    #[test]
    fn round_never_books_a_player_twice() {
        let players = roster(5, 4);
        let config = EngineConfig::default();
        let mut rng = StdRng::seed_from_u64(21);
        let schedule =
            generate_random_bracket(&players, &RandomBracketOptions::new(2, 5), &config, &mut rng).unwrap();
        for round in 1..=5 {
            let mut seen = HashSet::new();
            for game in schedule.games_in_round(round) {
                for name in game.players() {
                    assert!(seen.insert(name.clone()), "{} twice in round {}", name, round);
                }
            }
        }
    }

    #[test]
    fn distribution_ignored_without_targeting() {
        let players = roster(8, 0);
        let config = EngineConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let options = RandomBracketOptions {
            distribution: Some(KindTargets::new(0, 0, 4)),
            ..RandomBracketOptions::new(2, 2)
        };
        let schedule = generate_random_bracket(&players, &options, &config, &mut rng).unwrap();
        assert_eq!(schedule.settings.gender_targets, None);
        assert!(schedule.games.iter().all(|g| g.kind == GameKind::MaleOnly));
    }

    #[test]
    fn invalid_override_is_rejected() {
        let players = roster(4, 4);
        let config = EngineConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let options = RandomBracketOptions {
            gender_targeting: true,
            distribution: Some(KindTargets::new(1, 1, 1)),
            ..RandomBracketOptions::new(2, 2)
        };
        let err = generate_random_bracket(&players, &options, &config, &mut rng);
        assert!(matches!(err, Err(BracketError::DistributionTotal { expected: 4, actual: 3 })));
    }

    #[test]
    fn override_is_followed_when_feasible() {
        let players = roster(8, 8);
        let config = EngineConfig::default();
        let mut rng = StdRng::seed_from_u64(8);
        let options = RandomBracketOptions {
            gender_targeting: true,
            distribution: Some(KindTargets::new(2, 2, 4)),
            ..RandomBracketOptions::new(2, 4)
        };
        let schedule = generate_random_bracket(&players, &options, &config, &mut rng).unwrap();
        assert_eq!(schedule.games.len(), 8);
        assert_eq!(schedule.kind_tally(), KindTargets::new(2, 2, 4));
        assert_eq!(schedule.settings.gender_targets, Some(KindTargets::new(2, 2, 4)));
    }
}
