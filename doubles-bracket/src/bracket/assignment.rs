//! State shared by the heuristic generators while they fill a bracket slot by slot.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use log::{debug, error};
use rand::Rng;

use crate::config::EngineConfig;
use crate::error::BracketError;

use super::candidates::{Candidate, CandidateGenerator};
use super::filler::GameKindFiller;
use super::rules;
use super::scoring::{pick_best, GenderProgress, ScoringContext};
use super::slot_utils::game_id;
use super::tracker::RepetitionTracker;
use super::types::{
    BracketSettings, FixedTableInfo, Game, KindTargets, Player, RankAssignment, Schedule, MAX_SKILL,
    MIN_SKILL,
};

/// Rejects rosters with repeated names or skills outside 1-9.
pub fn validate_players(players: &[Player]) -> Result<(), BracketError> {
    let mut seen = HashSet::new();
    for p in players {
        if !seen.insert(p.name.as_str()) {
            return Err(BracketError::DuplicatePlayer(p.name.clone()));
        }
        if !(MIN_SKILL..=MAX_SKILL).contains(&p.skill) {
            return Err(BracketError::SkillOutOfRange {
                name: p.name.clone(),
                skill: p.skill,
            });
        }
    }
    Ok(())
}

pub fn check_dimensions(court_count: u32, round_count: u32) -> Result<(), BracketError> {
    if court_count == 0 {
        return Err(BracketError::NoCourts);
    }
    if round_count == 0 {
        return Err(BracketError::NoRounds);
    }
    Ok(())
}

/// One generation in progress. Owns its tracker and games-played ledger and
/// is consumed into a [`Schedule`].
pub struct Session<'a> {
    players: &'a [Player],
    config: &'a EngineConfig,
    skill_targeting: bool,
    targets: Option<KindTargets>,
    tracker: RepetitionTracker,
    games_played: Vec<u32>,
    committed: KindTargets,
    games: Vec<Game>,
    generated_at: DateTime<Utc>,
}

impl<'a> Session<'a> {
    pub fn new(
        players: &'a [Player],
        config: &'a EngineConfig,
        session_id: String,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            players,
            config,
            skill_targeting: false,
            targets: None,
            tracker: RepetitionTracker::new(session_id),
            games_played: vec![0; players.len()],
            committed: KindTargets::default(),
            games: Vec::new(),
            generated_at,
        }
    }

    pub fn with_skill_targeting(mut self, on: bool) -> Self {
        self.skill_targeting = on;
        self
    }

    /// Turns on the gender bonus and kind priority for these targets.
    pub fn with_targets(mut self, targets: Option<KindTargets>) -> Self {
        self.targets = targets;
        self
    }

    pub fn players(&self) -> &'a [Player] {
        self.players
    }

    pub fn targets(&self) -> Option<&KindTargets> {
        self.targets.as_ref()
    }

    pub fn committed(&self) -> &KindTargets {
        &self.committed
    }

    pub fn session_id(&self) -> &str {
        self.tracker.session()
    }

    /// Best grouping for one slot from the available players.
    ///
    /// Each attempt widens and reshuffles the sub-pool. A grouping whose four
    /// players have already met is only returned when no attempt found a
    /// fresh one.
    pub fn search_slot<R: Rng + ?Sized>(
        &self,
        available: &[usize],
        filler: Option<GameKindFiller>,
        rng: &mut R,
    ) -> Option<Candidate> {
        let generator = CandidateGenerator::new(self.players, &self.config.search);
        let context = ScoringContext {
            players: self.players,
            tracker: &self.tracker,
            games_played: &self.games_played,
            weights: &self.config.scoring,
            skill_targeting: self.skill_targeting,
            gender: self.targets.as_ref().map(|targets| GenderProgress {
                targets,
                committed: &self.committed,
            }),
        };

        let mut fallback = None;
        for attempt in 0..self.config.search.attempt_budget.max(1) {
            let candidates = generator.generate(available, &self.games_played, filler, attempt, rng);
            if candidates.is_empty() {
                continue;
            }
            let (fresh, seen): (Vec<Candidate>, Vec<Candidate>) = candidates
                .into_iter()
                .partition(|c| !self.tracker.quartet_seen(c.members()));

            if let Some(i) = pick_best(&context, &fresh, rng) {
                return Some(fresh[i]);
            }
            if fallback.is_none() {
                fallback = pick_best(&context, &seen, rng).map(|i| seen[i]);
            }
            debug!("attempt {}: only repeated quartets, widening pool", attempt + 1);
        }
        fallback
    }

    /// Records a game. Returns false, and records nothing, if the grouping
    /// is not a legal game of its kind.
    pub fn commit(&mut self, round: u32, court: u32, candidate: Candidate) -> bool {
        let (team_a, team_b) = candidate.teams(self.players);
        let legal = rules::is_legal_grouping(team_a, team_b) && rules::admits(candidate.kind, team_a, team_b);
        debug_assert!(legal, "illegal grouping reached commit: {:?}", candidate);
        if !legal {
            error!(
                "refusing illegal {} grouping on round {} court {}",
                candidate.kind, round, court
            );
            return false;
        }

        self.tracker.commit(candidate.team_a, candidate.team_b);
        for i in candidate.members() {
            self.games_played[i] += 1;
        }
        self.committed.increment(candidate.kind);
        debug!(
            "round {} court {}: {} & {} vs {} & {} ({})",
            round,
            court,
            team_a[0].name,
            team_a[1].name,
            team_b[0].name,
            team_b[1].name,
            candidate.kind
        );
        self.games.push(build_game(self.players, round, court, candidate, None));
        true
    }

    pub fn into_schedule(self, settings: BracketSettings) -> Schedule {
        let session_id = self.tracker.session().to_string();
        assemble_schedule(
            self.players,
            session_id,
            self.generated_at,
            settings,
            self.games,
            Vec::new(),
        )
    }
}

pub(crate) fn build_game(
    players: &[Player],
    round: u32,
    court: u32,
    candidate: Candidate,
    fixed_table: Option<FixedTableInfo>,
) -> Game {
    let name = |i: usize| players[i].name.clone();
    Game {
        id: game_id(round, court),
        round,
        court,
        team_a: [name(candidate.team_a[0]), name(candidate.team_a[1])],
        team_b: [name(candidate.team_b[0]), name(candidate.team_b[1])],
        kind: candidate.kind,
        score_a: None,
        score_b: None,
        completed: false,
        fixed_table,
    }
}

/// Orders the games by slot and derives the games-played ledger from them.
pub(crate) fn assemble_schedule(
    players: &[Player],
    session_id: String,
    generated_at: DateTime<Utc>,
    settings: BracketSettings,
    mut games: Vec<Game>,
    ranks: Vec<RankAssignment>,
) -> Schedule {
    games.sort_by_key(|g| (g.round, g.court));
    let mut games_played: BTreeMap<String, u32> =
        players.iter().map(|p| (p.name.clone(), 0)).collect();
    for game in &games {
        for name in game.players() {
            *games_played.entry(name.clone()).or_insert(0) += 1;
        }
    }
    Schedule {
        session_id,
        generated_at,
        settings,
        games,
        games_played,
        ranks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::types::{BracketMode, GameKind, Gender};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn males(n: usize) -> Vec<Player> {
        (0..n)
            .map(|i| Player::new(format!("M{}", i), Gender::Male, 5))
            .collect()
    }

    fn settings() -> BracketSettings {
        BracketSettings {
            mode: BracketMode::Random,
            court_count: 1,
            round_count: 1,
            gender_targeting: false,
            skill_targeting: false,
            gender_targets: None,
            manual_kinds: None,
        }
    }

    #[test]
    fn validate_players_catches_duplicates_and_skill() {
        let mut players = males(3);
        assert!(validate_players(&players).is_ok());
        players.push(Player::new("M1", Gender::Female, 4));
        assert!(matches!(validate_players(&players), Err(BracketError::DuplicatePlayer(n)) if n == "M1"));

        let players = vec![Player::new("Lee", Gender::Male, 0)];
        assert!(matches!(
            validate_players(&players),
            Err(BracketError::SkillOutOfRange { skill: 0, .. })
        ));
    }

    #[test]
    fn dimensions_must_be_positive() {
        assert!(matches!(check_dimensions(0, 3), Err(BracketError::NoCourts)));
        assert!(matches!(check_dimensions(2, 0), Err(BracketError::NoRounds)));
        assert!(check_dimensions(1, 1).is_ok());
    }

    #[test]
    fn search_prefers_unseen_quartets() {
        let players = males(5);
        let config = EngineConfig::default();
        let mut session = Session::new(&players, &config, "t".into(), Utc::now());
        let mut rng = StdRng::seed_from_u64(4);

        let first = session.search_slot(&[0, 1, 2, 3, 4], None, &mut rng).unwrap();
        assert!(session.commit(1, 1, first));
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let next = session.search_slot(&[0, 1, 2, 3, 4], None, &mut rng).unwrap();
            assert_ne!(next.quartet(), first.quartet());
        }
    }

    #[test]
    fn seen_quartet_is_the_fallback() {
        let players = males(4);
        let config = EngineConfig::default();
        let mut session = Session::new(&players, &config, "t".into(), Utc::now());
        let mut rng = StdRng::seed_from_u64(1);
        let all = [0, 1, 2, 3];

        let first = session.search_slot(&all, None, &mut rng).unwrap();
        assert!(session.commit(1, 1, first));
        let second = session.search_slot(&all, None, &mut rng).unwrap();
        assert_eq!(second.quartet(), first.quartet());
        // a fresh split is preferred over repeating teammates
        let mut a = first.team_a;
        let mut b = second.team_a;
        a.sort_unstable();
        b.sort_unstable();
        assert_ne!(a, b);
    }

    #[test]
    fn commit_rejects_illegal_grouping_in_release() {
        if cfg!(debug_assertions) {
            return;
        }
        let players = vec![
            Player::new("M0", Gender::Male, 5),
            Player::new("M1", Gender::Male, 5),
            Player::new("F0", Gender::Female, 5),
            Player::new("M2", Gender::Male, 5),
        ];
        let config = EngineConfig::default();
        let mut session = Session::new(&players, &config, "t".into(), Utc::now());
        let bad = Candidate {
            team_a: [0, 1],
            team_b: [2, 3],
            kind: GameKind::Mixed,
        };
        assert!(!session.commit(1, 1, bad));
        assert!(session.into_schedule(settings()).games.is_empty());
    }

    #[test]
    fn schedule_ledger_matches_games() {
        let players = males(6);
        let config = EngineConfig::default();
        let mut session = Session::new(&players, &config, "t".into(), Utc::now());
        let game = |a, b| Candidate {
            team_a: a,
            team_b: b,
            kind: GameKind::MaleOnly,
        };
        assert!(session.commit(2, 1, game([0, 1], [2, 3])));
        assert!(session.commit(1, 1, game([2, 4], [3, 5])));
        let schedule = session.into_schedule(settings());

        assert_eq!(schedule.games[0].id, "T1-C1");
        assert_eq!(schedule.games[1].id, "T2-C1");
        assert_eq!(schedule.games_played["M2"], 2);
        assert_eq!(schedule.games_played["M0"], 1);
        assert_eq!(schedule.games_played.values().sum::<u32>(), 8);
    }
}
