use rand::Rng;

use crate::config::ScoringWeights;

use super::candidates::Candidate;
use super::tracker::RepetitionTracker;
use super::types::{KindTargets, Player};

/// Scores closer than this are treated as ties.
pub const SCORE_EPSILON: f64 = 1e-9;

/// Session targets and the games already placed per kind.
#[derive(Debug, Clone, Copy)]
pub struct GenderProgress<'a> {
    pub targets: &'a KindTargets,
    pub committed: &'a KindTargets,
}

/// Everything the scoring function reads. Higher scores are better.
pub struct ScoringContext<'a> {
    pub players: &'a [Player],
    pub tracker: &'a RepetitionTracker,
    pub games_played: &'a [u32],
    pub weights: &'a ScoringWeights,
    pub skill_targeting: bool,
    pub gender: Option<GenderProgress<'a>>,
}

impl ScoringContext<'_> {
    pub fn score(&self, candidate: &Candidate) -> f64 {
        let w = self.weights;
        let mut score = 0.0;

        let teammate = self
            .tracker
            .teammate_frequency_of_teams(candidate.team_a, candidate.team_b);
        score -= w.teammate_repeat * teammate as f64;

        let opponent = self
            .tracker
            .opponent_frequency_between_teams(candidate.team_a, candidate.team_b);
        score -= w.opponent_repeat * opponent as f64;

        score -= w.games_imbalance * self.games_spread_after(candidate) as f64;

        if self.skill_targeting {
            score -= w.skill_gap * self.skill_gap(candidate) as f64;
        }

        if let Some(progress) = self.gender {
            if progress.committed.get(candidate.kind) < progress.targets.get(candidate.kind) {
                score += w.gender_bonus;
            }
        }

        score
    }

    /// Highest count among the four players minus the lowest count on the
    /// roster, as if this game were already committed.
    pub fn games_spread_after(&self, candidate: &Candidate) -> u32 {
        let members = candidate.members();
        let after = |i: usize| self.games_played[i] + u32::from(members.contains(&i));
        let max_involved = members.iter().map(|&i| after(i)).max().unwrap_or(0);
        let roster_min = (0..self.games_played.len()).map(after).min().unwrap_or(0);
        max_involved.saturating_sub(roster_min)
    }

    pub fn skill_gap(&self, candidate: &Candidate) -> u32 {
        let sum = |team: [usize; 2]| -> i32 {
            team.iter().map(|&i| i32::from(self.players[i].skill)).sum()
        };
        (sum(candidate.team_a) - sum(candidate.team_b)).unsigned_abs()
    }
}

/// Index of the best-scoring candidate. Ties are broken uniformly at random.
pub fn pick_best<R: Rng + ?Sized>(
    context: &ScoringContext<'_>,
    candidates: &[Candidate],
    rng: &mut R,
) -> Option<usize> {
    let scores: Vec<f64> = candidates.iter().map(|c| context.score(c)).collect();
    let best = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let tied: Vec<usize> = scores
        .iter()
        .enumerate()
        .filter(|&(_, &s)| (best - s).abs() <= SCORE_EPSILON)
        .map(|(i, _)| i)
        .collect();
    if tied.is_empty() {
        return None;
    }
    Some(tied[rng.gen_range(0..tied.len())])
}
