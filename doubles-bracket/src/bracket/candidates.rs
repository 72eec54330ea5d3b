use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::SearchLimits;

use super::filler::{least_played_first, GameKindFiller};
use super::rules;
use super::tracker::QuartetKey;
use super::types::{GameKind, Player};

/// A legal grouping for one slot, as roster indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub team_a: [usize; 2],
    pub team_b: [usize; 2],
    pub kind: GameKind,
}

impl Candidate {
    pub fn members(&self) -> [usize; 4] {
        [self.team_a[0], self.team_a[1], self.team_b[0], self.team_b[1]]
    }

    pub fn quartet(&self) -> QuartetKey {
        QuartetKey::new(self.members())
    }

    pub fn teams<'a>(&self, players: &'a [Player]) -> ([&'a Player; 2], [&'a Player; 2]) {
        (
            [&players[self.team_a[0]], &players[self.team_a[1]]],
            [&players[self.team_b[0]], &players[self.team_b[1]]],
        )
    }
}

/// The three ways to split four players into two teams.
const SPLITS: [([usize; 2], [usize; 2]); 3] = [([0, 1], [2, 3]), ([0, 2], [1, 3]), ([0, 3], [1, 2])];

pub struct CandidateGenerator<'a> {
    players: &'a [Player],
    limits: &'a SearchLimits,
}

impl<'a> CandidateGenerator<'a> {
    pub fn new(players: &'a [Player], limits: &'a SearchLimits) -> Self {
        Self { players, limits }
    }

    /// Sub-pool size for a given retry; every retry widens the search.
    pub fn pool_size(&self, attempt: u32) -> usize {
        self.limits.sub_pool_size + self.limits.pool_growth * attempt as usize
    }

    /// Legal groupings drawn from the least-played available players.
    ///
    /// With a filler, only players it accepts are considered and only splits
    /// it admits are kept. Without one, any legal grouping is kept and its
    /// kind is derived from the genders involved. Returns an empty list when
    /// fewer than four eligible players remain.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        available: &[usize],
        games_played: &[u32],
        filler: Option<GameKindFiller>,
        attempt: u32,
        rng: &mut R,
    ) -> Vec<Candidate> {
        let size = self.pool_size(attempt).max(4);
        let pool = match filler {
            Some(f) => f.sub_pool(self.players, available, games_played, size, rng),
            None => {
                let mut ranked = least_played_first(available, games_played, rng);
                ranked.truncate(size);
                ranked
            }
        };
        if pool.len() < 4 {
            return Vec::new();
        }

        let mut candidates = Vec::new();
        let n = pool.len();
        for i in 0..n {
            for j in (i + 1)..n {
                for k in (j + 1)..n {
                    for l in (k + 1)..n {
                        let quartet = [pool[i], pool[j], pool[k], pool[l]];
                        for (a, b) in SPLITS {
                            let team_a = [quartet[a[0]], quartet[a[1]]];
                            let team_b = [quartet[b[0]], quartet[b[1]]];
                            if let Some(candidate) = self.evaluate(team_a, team_b, filler) {
                                candidates.push(candidate);
                            }
                        }
                    }
                }
            }
        }

        candidates.shuffle(rng);
        candidates.truncate(self.limits.max_candidates.max(1));
        candidates
    }

    fn evaluate(
        &self,
        team_a: [usize; 2],
        team_b: [usize; 2],
        filler: Option<GameKindFiller>,
    ) -> Option<Candidate> {
        let ta = [&self.players[team_a[0]], &self.players[team_a[1]]];
        let tb = [&self.players[team_b[0]], &self.players[team_b[1]]];
        let kind = match filler {
            Some(f) => {
                if !rules::is_legal_grouping(ta, tb) || !rules::admits(f.kind(), ta, tb) {
                    return None;
                }
                f.kind()
            }
            None => rules::derive_kind(ta, tb)?,
        };
        Some(Candidate {
            team_a,
            team_b,
            kind,
        })
    }
}
