use rand::seq::SliceRandom;
use rand::Rng;

use super::types::{GameKind, Gender, Player};

/// Fills a slot with one specific game kind. Each variant knows which gender
/// pools it draws from; unspecified players are eligible for every pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKindFiller {
    MaleOnly,
    FemaleOnly,
    Mixed,
}

impl GameKindFiller {
    pub fn for_kind(kind: GameKind) -> Self {
        match kind {
            GameKind::MaleOnly => GameKindFiller::MaleOnly,
            GameKind::FemaleOnly => GameKindFiller::FemaleOnly,
            GameKind::Mixed => GameKindFiller::Mixed,
        }
    }

    pub fn kind(self) -> GameKind {
        match self {
            GameKindFiller::MaleOnly => GameKind::MaleOnly,
            GameKindFiller::FemaleOnly => GameKind::FemaleOnly,
            GameKindFiller::Mixed => GameKind::Mixed,
        }
    }

    /// Whether a player can take part in a game of this kind at all.
    pub fn accepts(self, gender: Gender) -> bool {
        match self {
            GameKindFiller::MaleOnly => gender != Gender::Female,
            GameKindFiller::FemaleOnly => gender != Gender::Male,
            GameKindFiller::Mixed => true,
        }
    }

    /// Headcount check against the available players, before any search.
    pub fn can_fill(self, players: &[Player], available: &[usize]) -> bool {
        let male_side = available
            .iter()
            .filter(|&&i| players[i].gender != Gender::Female)
            .count();
        let female_side = available
            .iter()
            .filter(|&&i| players[i].gender != Gender::Male)
            .count();
        match self {
            GameKindFiller::MaleOnly => male_side >= 4,
            GameKindFiller::FemaleOnly => female_side >= 4,
            GameKindFiller::Mixed => male_side >= 2 && female_side >= 2 && available.len() >= 4,
        }
    }

    /// Least-played eligible players, at most `size` of them. Mixed games
    /// take up to half from definite males, half from definite females, and
    /// top up with unspecified players.
    pub fn sub_pool<R: Rng + ?Sized>(
        self,
        players: &[Player],
        available: &[usize],
        games_played: &[u32],
        size: usize,
        rng: &mut R,
    ) -> Vec<usize> {
        let eligible: Vec<usize> = available
            .iter()
            .copied()
            .filter(|&i| self.accepts(players[i].gender))
            .collect();
        let ranked = least_played_first(&eligible, games_played, rng);

        if self != GameKindFiller::Mixed {
            return ranked.into_iter().take(size).collect();
        }

        let half = (size / 2).max(2);
        let mut pool: Vec<usize> = Vec::with_capacity(size);
        pool.extend(
            ranked
                .iter()
                .copied()
                .filter(|&i| players[i].gender == Gender::Male)
                .take(half),
        );
        pool.extend(
            ranked
                .iter()
                .copied()
                .filter(|&i| players[i].gender == Gender::Female)
                .take(half),
        );
        let room = size.saturating_sub(pool.len());
        pool.extend(
            ranked
                .iter()
                .copied()
                .filter(|&i| players[i].gender == Gender::Unspecified)
                .take(room),
        );
        pool
    }
}

/// Shuffles, then stable-sorts by games played, so equally-played players
/// come out in random order.
pub fn least_played_first<R: Rng + ?Sized>(
    pool: &[usize],
    games_played: &[u32],
    rng: &mut R,
) -> Vec<usize> {
    let mut ranked = pool.to_vec();
    ranked.shuffle(rng);
    ranked.sort_by_key(|&i| games_played[i]);
    ranked
}
