//! Suggested game distributions for a roster and bracket size.

use serde::Serialize;

use crate::error::BracketError;

use super::assignment::check_dimensions;
use super::types::KindTargets;

/// Penalty per court that does not follow a strategy's focus.
const FOCUS_WEIGHT: u32 = 100;
/// Penalty per game away from a one-third mixed share.
const MIXED_SHARE_WEIGHT: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationFocus {
    BalanceFirst,
    SameGenderFocus,
    MixedFocus,
}

impl RecommendationFocus {
    pub fn label(&self) -> &'static str {
        match self {
            RecommendationFocus::BalanceFirst => "balance first",
            RecommendationFocus::SameGenderFocus => "same-gender focus",
            RecommendationFocus::MixedFocus => "mixed focus",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub focus: RecommendationFocus,
    pub targets: KindTargets,
    /// Simulated max-min games per player, when a simulation was run
    pub games_spread: Option<u32>,
}

/// Kinds played on each court in every round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RoundMix {
    mixed: u32,
    male_only: u32,
    female_only: u32,
}

/// Distinct distribution suggestions, balance-first one first.
pub fn recommend(
    males: usize,
    females: usize,
    court_count: u32,
    round_count: u32,
) -> Result<Vec<Recommendation>, BracketError> {
    check_dimensions(court_count, round_count)?;
    let mut out: Vec<Recommendation> = Vec::new();

    if let Some(targets) = balance_first(males, females, court_count * round_count) {
        out.push(Recommendation {
            focus: RecommendationFocus::BalanceFirst,
            targets,
            games_spread: None,
        });
    }

    let mixes = round_mixes(males, females, court_count);
    let simulated: Vec<(RoundMix, u32)> = mixes
        .into_iter()
        .map(|mix| (mix, simulate_spread(males, females, mix, round_count)))
        .collect();

    let same_gender = best_mix(&simulated, |m| court_count - (m.male_only + m.female_only));
    let mixed = best_mix(&simulated, |m| court_count - m.mixed);
    for (focus, pick) in [
        (RecommendationFocus::SameGenderFocus, same_gender),
        (RecommendationFocus::MixedFocus, mixed),
    ] {
        if let Some((mix, spread)) = pick {
            out.push(Recommendation {
                focus,
                targets: KindTargets::new(
                    mix.male_only * round_count,
                    mix.female_only * round_count,
                    mix.mixed * round_count,
                ),
                games_spread: Some(spread),
            });
        }
    }

    let mut unique: Vec<Recommendation> = Vec::with_capacity(out.len());
    for rec in out {
        if !unique.iter().any(|u| u.targets == rec.targets) {
            unique.push(rec);
        }
    }
    Ok(unique)
}

/// Lowest `off_focus * FOCUS_WEIGHT + spread`; the first mix wins ties.
fn best_mix(simulated: &[(RoundMix, u32)], off_focus: impl Fn(&RoundMix) -> u32) -> Option<(RoundMix, u32)> {
    let mut best: Option<(u32, RoundMix, u32)> = None;
    for &(mix, spread) in simulated {
        let score = off_focus(&mix) * FOCUS_WEIGHT + spread;
        if best.map_or(true, |(s, _, _)| score < s) {
            best = Some((score, mix, spread));
        }
    }
    best.map(|(_, mix, spread)| (mix, spread))
}

/// Exhaustive search for the distribution whose per-gender appearances are
/// closest to an even share, with about a third of the games mixed.
fn balance_first(males: usize, females: usize, total: u32) -> Option<KindTargets> {
    let players = males + females;
    if players == 0 {
        return None;
    }
    let per_player = f64::from(total * 4) / players as f64;
    let male_target = males as f64 * per_player;
    let female_target = females as f64 * per_player;
    let mixed_target = (f64::from(total) / 3.0).round();

    let mut best: Vec<KindTargets> = Vec::new();
    let mut best_error = f64::INFINITY;
    for mixed in 0..=total {
        for male_only in 0..=(total - mixed) {
            let female_only = total - mixed - male_only;
            if (male_only > 0 && males < 4)
                || (female_only > 0 && females < 4)
                || (mixed > 0 && (males < 2 || females < 2))
            {
                continue;
            }
            let male_games = f64::from(mixed * 2 + male_only * 4);
            let female_games = f64::from(mixed * 2 + female_only * 4);
            let error = (male_games - male_target).abs()
                + (female_games - female_target).abs()
                + MIXED_SHARE_WEIGHT * (f64::from(mixed) - mixed_target).abs();

            let candidate = KindTargets::new(male_only, female_only, mixed);
            if (error - best_error).abs() < 1e-3 {
                best.push(candidate);
            } else if error < best_error {
                best_error = error;
                best = vec![candidate];
            }
        }
    }

    // prefer distributions that use more kinds
    let kinds_used = |t: &KindTargets| [t.male_only, t.female_only, t.mixed].iter().filter(|&&n| n > 0).count();
    best.sort_by_key(|t| std::cmp::Reverse(kinds_used(t)));
    best.into_iter().next()
}

/// Every split of the courts into kinds that each gender can staff in one round.
fn round_mixes(males: usize, females: usize, court_count: u32) -> Vec<RoundMix> {
    let cap = |n: usize| u32::try_from(n).unwrap_or(u32::MAX).min(court_count);
    let max_mixed = cap((males / 2).min(females / 2));
    let max_male_only = cap(males / 4);
    let max_female_only = cap(females / 4);

    let mut mixes = Vec::new();
    for mixed in 0..=court_count {
        for male_only in 0..=(court_count - mixed) {
            let female_only = court_count - mixed - male_only;
            if mixed <= max_mixed && male_only <= max_male_only && female_only <= max_female_only {
                mixes.push(RoundMix {
                    mixed,
                    male_only,
                    female_only,
                });
            }
        }
    }
    mixes
}

#[derive(Debug, Clone, Copy)]
struct SimPlayer {
    male: bool,
    games: u32,
    rests: u32,
}

/// Plays `round_count` rounds of a mix with players who rested last round
/// going first, then the least played, and returns the max-min games spread.
fn simulate_spread(males: usize, females: usize, mix: RoundMix, round_count: u32) -> u32 {
    let mut players: Vec<SimPlayer> = (0..males + females)
        .map(|i| SimPlayer {
            male: i < males,
            games: 0,
            rests: 0,
        })
        .collect();

    for _ in 0..round_count {
        let mut order: Vec<usize> = (0..players.len()).collect();
        order.sort_by_key(|&i| (players[i].rests == 0, players[i].games));
        let mut free_males: Vec<usize> = order.iter().copied().filter(|&i| players[i].male).collect();
        let mut free_females: Vec<usize> = order.iter().copied().filter(|&i| !players[i].male).collect();

        let mut playing: Vec<usize> = Vec::new();
        for _ in 0..mix.mixed {
            if free_males.len() >= 2 && free_females.len() >= 2 {
                playing.extend(free_males.drain(..2));
                playing.extend(free_females.drain(..2));
            }
        }
        for _ in 0..mix.male_only {
            if free_males.len() >= 4 {
                playing.extend(free_males.drain(..4));
            }
        }
        for _ in 0..mix.female_only {
            if free_females.len() >= 4 {
                playing.extend(free_females.drain(..4));
            }
        }

        for (i, p) in players.iter_mut().enumerate() {
            if playing.contains(&i) {
                p.games += 1;
                p.rests = 0;
            } else {
                p.rests += 1;
            }
        }
    }

    let max = players.iter().map(|p| p.games).max().unwrap_or(0);
    let min = players.iter().map(|p| p.games).min().unwrap_or(0);
    max - min
}
