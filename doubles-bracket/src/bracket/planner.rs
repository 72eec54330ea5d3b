//! Gender distribution: how many games of each kind a session should hold,
//! and which kind the assignment loop should try first at any point.

use log::debug;

use crate::error::BracketError;

use super::filler::GameKindFiller;
use super::types::{GameKind, Gender, KindTargets, Player};

/// Share of the proportional same-gender allocation kept when both sides are large.
const SAME_GENDER_SHARE: f64 = 0.75;
/// Upper bound on games moved to mixed when one side is much smaller.
const MIXED_SHIFT_CAP: f64 = 0.35;

/// Head counts of a roster by gender.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenderCounts {
    pub males: usize,
    pub females: usize,
    pub unspecified: usize,
}

impl GenderCounts {
    pub fn from_roster(players: &[Player]) -> Self {
        let mut counts = Self::default();
        for p in players {
            match p.gender {
                Gender::Male => counts.males += 1,
                Gender::Female => counts.females += 1,
                Gender::Unspecified => counts.unspecified += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.males + self.females + self.unspecified
    }

    /// Players who can stand in on the male side of a game.
    pub fn male_side(&self) -> usize {
        self.males + self.unspecified
    }

    pub fn female_side(&self) -> usize {
        self.females + self.unspecified
    }

    /// (males, females) for planning, with unspecified players split evenly.
    /// An odd one out counts as male.
    pub fn planning_counts(&self) -> (usize, usize) {
        let to_male = (self.unspecified + 1) / 2;
        (self.males + to_male, self.females + self.unspecified - to_male)
    }
}

/// Whether the roster can field at least one game of `kind`.
pub fn kind_feasible(kind: GameKind, counts: &GenderCounts) -> bool {
    match kind {
        GameKind::MaleOnly => counts.male_side() >= 4,
        GameKind::FemaleOnly => counts.female_side() >= 4,
        GameKind::Mixed => counts.male_side() >= 2 && counts.female_side() >= 2 && counts.total() >= 4,
    }
}

/// Splits `total` games into male-only, female-only and mixed.
pub fn plan(males: usize, females: usize, total: u32) -> KindTargets {
    let targets = match (males >= 4, females >= 4) {
        (true, true) => {
            let everyone = (males + females) as f64;
            let share = |n: usize| (total as f64 * n as f64 / everyone * SAME_GENDER_SHARE).floor() as u32;
            let male_only = share(males);
            let female_only = share(females);
            KindTargets::new(male_only, female_only, total - male_only - female_only)
        }
        (true, false) => {
            let (same, mixed) = one_sided(males, females, total);
            KindTargets::new(same, 0, mixed)
        }
        (false, true) => {
            let (same, mixed) = one_sided(females, males, total);
            KindTargets::new(0, same, mixed)
        }
        (false, false) => KindTargets::new(0, 0, total),
    };
    debug!(
        "planned {} games for {}M/{}F: {} male-only, {} female-only, {} mixed",
        total, males, females, targets.male_only, targets.female_only, targets.mixed
    );
    targets
}

/// (same-gender, mixed) when only the `big` side can fill same-gender games.
fn one_sided(big: usize, small: usize, total: u32) -> (u32, u32) {
    if small < 2 {
        return (total, 0);
    }
    let mut same = (total as f64 * big as f64 / (big + small) as f64).round() as u32;
    same = same.min(total);
    let mut mixed = total - same;

    let gap = |same: u32, mixed: u32| {
        let big_avg = f64::from(4 * same + 2 * mixed) / big as f64;
        let small_avg = f64::from(2 * mixed) / small as f64;
        (big_avg - small_avg).abs()
    };

    let cap = (total as f64 * MIXED_SHIFT_CAP).floor() as u32;
    let mut moved = 0;
    while moved < cap && same > 0 && gap(same - 1, mixed + 1) < gap(same, mixed) {
        same -= 1;
        mixed += 1;
        moved += 1;
    }
    (same, mixed)
}

/// Plans a distribution from a roster's gender counts.
pub fn plan_for_roster(players: &[Player], total: u32) -> KindTargets {
    let (males, females) = GenderCounts::from_roster(players).planning_counts();
    plan(males, females, total)
}

/// Checks a caller-supplied distribution against the bracket size and the roster.
pub fn validate_distribution(
    targets: &KindTargets,
    players: &[Player],
    total: u32,
) -> Result<(), BracketError> {
    if targets.total() != total {
        return Err(BracketError::DistributionTotal {
            expected: total,
            actual: targets.total(),
        });
    }
    let counts = GenderCounts::from_roster(players);
    for kind in GameKind::FALLBACK_ORDER {
        if targets.get(kind) > 0 && !kind_feasible(kind, &counts) {
            return Err(BracketError::InfeasibleKind {
                kind,
                males: counts.male_side(),
                females: counts.female_side(),
            });
        }
    }
    Ok(())
}

/// Order in which kinds should be tried for the next slot.
///
/// Kinds still short of their target come first, most deficient (relative to
/// target) first. Everything else follows in the fallback order.
pub fn kind_priority(targets: &KindTargets, committed: &KindTargets) -> Vec<GameKindFiller> {
    let mut deficient: Vec<(f64, usize, GameKind)> = GameKind::FALLBACK_ORDER
        .iter()
        .enumerate()
        .filter_map(|(order, &kind)| {
            let target = targets.get(kind);
            let done = committed.get(kind);
            (target > done).then(|| (f64::from(target - done) / f64::from(target), order, kind))
        })
        .collect();
    deficient.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));

    let mut order: Vec<GameKind> = deficient.into_iter().map(|(_, _, kind)| kind).collect();
    for kind in GameKind::FALLBACK_ORDER {
        if !order.contains(&kind) {
            order.push(kind);
        }
    }
    order.into_iter().map(GameKindFiller::for_kind).collect()
}
