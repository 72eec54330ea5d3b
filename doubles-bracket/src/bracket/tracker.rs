use std::collections::{HashMap, HashSet};

/// Unordered pair of roster indices. The smaller index is always stored first,
/// so `PairKey::new(a, b) == PairKey::new(b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    low: usize,
    high: usize,
}

impl PairKey {
    pub fn new(a: usize, b: usize) -> Self {
        debug_assert_ne!(a, b, "a pair needs two different players");
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn members(&self) -> (usize, usize) {
        (self.low, self.high)
    }
}

/// The four roster indices of a game, sorted, regardless of the team split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuartetKey([usize; 4]);

impl QuartetKey {
    pub fn new(mut members: [usize; 4]) -> Self {
        members.sort_unstable();
        Self(members)
    }
}

/// Teammate and opponent counters for one bracket generation.
///
/// A tracker belongs to exactly one generation call; it is created at the
/// start and dropped with the result.
#[derive(Debug, Default)]
pub struct RepetitionTracker {
    session: String,
    teammates: HashMap<PairKey, u32>,
    opponents: HashMap<PairKey, u32>,
    quartets: HashSet<QuartetKey>,
}

impl RepetitionTracker {
    pub fn new(session: impl Into<String>) -> Self {
        Self {
            session: session.into(),
            ..Self::default()
        }
    }

    /// Clears every counter and relabels the tracker for a new session.
    pub fn reset(&mut self, session: impl Into<String>) {
        self.session = session.into();
        self.teammates.clear();
        self.opponents.clear();
        self.quartets.clear();
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    pub fn teammate_frequency(&self, a: usize, b: usize) -> u32 {
        self.teammates.get(&PairKey::new(a, b)).copied().unwrap_or(0)
    }

    pub fn opponent_frequency(&self, a: usize, b: usize) -> u32 {
        self.opponents.get(&PairKey::new(a, b)).copied().unwrap_or(0)
    }

    /// Teammate repeats of both teams' internal pairs.
    pub fn teammate_frequency_of_teams(&self, team_a: [usize; 2], team_b: [usize; 2]) -> u32 {
        self.teammate_frequency(team_a[0], team_a[1]) + self.teammate_frequency(team_b[0], team_b[1])
    }

    /// Sum of opponent counts over the four cross-team pairs.
    pub fn opponent_frequency_between_teams(&self, team_a: [usize; 2], team_b: [usize; 2]) -> u32 {
        team_a
            .iter()
            .flat_map(|&a| team_b.iter().map(move |&b| (a, b)))
            .map(|(a, b)| self.opponent_frequency(a, b))
            .sum()
    }

    pub fn quartet_seen(&self, members: [usize; 4]) -> bool {
        self.quartets.contains(&QuartetKey::new(members))
    }

    pub fn commit(&mut self, team_a: [usize; 2], team_b: [usize; 2]) {
        for team in [team_a, team_b] {
            *self.teammates.entry(PairKey::new(team[0], team[1])).or_insert(0) += 1;
        }
        for &a in &team_a {
            for &b in &team_b {
                *self.opponents.entry(PairKey::new(a, b)).or_insert(0) += 1;
            }
        }
        self.quartets
            .insert(QuartetKey::new([team_a[0], team_a[1], team_b[0], team_b[1]]));
    }
}
