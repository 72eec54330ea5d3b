use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_SKILL: u8 = 1;
pub const MAX_SKILL: u8 = 9;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unspecified,
}

/// A registered player. Names are unique within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    #[serde(default)]
    pub gender: Gender,
    pub skill: u8,
}

impl Player {
    pub fn new(name: impl Into<String>, gender: Gender, skill: u8) -> Self {
        Self {
            name: name.into(),
            gender,
            skill,
        }
    }
}

/// Gender composition of a doubles game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    MaleOnly,
    FemaleOnly,
    Mixed,
}

impl GameKind {
    /// Fallback order used when the preferred kind cannot be filled.
    pub const FALLBACK_ORDER: [GameKind; 3] =
        [GameKind::Mixed, GameKind::MaleOnly, GameKind::FemaleOnly];

    pub fn label(&self) -> &'static str {
        match self {
            GameKind::MaleOnly => "male-only",
            GameKind::FemaleOnly => "female-only",
            GameKind::Mixed => "mixed",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GameKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "male-only" | "male_only" | "mens" | "남복" => Ok(GameKind::MaleOnly),
            "female" | "female-only" | "female_only" | "womens" | "여복" => {
                Ok(GameKind::FemaleOnly)
            }
            "mixed" | "혼복" => Ok(GameKind::Mixed),
            other => Err(format!("unknown game kind '{}'", other)),
        }
    }
}

/// Game counts per kind. Used both for session targets and for tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindTargets {
    pub male_only: u32,
    pub female_only: u32,
    pub mixed: u32,
}

impl KindTargets {
    pub fn new(male_only: u32, female_only: u32, mixed: u32) -> Self {
        Self {
            male_only,
            female_only,
            mixed,
        }
    }

    pub fn total(&self) -> u32 {
        self.male_only + self.female_only + self.mixed
    }

    pub fn get(&self, kind: GameKind) -> u32 {
        match kind {
            GameKind::MaleOnly => self.male_only,
            GameKind::FemaleOnly => self.female_only,
            GameKind::Mixed => self.mixed,
        }
    }

    pub fn increment(&mut self, kind: GameKind) {
        match kind {
            GameKind::MaleOnly => self.male_only += 1,
            GameKind::FemaleOnly => self.female_only += 1,
            GameKind::Mixed => self.mixed += 1,
        }
    }
}

/// How far apart the two teams of a fixed-table game are, by average rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankSpread {
    Balanced,
    Even,
    Uneven,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedTableInfo {
    pub combination: String, // e.g. "14:23"
    pub spread: RankSpread,
}

/// One 2-vs-2 game on a court during a round. Teams reference players by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub round: u32,
    pub court: u32,
    pub team_a: [String; 2],
    pub team_b: [String; 2],
    pub kind: GameKind,
    pub score_a: Option<u32>,
    pub score_b: Option<u32>,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_table: Option<FixedTableInfo>,
}

impl Game {
    pub fn players(&self) -> impl Iterator<Item = &String> {
        self.team_a.iter().chain(self.team_b.iter())
    }

    pub fn involves(&self, name: &str) -> bool {
        self.players().any(|p| p == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketMode {
    Random,
    FixedTable,
    Manual,
}

impl BracketMode {
    pub fn label(&self) -> &'static str {
        match self {
            BracketMode::Random => "random",
            BracketMode::FixedTable => "fixed",
            BracketMode::Manual => "manual",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSettings {
    pub mode: BracketMode,
    pub court_count: u32,
    pub round_count: u32,
    pub gender_targeting: bool,
    pub skill_targeting: bool,
    pub gender_targets: Option<KindTargets>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_kinds: Option<Vec<GameKind>>,
}

/// Fixed-table rank given to a player; rank 10 is written as `A`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankAssignment {
    pub name: String,
    pub rank: u8,
    pub token: char,
}

/// A generated bracket for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub session_id: String,
    pub generated_at: DateTime<Utc>,
    pub settings: BracketSettings,
    pub games: Vec<Game>,
    pub games_played: BTreeMap<String, u32>, // player name -> games in this schedule
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ranks: Vec<RankAssignment>,
}

impl Schedule {
    /// Number of games actually placed for each kind.
    pub fn kind_tally(&self) -> KindTargets {
        let mut tally = KindTargets::default();
        for game in &self.games {
            tally.increment(game.kind);
        }
        tally
    }

    pub fn games_in_round(&self, round: u32) -> impl Iterator<Item = &Game> {
        self.games.iter().filter(move |g| g.round == round)
    }

    pub fn game(&self, id: &str) -> Option<&Game> {
        self.games.iter().find(|g| g.id == id)
    }

    pub fn game_mut(&mut self, id: &str) -> Option<&mut Game> {
        self.games.iter_mut().find(|g| g.id == id)
    }

    /// Slots that were requested but could not be filled.
    pub fn skipped_slots(&self) -> usize {
        let requested = (self.settings.court_count * self.settings.round_count) as usize;
        requested.saturating_sub(self.games.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_kind_parses_common_spellings() {
        assert_eq!("male".parse::<GameKind>().unwrap(), GameKind::MaleOnly);
        assert_eq!("Female-Only".parse::<GameKind>().unwrap(), GameKind::FemaleOnly);
        assert_eq!(" mixed ".parse::<GameKind>().unwrap(), GameKind::Mixed);
        assert_eq!("혼복".parse::<GameKind>().unwrap(), GameKind::Mixed);
        assert!("singles".parse::<GameKind>().is_err());
    }

    #[test]
    fn kind_targets_count_per_kind() {
        let mut t = KindTargets::new(1, 0, 2);
        t.increment(GameKind::FemaleOnly);
        t.increment(GameKind::Mixed);
        assert_eq!(t.get(GameKind::FemaleOnly), 1);
        assert_eq!(t.get(GameKind::Mixed), 3);
        assert_eq!(t.total(), 5);
    }

    #[test]
    fn player_gender_defaults_to_unspecified() {
        let p: Player = serde_json::from_str(r#"{"name": "Kim", "skill": 5}"#).unwrap();
        assert_eq!(p.gender, Gender::Unspecified);
    }
}
