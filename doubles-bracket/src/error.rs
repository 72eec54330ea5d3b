use thiserror::Error;

use crate::bracket::types::GameKind;

/// Rejected bracket requests. Unfillable slots are not errors; they are simply
/// left out of the schedule.
#[derive(Debug, Error)]
pub enum BracketError {
    #[error("court count must be at least 1")]
    NoCourts,

    #[error("round count must be at least 1")]
    NoRounds,

    #[error("fixed-table brackets support 5 to 10 players, got {0}")]
    UnsupportedFixedTableSize(usize),

    #[error("malformed fixed-table combination: {0}")]
    MalformedCombination(String),

    #[error("manual plan has {actual} game kinds but the bracket has {expected} slots")]
    ManualPlanLength { expected: usize, actual: usize },

    #[error("{kind} games need more players (eligible male: {males}, eligible female: {females})")]
    InfeasibleKind {
        kind: GameKind,
        males: usize,
        females: usize,
    },

    #[error("game distribution adds up to {actual} but the bracket has {expected} slots")]
    DistributionTotal { expected: u32, actual: u32 },

    #[error("duplicate player name: {0}")]
    DuplicatePlayer(String),

    #[error("player {name} has skill {skill}, expected 1-9")]
    SkillOutOfRange { name: String, skill: u8 },

    #[error("no game with id {0}")]
    UnknownGame(String),
}

/// Failures while reading rosters or engine configuration from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("roster row {row}: unknown gender '{value}'")]
    UnknownGender { row: usize, value: String },

    #[error("roster row {row}: invalid skill '{value}'")]
    InvalidSkill { row: usize, value: String },

    #[error("roster is missing the '{0}' column")]
    MissingColumn(&'static str),
}
