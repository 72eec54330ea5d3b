pub mod assignment;
pub mod candidates;
pub mod filler;
pub mod fixed_table;
pub mod manual;
pub mod planner;
pub mod random;
pub mod recommend;
pub mod report;
pub mod rules;
pub mod scoring;
pub mod slot_utils;
pub mod tracker;
pub mod types;

use rand::rngs::StdRng;
use rand::SeedableRng;

pub use assignment::validate_players;
pub use fixed_table::generate_fixed_table_bracket;
pub use manual::{generate_manual_bracket, parse_kind_list};
pub use planner::{plan, plan_for_roster, validate_distribution, GenderCounts};
pub use random::{generate_random_bracket, RandomBracketOptions};
pub use recommend::{recommend, Recommendation, RecommendationFocus};
pub use report::{balance_report, rankings, record_score, BalanceReport, PlayerStanding};
pub use types::*;

/// Seeded generator when a seed is given, OS entropy otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
