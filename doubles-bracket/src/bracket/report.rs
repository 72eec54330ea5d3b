use std::collections::HashMap;

use serde::Serialize;

use crate::error::BracketError;

use super::types::{Game, Schedule};

/// Distance from the average beyond which a player counts as over or under.
const BALANCE_THRESHOLD: f64 = 0.5;

/// Stores a final score and marks the game completed.
pub fn record_score<'s>(
    schedule: &'s mut Schedule,
    game_id: &str,
    score_a: u32,
    score_b: u32,
) -> Result<&'s Game, BracketError> {
    let game = schedule
        .game_mut(game_id)
        .ok_or_else(|| BracketError::UnknownGame(game_id.to_string()))?;
    game.score_a = Some(score_a);
    game.score_b = Some(score_b);
    game.completed = true;
    Ok(&*game)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerStanding {
    pub name: String,
    pub wins: u32,
    pub games_won: u32,
    pub games_lost: u32,
}

impl PlayerStanding {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            wins: 0,
            games_won: 0,
            games_lost: 0,
        }
    }

    pub fn differential(&self) -> i64 {
        i64::from(self.games_won) - i64::from(self.games_lost)
    }
}

/// Standings over completed games: most wins first, then best game differential.
/// Players with equal records stay in name order.
pub fn rankings(schedule: &Schedule) -> Vec<PlayerStanding> {
    // games_played is keyed by every roster name
    let mut standings: Vec<PlayerStanding> = schedule
        .games_played
        .keys()
        .map(|name| PlayerStanding::new(name))
        .collect();
    let index: HashMap<String, usize> = standings
        .iter()
        .enumerate()
        .map(|(i, s)| (s.name.clone(), i))
        .collect();

    for game in schedule.games.iter().filter(|g| g.completed) {
        let (Some(a), Some(b)) = (game.score_a, game.score_b) else {
            continue;
        };
        for (team, own, other) in [(&game.team_a, a, b), (&game.team_b, b, a)] {
            for name in team {
                let Some(&i) = index.get(name) else {
                    continue;
                };
                let standing = &mut standings[i];
                standing.games_won += own;
                standing.games_lost += other;
                if own > other {
                    standing.wins += 1;
                }
            }
        }
    }

    standings.sort_by(|x, y| {
        y.wins
            .cmp(&x.wins)
            .then_with(|| y.differential().cmp(&x.differential()))
    });
    standings
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerBalance {
    pub name: String,
    pub games: u32,
    pub diff: f64,
}

/// Games played per player against the session average.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceReport {
    pub average: f64,
    pub total_games: usize,
    pub players: Vec<PlayerBalance>,
    pub over_average: Vec<PlayerBalance>,
    pub under_average: Vec<PlayerBalance>,
}

impl BalanceReport {
    pub fn spread(&self) -> u32 {
        let max = self.players.iter().map(|p| p.games).max().unwrap_or(0);
        let min = self.players.iter().map(|p| p.games).min().unwrap_or(0);
        max - min
    }
}

pub fn balance_report(schedule: &Schedule) -> BalanceReport {
    let roster_size = schedule.games_played.len();
    let total_games = schedule.games.len();
    let average = if roster_size == 0 {
        0.0
    } else {
        (total_games * 4) as f64 / roster_size as f64
    };

    let players: Vec<PlayerBalance> = schedule
        .games_played
        .iter()
        .map(|(name, &games)| PlayerBalance {
            name: name.clone(),
            games,
            diff: f64::from(games) - average,
        })
        .collect();
    let over_average = players
        .iter()
        .filter(|p| p.diff > BALANCE_THRESHOLD)
        .cloned()
        .collect();
    let under_average = players
        .iter()
        .filter(|p| p.diff < -BALANCE_THRESHOLD)
        .cloned()
        .collect();

    BalanceReport {
        average,
        total_games,
        players,
        over_average,
        under_average,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::assignment::assemble_schedule;
    use crate::bracket::types::{BracketMode, BracketSettings, GameKind, Gender, Player};
    use chrono::Utc;

    fn game(round: u32, a: [&str; 2], b: [&str; 2]) -> Game {
        Game {
            id: format!("T{}-C1", round),
            round,
            court: 1,
            team_a: [a[0].to_string(), a[1].to_string()],
            team_b: [b[0].to_string(), b[1].to_string()],
            kind: GameKind::MaleOnly,
            score_a: None,
            score_b: None,
            completed: false,
            fixed_table: None,
        }
    }

    fn schedule() -> Schedule {
        let players: Vec<Player> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|n| Player::new(*n, Gender::Male, 5))
            .collect();
        let settings = BracketSettings {
            mode: BracketMode::Random,
            court_count: 1,
            round_count: 3,
            gender_targeting: false,
            skill_targeting: false,
            gender_targets: None,
            manual_kinds: None,
        };
        let games = vec![
            game(1, ["a", "b"], ["c", "d"]),
            game(2, ["a", "c"], ["b", "e"]),
            game(3, ["a", "d"], ["c", "e"]),
        ];
        assemble_schedule(&players, "test".into(), Utc::now(), settings, games, Vec::new())
    }

    #[test]
    fn recording_marks_game_completed() {
        let mut s = schedule();
        let game = record_score(&mut s, "T2-C1", 6, 4).unwrap();
        assert!(game.completed);
        assert_eq!((game.score_a, game.score_b), (Some(6), Some(4)));
        assert!(matches!(
            record_score(&mut s, "T9-C1", 1, 0),
            Err(BracketError::UnknownGame(id)) if id == "T9-C1"
        ));
    }

    #[test]
    fn rankings_order_by_wins_then_differential() {
        let mut s = schedule();
        record_score(&mut s, "T1-C1", 6, 2).unwrap(); // a b win
        record_score(&mut s, "T2-C1", 3, 6).unwrap(); // b e win
        let table = rankings(&s);

        assert_eq!(table[0].name, "b");
        assert_eq!(table[0].wins, 2);
        assert_eq!(table[0].differential(), 7);
        // a and e both have one win; e's differential is +3, a's is +1
        assert_eq!(table[1].name, "e");
        assert_eq!(table[2].name, "a");
        assert_eq!(table[2].games_won, 9);
        assert_eq!(table[2].games_lost, 8);
    }

    #[test]
    fn unfinished_games_do_not_count() {
        let s = schedule();
        assert!(rankings(&s).iter().all(|p| p.wins == 0 && p.games_won == 0));
    }

    #[test]
    fn balance_flags_players_far_from_average() {
        let report = balance_report(&schedule());
        // 3 games * 4 seats / 5 players
        assert!((report.average - 2.4).abs() < 1e-9);
        assert_eq!(report.spread(), 1);
        let over: Vec<&str> = report.over_average.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(over, vec!["a", "c"]);
        assert!(report.under_average.is_empty());
    }
}
