#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use doubles_bracket::bracket::rules::is_legal_grouping;
use doubles_bracket::bracket::types::{Gender, Player, Schedule};

pub fn roster(males: usize, females: usize, unspecified: usize) -> Vec<Player> {
    let mut players = Vec::new();
    for i in 0..males {
        players.push(Player::new(format!("M{}", i), Gender::Male, (i % 9 + 1) as u8));
    }
    for i in 0..females {
        players.push(Player::new(format!("F{}", i), Gender::Female, (8 - i % 9) as u8));
    }
    for i in 0..unspecified {
        players.push(Player::new(format!("U{}", i), Gender::Unspecified, 5));
    }
    players
}

/// Panics if any player appears twice in a round.
pub fn assert_no_double_booking(schedule: &Schedule) {
    for round in 1..=schedule.settings.round_count {
        let mut seen = HashSet::new();
        for game in schedule.games_in_round(round) {
            for name in game.players() {
                assert!(seen.insert(name.clone()), "{} twice in round {}", name, round);
            }
        }
    }
}

pub fn assert_all_groupings_legal(schedule: &Schedule, players: &[Player]) {
    let by_name: HashMap<&str, &Player> = players.iter().map(|p| (p.name.as_str(), p)).collect();
    for game in &schedule.games {
        let team_a = [by_name[game.team_a[0].as_str()], by_name[game.team_a[1].as_str()]];
        let team_b = [by_name[game.team_b[0].as_str()], by_name[game.team_b[1].as_str()]];
        assert!(is_legal_grouping(team_a, team_b), "illegal grouping in {}", game.id);
    }
}

/// The ledger matches the games and sums to four appearances per game.
pub fn assert_ledger_consistent(schedule: &Schedule, players: &[Player]) {
    assert_eq!(schedule.games_played.len(), players.len());
    let total: u32 = schedule.games_played.values().sum();
    assert_eq!(total as usize, 4 * schedule.games.len());
    for player in players {
        let counted = schedule.games.iter().filter(|g| g.involves(&player.name)).count();
        assert_eq!(schedule.games_played[&player.name] as usize, counted, "{}", player.name);
    }
}
