mod common;

use std::collections::HashSet;

use doubles_bracket::bracket::types::{GameKind, KindTargets};
use doubles_bracket::bracket::{
    balance_report, generate_fixed_table_bracket, generate_manual_bracket, generate_random_bracket, rankings,
    record_score, RandomBracketOptions,
};
use doubles_bracket::config::EngineConfig;
use doubles_bracket::error::BracketError;
use rand::rngs::StdRng;
use rand::SeedableRng;

use common::{assert_all_groupings_legal, assert_ledger_consistent, assert_no_double_booking, roster};

fn targeted(courts: u32, rounds: u32) -> RandomBracketOptions {
    RandomBracketOptions {
        gender_targeting: true,
        ..RandomBracketOptions::new(courts, rounds)
    }
}

#[test]
fn eight_players_two_courts_four_rounds_targeted() {
    let players = roster(4, 4, 0);
    let config = EngineConfig::default();
    for seed in 0..5 {
        let mut rng = StdRng::seed_from_u64(seed);
        let schedule = generate_random_bracket(&players, &targeted(2, 4), &config, &mut rng).unwrap();

        assert_eq!(schedule.settings.gender_targets, Some(KindTargets::new(3, 3, 2)));
        assert_eq!(schedule.games.len(), 8);
        assert!(schedule.games_played.values().all(|&n| n == 4));
        // every full round is either two same-gender games or two mixed games
        let tally = schedule.kind_tally();
        assert_eq!(tally.male_only, tally.female_only);
        assert_eq!(tally.mixed % 2, 0);

        assert_no_double_booking(&schedule);
        assert_all_groupings_legal(&schedule, &players);
        assert_ledger_consistent(&schedule, &players);
    }
}

#[test]
fn five_player_fixed_table_on_one_court() {
    let players = roster(3, 2, 0);
    let mut rng = StdRng::seed_from_u64(11);
    let schedule = generate_fixed_table_bracket(&players, 1, false, &mut rng).unwrap();

    assert_eq!(schedule.games.len(), 5);
    assert_eq!(schedule.settings.round_count, 5);
    assert!(schedule.games_played.values().all(|&n| n == 4));
    assert!(schedule.games.iter().all(|g| g.fixed_table.is_some()));
    assert_eq!(schedule.ranks.len(), 5);
    assert_no_double_booking(&schedule);
    assert_ledger_consistent(&schedule, &players);
}

#[test]
fn manual_single_court_plan() {
    let players = roster(4, 4, 0);
    let kinds = [GameKind::Mixed, GameKind::MaleOnly, GameKind::FemaleOnly, GameKind::Mixed];
    let mut rng = StdRng::seed_from_u64(5);
    let schedule =
        generate_manual_bracket(&players, 1, 4, &kinds, &EngineConfig::default(), &mut rng).unwrap();

    let got: Vec<GameKind> = schedule.games.iter().map(|g| g.kind).collect();
    assert_eq!(got, kinds);
    assert_eq!(schedule.settings.manual_kinds.as_deref(), Some(&kinds[..]));
    assert_all_groupings_legal(&schedule, &players);
    assert_ledger_consistent(&schedule, &players);
}

#[test]
fn manual_two_courts_two_rounds() {
    let players = roster(4, 4, 0);
    let kinds = [GameKind::Mixed, GameKind::Mixed, GameKind::MaleOnly, GameKind::FemaleOnly];
    let mut rng = StdRng::seed_from_u64(9);
    let schedule =
        generate_manual_bracket(&players, 2, 2, &kinds, &EngineConfig::default(), &mut rng).unwrap();

    assert_eq!(schedule.games.len(), 4);
    assert_eq!(schedule.game("T2-C1").map(|g| g.kind), Some(GameKind::MaleOnly));
    assert_eq!(schedule.game("T2-C2").map(|g| g.kind), Some(GameKind::FemaleOnly));
    assert!(schedule.games_played.values().all(|&n| n == 2));
    assert_no_double_booking(&schedule);
}

#[test]
fn manual_plan_needing_too_many_players_is_rejected() {
    let players = roster(2, 4, 0);
    let kinds = [GameKind::MaleOnly];
    let mut rng = StdRng::seed_from_u64(0);
    let err = generate_manual_bracket(&players, 1, 1, &kinds, &EngineConfig::default(), &mut rng);
    assert!(matches!(err, Err(BracketError::InfeasibleKind { kind: GameKind::MaleOnly, .. })));
}

#[test]
fn different_seeds_give_different_brackets() {
    let players = roster(5, 5, 2);
    let config = EngineConfig::default();
    let options = RandomBracketOptions::new(2, 5);

    let mut layouts = HashSet::new();
    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let schedule = generate_random_bracket(&players, &options, &config, &mut rng).unwrap();
        let layout: Vec<[String; 4]> = schedule
            .games
            .iter()
            .map(|g| {
                [
                    g.team_a[0].clone(),
                    g.team_a[1].clone(),
                    g.team_b[0].clone(),
                    g.team_b[1].clone(),
                ]
            })
            .collect();
        layouts.insert(layout);
    }
    assert!(layouts.len() > 1);
}

#[test]
fn same_seed_gives_same_games() {
    let players = roster(6, 4, 0);
    let config = EngineConfig::default();
    let options = targeted(2, 3);
    let a = generate_random_bracket(&players, &options, &config, &mut StdRng::seed_from_u64(42)).unwrap();
    let b = generate_random_bracket(&players, &options, &config, &mut StdRng::seed_from_u64(42)).unwrap();
    assert_eq!(a.games, b.games);
}

#[test]
fn scores_feed_rankings_and_balance() {
    let players = roster(4, 4, 0);
    let mut rng = StdRng::seed_from_u64(1);
    let mut schedule =
        generate_random_bracket(&players, &RandomBracketOptions::new(2, 2), &EngineConfig::default(), &mut rng)
            .unwrap();

    let winners = record_score(&mut schedule, "T1-C1", 6, 2).unwrap().team_a.clone();
    let standings = rankings(&schedule);
    assert_eq!(standings.len(), 8);
    let top: HashSet<&str> = standings[..2].iter().map(|s| s.name.as_str()).collect();
    assert!(winners.iter().all(|w| top.contains(w.as_str())));
    assert_eq!(standings[0].differential(), 4);

    let balance = balance_report(&schedule);
    assert_eq!(balance.total_games, 4);
    assert_eq!(balance.spread(), 0);

    assert!(matches!(
        record_score(&mut schedule, "T5-C1", 1, 0),
        Err(BracketError::UnknownGame(_))
    ));
}
