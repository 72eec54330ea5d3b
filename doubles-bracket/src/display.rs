use std::fs::File;
use std::io::Write;

use crate::bracket::recommend::Recommendation;
use crate::bracket::report::balance_report;
use crate::bracket::types::{Game, Schedule};

/// Formats a player name with their fixed-table rank token, if any
pub fn format_player(schedule: &Schedule, name: &str) -> String {
    match schedule.ranks.iter().find(|r| r.name == name) {
        Some(rank) => format!("[{}] {}", rank.token, name),
        None => name.to_string(),
    }
}

fn format_game(schedule: &Schedule, game: &Game) -> String {
    let team = |t: &[String; 2]| format!("{} & {}", format_player(schedule, &t[0]), format_player(schedule, &t[1]));
    let mut line = format!(
        "Court {}: {} vs {} ({})",
        game.court,
        team(&game.team_a),
        team(&game.team_b),
        game.kind
    );
    if let Some(info) = &game.fixed_table {
        line.push_str(&format!(" [{}]", info.combination));
    }
    if let (Some(a), Some(b)) = (game.score_a, game.score_b) {
        line.push_str(&format!(" {}:{}", a, b));
    }
    line
}

/// Writes a schedule to a file, one round per block
pub fn write_schedule_to_file(schedule: &Schedule, filename: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(filename)?;

    writeln!(file, "** {} **", schedule.session_id)?;
    for round in 1..=schedule.settings.round_count {
        writeln!(file, "Round {}", round)?;
        for game in schedule.games_in_round(round) {
            writeln!(file, "  {}", format_game(schedule, game))?;
        }
    }
    writeln!(file)?;
    for (name, games) in &schedule.games_played {
        writeln!(file, "{} {}", format_player(schedule, name), games)?;
    }

    Ok(())
}

/// Prints a schedule in a readable format
pub fn print_schedule(schedule: &Schedule) {
    println!("\n=== {} ({} mode) ===", schedule.session_id, schedule.settings.mode.label());
    println!(
        "Games scheduled: {} of {} slots",
        schedule.games.len(),
        schedule.settings.court_count * schedule.settings.round_count
    );

    let tally = schedule.kind_tally();
    println!(
        "Male-only: {}, female-only: {}, mixed: {}",
        tally.male_only, tally.female_only, tally.mixed
    );
    if let Some(targets) = &schedule.settings.gender_targets {
        println!(
            "Planned:   {}, {}, {}",
            targets.male_only, targets.female_only, targets.mixed
        );
    }

    for round in 1..=schedule.settings.round_count {
        println!("\nRound {}:", round);
        let mut any = false;
        for game in schedule.games_in_round(round) {
            println!("  {}", format_game(schedule, game));
            any = true;
        }
        if !any {
            println!("  [EMPTY]");
        }
    }

    let balance = balance_report(schedule);
    println!("\nGames per player (average {:.1}):", balance.average);
    for p in &balance.players {
        println!("  {} -> {} ({:+.1})", format_player(schedule, &p.name), p.games, p.diff);
    }
    if !balance.under_average.is_empty() {
        println!("⚠️  Below average ({}):", balance.under_average.len());
        for p in &balance.under_average {
            println!("  - {}", p.name);
        }
    }
}

pub fn print_recommendations(recommendations: &[Recommendation]) {
    println!("\n=== Recommended distributions ===");
    for rec in recommendations {
        let spread = rec
            .games_spread
            .map(|s| format!(", games spread {}", s))
            .unwrap_or_default();
        println!(
            "  {}: male-only {}, female-only {}, mixed {}{}",
            rec.focus.label(),
            rec.targets.male_only,
            rec.targets.female_only,
            rec.targets.mixed,
            spread
        );
    }
}
