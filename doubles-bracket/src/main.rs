use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use log::info;

use doubles_bracket::bracket::types::{KindTargets, Player, Schedule};
use doubles_bracket::bracket::{
    generate_fixed_table_bracket, generate_manual_bracket, generate_random_bracket, parse_kind_list,
    recommend, rng_from_seed, GenderCounts, RandomBracketOptions,
};
use doubles_bracket::config::{load_config, EngineConfig};
use doubles_bracket::display::{print_recommendations, print_schedule, write_schedule_to_file};
use doubles_bracket::roster::load_roster;
use doubles_bracket::web;

#[derive(Parser)]
#[command(name = "doubles-bracket", about = "Doubles tennis bracket generator")]
struct Cli {
    /// JSON file with scoring weights and search limits
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Heuristic bracket over courts x rounds
    Random {
        #[command(flatten)]
        common: CommonArgs,
        #[arg(long, default_value_t = 4)]
        rounds: u32,
        /// Aim for a planned male-only / female-only / mixed split
        #[arg(long = "gender")]
        gender_targeting: bool,
        /// Prefer teams of similar combined skill
        #[arg(long = "skill")]
        skill_targeting: bool,
        /// Explicit game counts; any of the three switches to an explicit split
        #[arg(long)]
        male_only: Option<u32>,
        #[arg(long)]
        female_only: Option<u32>,
        #[arg(long)]
        mixed: Option<u32>,
    },
    /// Predetermined rank table for 5 to 10 players
    Fixed {
        #[command(flatten)]
        common: CommonArgs,
        /// Rank players by skill instead of at random
        #[arg(long)]
        skill_ranking: bool,
    },
    /// Caller picks the kind of every slot
    Manual {
        #[command(flatten)]
        common: CommonArgs,
        #[arg(long, default_value_t = 4)]
        rounds: u32,
        /// Comma separated kinds in round-major order, e.g. "mixed,male,female,mixed"
        #[arg(long)]
        kinds: String,
    },
    /// Suggest game distributions for a roster
    Recommend {
        /// Count genders from a roster instead of --males/--females
        #[arg(long)]
        roster: Option<PathBuf>,
        #[arg(long, default_value_t = 0)]
        males: usize,
        #[arg(long, default_value_t = 0)]
        females: usize,
        #[arg(long, default_value_t = 2)]
        courts: u32,
        #[arg(long, default_value_t = 4)]
        rounds: u32,
    },
    /// Serve the JSON API
    Web {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// CSV file with name,gender,skill columns
    #[arg(long)]
    roster: PathBuf,
    #[arg(long, default_value_t = 2)]
    courts: u32,
    #[arg(long)]
    seed: Option<u64>,
    /// Also write the schedule to this file
    #[arg(long)]
    output: Option<String>,
}

fn explicit_split(male_only: Option<u32>, female_only: Option<u32>, mixed: Option<u32>) -> Option<KindTargets> {
    if male_only.is_none() && female_only.is_none() && mixed.is_none() {
        return None;
    }
    Some(KindTargets::new(
        male_only.unwrap_or(0),
        female_only.unwrap_or(0),
        mixed.unwrap_or(0),
    ))
}

fn load_players(path: &Path) -> Result<Vec<Player>, Box<dyn std::error::Error>> {
    let players = load_roster(path)?;
    info!("Loaded {} players from {}", players.len(), path.display());
    Ok(players)
}

fn finish(schedule: &Schedule, output: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    print_schedule(schedule);
    if let Some(filename) = output {
        write_schedule_to_file(schedule, filename)?;
        println!("\nSchedule saved to {}", filename);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Command::Random {
            common,
            rounds,
            gender_targeting,
            skill_targeting,
            male_only,
            female_only,
            mixed,
        } => {
            let players = load_players(&common.roster)?;
            let options = RandomBracketOptions {
                court_count: common.courts,
                round_count: rounds,
                gender_targeting,
                skill_targeting,
                distribution: explicit_split(male_only, female_only, mixed),
            };
            let mut rng = rng_from_seed(common.seed);
            let schedule = generate_random_bracket(&players, &options, &config, &mut rng)?;
            finish(&schedule, common.output.as_deref())?;
        }
        Command::Fixed { common, skill_ranking } => {
            let players = load_players(&common.roster)?;
            let mut rng = rng_from_seed(common.seed);
            let schedule = generate_fixed_table_bracket(&players, common.courts, skill_ranking, &mut rng)?;
            finish(&schedule, common.output.as_deref())?;
        }
        Command::Manual { common, rounds, kinds } => {
            let players = load_players(&common.roster)?;
            let kinds = parse_kind_list(&kinds)?;
            let mut rng = rng_from_seed(common.seed);
            let schedule = generate_manual_bracket(&players, common.courts, rounds, &kinds, &config, &mut rng)?;
            finish(&schedule, common.output.as_deref())?;
        }
        Command::Recommend {
            roster,
            males,
            females,
            courts,
            rounds,
        } => {
            let (males, females) = match roster {
                Some(path) => GenderCounts::from_roster(&load_players(&path)?).planning_counts(),
                None => (males, females),
            };
            let recommendations = recommend(males, females, courts, rounds)?;
            print_recommendations(&recommendations);
        }
        Command::Web { port } => {
            println!("Starting web server on port {}...", port);
            println!("Access the API at http://localhost:{}/api/bracket", port);
            web::start_server(port, config).await?;
        }
    }

    Ok(())
}
