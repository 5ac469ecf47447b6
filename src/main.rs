use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use swiss_pairing::config::AppConfig;
use swiss_pairing::storage::{JsonlStore, StorageConfig};
use swiss_pairing::{PlayerId, Tournament};

#[derive(Parser)]
#[command(name = "swiss-pairing")]
#[command(about = "Swiss-system tournament standings and pairings")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new player
    Register {
        /// Player's full name (need not be unique)
        name: String,
    },

    /// List registered players
    Players,

    /// Report the result of a match (same id twice records a bye)
    Report {
        player1: u32,

        player2: u32,

        /// Id of the winning player
        #[arg(long)]
        winner: Option<u32>,

        /// The match was drawn
        #[arg(long, conflicts_with = "winner")]
        draw: bool,
    },

    /// Show current standings
    Standings,

    /// Compute pairings for the next round
    Pair {
        /// Store the pairings as the round's intended matchups
        #[arg(long)]
        save: bool,
    },

    /// Delete all matches (and optionally all players)
    Reset {
        /// Also delete registered players
        #[arg(long)]
        players: bool,
    },

    /// Show tournament progress
    Status,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    config.validate()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(cli.json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!cli.json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    tracing::debug!("Using data directory {:?}", config.data_dir);

    let store = JsonlStore::new(StorageConfig::new(config.data_dir.clone()));
    let mut tournament = Tournament::new(store).with_rounds(config.tournament.rounds);

    let names: HashMap<PlayerId, String> = tournament
        .players()?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();
    let name_of = |id: PlayerId| names.get(&id).cloned().unwrap_or_else(|| id.to_string());

    match cli.command {
        Commands::Register { name } => {
            let player = tournament.register_player(&name)?;
            println!("Registered {} with id {}", player.name, player.id);
        }

        Commands::Players => {
            println!("{:>5}  Name", "Id");
            for player in tournament.players()? {
                println!("{:>5}  {}", player.id, player.name);
            }
        }

        Commands::Report {
            player1,
            player2,
            winner,
            draw,
        } => {
            if player1 != player2 && winner.is_none() && !draw {
                bail!("Specify --winner <id> or --draw");
            }
            let record = tournament.report_match(
                PlayerId::new(player1),
                PlayerId::new(player2),
                winner.map(PlayerId::new),
            )?;
            if record.is_bye() {
                println!("Round {}: bye for {}", record.round, name_of(record.a));
            } else {
                let result = match record.winner() {
                    Some(w) => format!("{} wins", name_of(w)),
                    None => "draw".to_string(),
                };
                println!(
                    "Round {}: {} vs {}: {}",
                    record.round,
                    name_of(record.a),
                    name_of(record.b),
                    result
                );
            }
        }

        Commands::Standings => {
            println!("\n=== {} Standings ===", config.tournament.name);
            println!(
                "{:>4} {:>5} {:<24} {:>4} {:>4} {:>4} {:>6} {:>5} {:>6}",
                "#", "Id", "Name", "W", "D", "L", "Played", "OppW", "Rank"
            );
            println!("{}", "-".repeat(72));
            for (pos, row) in tournament.player_standings()?.iter().enumerate() {
                println!(
                    "{:>4} {:>5} {:<24} {:>4} {:>4} {:>4} {:>6} {:>5} {:>6.1}",
                    pos + 1,
                    row.player_id,
                    row.name,
                    row.wins,
                    row.draws,
                    row.losses(),
                    row.played,
                    row.opponent_wins,
                    row.rank
                );
            }
        }

        Commands::Pair { save } => {
            if tournament.is_complete()? {
                println!(
                    "All {} planned rounds are complete",
                    tournament.planned_rounds()?
                );
                return Ok(());
            }
            if save && !tournament.pending_pairings()?.is_empty() {
                bail!("Pairings for the current round are already saved; report results first");
            }

            let pairings = tournament.swiss_pairings()?;
            if let Some(first) = pairings.first() {
                println!("\n=== Round {} Pairings ===", first.round);
            }
            for pairing in &pairings {
                if pairing.is_bye() {
                    println!(
                        "{:>5} {:<24} BYE",
                        pairing.player_a,
                        name_of(pairing.player_a)
                    );
                } else {
                    println!(
                        "{:>5} {:<24} vs {:>5} {}",
                        pairing.player_a,
                        name_of(pairing.player_a),
                        pairing.player_b,
                        name_of(pairing.player_b)
                    );
                }
            }

            if save {
                tournament.record_pairings(&pairings)?;
                println!("\nSaved {} pairings", pairings.len());
            }
        }

        Commands::Reset { players } => {
            tournament.delete_matches()?;
            println!("Deleted all matches");
            if players {
                tournament.delete_players()?;
                println!("Deleted all players");
            }
        }

        Commands::Status => {
            println!("\n=== {} ===", config.tournament.name);
            println!("Players:          {}", tournament.count_players()?);
            println!("Match records:    {}", tournament.count_matches()?);
            println!(
                "Rounds complete:  {} of {}",
                tournament.completed_rounds()?,
                tournament.planned_rounds()?
            );
            let pending = tournament.pending_pairings()?;
            if !pending.is_empty() {
                println!("Pending pairings: {}", pending.len());
            }
            if tournament.is_complete()? {
                if let Some(leader) = tournament.player_standings()?.first() {
                    println!("Winner:           {}", leader.name);
                }
            }
        }
    }

    Ok(())
}
