//! Team Preview CLI Tool
//!
//! Offline preview of the teams the service would pick, without a record
//! store. The roster file lists players together with their availability and
//! coach ratings:
//!
//! ```json
//! {"players": [
//!   {"name": "Ada", "position": "forward", "foot": "left", "goalkeeper": false,
//!    "available": true,
//!    "ratings": [{"coach": "Mo", "attack_skill": 8, "defense_skill": 4,
//!                 "passing": 7, "attitude": 9, "teamwork": 6}]}
//! ]}
//! ```
//!
//! Usage:
//!   cargo run --bin team-preview -- --roster squad.json --strengths 3,1
//!   cargo run --bin team-preview -- --roster squad.json --strengths 2,2 --names Reds,Blues --json

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use kickabout::config::BalancerConfig;
use kickabout::metrics::MetricsCollector;
use kickabout::service::{ClubService, SelectionOutcome};
use kickabout::store::{InMemoryRecordStore, RecordStore};
use kickabout::types::{Availability, NewPlayer, RatingSubmission, TeamSelectionRequest};
use serde::Deserialize;

#[derive(Parser)]
#[command(name = "team-preview")]
#[command(about = "Preview team selection from a local roster file")]
struct Cli {
    /// Roster JSON file
    #[arg(short, long, value_name = "FILE")]
    roster: PathBuf,

    /// Opponent strengths as `<first>,<second>`
    #[arg(short, long, value_parser = parse_pair::<i64>)]
    strengths: (i64, i64),

    /// Opponent names as `<first>,<second>`
    #[arg(short, long, value_parser = parse_pair::<String>, default_value = "Team 1,Team 2")]
    names: (String, String),

    /// Strength gap at which one side gets the whole top half
    #[arg(long, default_value = "2")]
    lopsided_gap: u64,

    /// Print the selection as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Deserialize)]
struct RosterFile {
    players: Vec<RosterEntry>,
}

#[derive(Debug, Deserialize)]
struct RosterEntry {
    #[serde(flatten)]
    player: NewPlayer,
    #[serde(default = "default_available")]
    available: bool,
    #[serde(default)]
    ratings: Vec<RatingSubmission>,
}

fn default_available() -> bool {
    true
}

fn parse_pair<T: std::str::FromStr>(value: &str) -> Result<(T, T)> {
    let (first, second) = value
        .split_once(',')
        .ok_or_else(|| anyhow!("expected two comma-separated values, got '{}'", value))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<T>()
            .map_err(|_| anyhow!("invalid value '{}'", part.trim()))
    };
    Ok((parse(first)?, parse(second)?))
}

/// Load the roster into a fresh in-memory store
async fn load_roster(roster: RosterFile) -> Result<Arc<InMemoryRecordStore>> {
    let store = Arc::new(InMemoryRecordStore::new());

    for entry in roster.players {
        let player = store.insert_player(entry.player).await?;
        store
            .upsert_availability(Availability {
                player_id: player.id,
                available: entry.available,
            })
            .await?;
        for rating in entry.ratings {
            store.upsert_rating(player.id, rating).await?;
        }
    }

    Ok(store)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let contents = std::fs::read_to_string(&cli.roster)
        .with_context(|| format!("Failed to read roster file {}", cli.roster.display()))?;
    let roster: RosterFile = serde_json::from_str(&contents).context("Invalid roster file")?;

    let balancer_config = BalancerConfig {
        lopsided_gap: cli.lopsided_gap,
        ..BalancerConfig::default()
    };
    balancer_config.validate()?;

    let store = load_roster(roster).await?;
    let service = ClubService::new(store, balancer_config, Arc::new(MetricsCollector::new()?));

    let (first_name, second_name) = cli.names;
    let outcome = service
        .select_teams(TeamSelectionRequest {
            opponent_1_name: first_name,
            opponent_2_name: second_name,
            opponent_1_strength: cli.strengths.0,
            opponent_2_strength: cli.strengths.1,
        })
        .await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    let selected = match outcome {
        SelectionOutcome::Teams(selected) => selected,
        SelectionOutcome::Insufficient(reply) => bail!("{}", reply.message),
    };

    println!("⚽ Team preview");
    for (name, sheet) in selected.teams.iter() {
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!(
            "{} ({} players, average ability {:.2})",
            name,
            sheet.players.len(),
            sheet.average_ability
        );
        for member in &sheet.players {
            let keeper = if member.goalkeeper { " 🧤" } else { "" };
            println!("  - {} [{}]{}", member.name, member.position, keeper);
        }
    }

    Ok(())
}
