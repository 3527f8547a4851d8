use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

use wattlog_analysis::{daily_costs, decharge, filter_recent, forecast_exhaustion};
use wattlog_store::{RecordStore, default_store_root};
use wattlog_types::{Reading, parse_timestamp};

mod config;
mod format;

use config::Config;

#[derive(Parser)]
#[command(name = "wattlog")]
#[command(author, version, about = "Prepaid electricity balance tracker", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Passphrase protecting the room's history
    #[arg(
        short,
        long,
        global = true,
        env = "WATTLOG_PASSPHRASE",
        hide_env_values = true
    )]
    passphrase: Option<String>,

    /// Storage root override
    #[arg(long, global = true)]
    storage_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a new balance reading
    Record {
        /// Remaining balance in kWh
        remaining: f64,

        /// Room name or alias
        #[arg(short, long)]
        room: Option<String>,

        /// Server-reported reading time (defaults to now)
        #[arg(long)]
        query_time: Option<String>,
    },

    /// Show the reading history with detected recharges
    History {
        /// Room name or alias
        #[arg(short, long)]
        room: Option<String>,

        /// Show the normalized series with recharge jumps removed
        #[arg(long)]
        decharged: bool,
    },

    /// Show per-day consumption
    Costs {
        /// Room name or alias
        #[arg(short, long)]
        room: Option<String>,
    },

    /// Forecast when the balance reaches zero
    Forecast {
        /// Room name or alias
        #[arg(short, long)]
        room: Option<String>,
    },

    /// Dump the decrypted log
    Export {
        /// Room name or alias
        #[arg(short, long)]
        room: Option<String>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // When quiet mode is enabled, suppress info-level logging.
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::load()?;
    let root = cli
        .storage_root
        .clone()
        .or_else(|| config.storage_root.clone())
        .unwrap_or_else(default_store_root);
    tracing::debug!("Using storage root {}", root.display());

    let passphrase = cli
        .passphrase
        .as_deref()
        .context("no passphrase provided (use --passphrase or WATTLOG_PASSPHRASE)")?;

    match cli.command {
        Commands::Record {
            remaining,
            room,
            query_time,
        } => {
            let room = config.resolve_room(room)?;
            let store = RecordStore::open(&root, &room, passphrase)?;

            let now = OffsetDateTime::now_utc();
            let query_time = match query_time {
                Some(s) => parse_timestamp(&s)
                    .with_context(|| format!("invalid --query-time value {s:?}"))?,
                None => now,
            };

            let reading = Reading {
                remaining,
                query_time,
                request_time: now,
            };
            store
                .append_reading(&reading)
                .with_context(|| format!("failed to record reading for room {room:?}"))?;

            println!(
                "saved {} kWh to {}",
                remaining,
                store.identity().blob_path().display()
            );
        }

        Commands::History { room, decharged } => {
            let room = config.resolve_room(room)?;
            let history = load_history(&root, &room, passphrase)?;
            let (normalized, recharges) = decharge(&history, &config.decharge_config())
                .with_context(|| format!("recharge detection failed for room {room:?}"))?;

            if decharged {
                println!("{}", format::format_decharged(&normalized));
            } else {
                println!("{}", format::format_history(&history, &recharges));
            }
        }

        Commands::Costs { room } => {
            let room = config.resolve_room(room)?;
            let history = load_history(&root, &room, passphrase)?;
            let recent = filter_recent(&history, config.recent_window());
            let (decharged, _) = decharge(recent, &config.decharge_config())
                .with_context(|| format!("recharge detection failed for room {room:?}"))?;
            let costs = daily_costs(&decharged)
                .with_context(|| format!("cost aggregation failed for room {room:?}"))?;

            println!("{}", format::format_costs(&costs));
        }

        Commands::Forecast { room } => {
            let room = config.resolve_room(room)?;
            let history = load_history(&root, &room, passphrase)?;
            let recent = filter_recent(&history, config.recent_window());
            let anchor = recent
                .last()
                .with_context(|| format!("no readings recorded for room {room:?}"))?;
            let (decharged, _) = decharge(recent, &config.decharge_config())
                .with_context(|| format!("recharge detection failed for room {room:?}"))?;

            let forecast = forecast_exhaustion(
                &decharged,
                anchor,
                OffsetDateTime::now_utc(),
                &config.forecast_config(),
            )
            .with_context(|| format!("exhaustion forecast failed for room {room:?}"))?;

            println!("{}", format::format_forecast(&forecast));
        }

        Commands::Export { room, output } => {
            let room = config.resolve_room(room)?;
            let store = RecordStore::open(&root, &room, passphrase)?;
            let content = store
                .read()
                .with_context(|| format!("failed to read history for room {room:?}"))?;

            match output {
                Some(path) => {
                    fs::write(&path, &content)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("exported to {}", path.display());
                }
                None => print!("{content}"),
            }
        }
    }

    Ok(())
}

fn load_history(root: &std::path::Path, room: &str, passphrase: &str) -> Result<Vec<Reading>> {
    let store = RecordStore::open(root, room, passphrase)?;
    store
        .load_history()
        .with_context(|| format!("failed to load history for room {room:?}"))
}
