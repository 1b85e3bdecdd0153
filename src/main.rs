use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::DateTime;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tally_explorer::api::{build_router, state::AppState, with_layers};
use tally_explorer::calculate::{
    aggregate_by_rank_banded, handicap_performance_table, summarize_rank_distribution,
};
use tally_explorer::config::AppConfig;
use tally_explorer::format::{human_number, percent, rank_string};
use tally_explorer::models::{
    speed_label, BandedRankAggregate, DatasetMetadata, RawDataset, Selection, ALL_SENTINEL,
    BOARD_SIZES, GAME_SPEEDS, NUM_HANDICAPS,
};
use tally_explorer::storage::{load_dataset, SelectionStore};

#[derive(Parser)]
#[command(name = "tally-explorer")]
#[command(about = "Win-rate curves over precomputed rating-system game tallies")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path (overrides config)
    #[arg(long)]
    data_dir: Option<String>,

    /// Tally corpus JSON file (overrides config)
    #[arg(long)]
    dataset: Option<String>,

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
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// List datasets, newest first
    List,

    /// Print banded win rates for the chosen datasets
    Report {
        /// Dataset to report on (default: the saved selection)
        #[arg(long)]
        name: Option<String>,

        /// Board sizes, e.g. "9,19" (default: the saved selection)
        #[arg(long, value_delimiter = ',')]
        sizes: Vec<u32>,

        /// Game speeds: 1 blitz, 2 live, 3 correspondence
        #[arg(long, value_delimiter = ',')]
        speeds: Vec<u32>,

        /// Handicaps 0-9
        #[arg(long, value_delimiter = ',')]
        handicaps: Vec<u32>,

        /// Rank band width
        #[arg(long)]
        band_width: Option<u32>,
    },

    /// Print win rate by rank band and handicap for one board size
    HandicapTable {
        /// Dataset (default: the latest)
        #[arg(long)]
        name: Option<String>,

        /// Board size; omit for every size
        #[arg(long)]
        size: Option<u32>,
    },

    /// Save the selection used by `report` and the API
    Select {
        /// Datasets to select
        #[arg(long = "dataset-name")]
        datasets: Vec<String>,

        #[arg(long, value_delimiter = ',')]
        sizes: Vec<u32>,

        #[arg(long, value_delimiter = ',')]
        speeds: Vec<u32>,

        #[arg(long, value_delimiter = ',')]
        handicaps: Vec<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&PathBuf::from(&cli.config))?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = PathBuf::from(dir);
    }
    if let Some(path) = &cli.dataset {
        config.dataset_path = Some(PathBuf::from(path));
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    let (json_layer, text_layer) = if cli.json_logs {
        (Some(tracing_subscriber::fmt::layer().json()), None)
    } else {
        (None, Some(tracing_subscriber::fmt::layer()))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    tracing::info!("Starting tally-explorer v{}", env!("CARGO_PKG_VERSION"));

    let corpus = load_dataset(&config.dataset_path())?;
    let store = SelectionStore::new(config.selection_path());

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState::new(corpus, store, config.default_band_width);
            let app = with_layers(build_router(state), &config.server.cors_origin);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Serving API on http://{}", addr);
            axum::serve(listener, app).await?;
        }

        Commands::List => {
            println!("\n=== Datasets ===");
            for name in corpus.names_by_recency() {
                let Some(record) = corpus.get(name) else {
                    continue;
                };
                let created = DateTime::from_timestamp(record.timestamp, 0)
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string());
                let info = DatasetMetadata::parse(name);
                println!(
                    "{}  {:<40} {:<8} {:>10} samples",
                    created,
                    info.title(),
                    info.rating_system,
                    samples_label(info.num_samples)
                );
            }
        }

        Commands::Report {
            name,
            sizes,
            speeds,
            handicaps,
            band_width,
        } => {
            let names = match name {
                Some(name) => vec![name],
                None => store.selected_datasets(&corpus),
            };
            if names.is_empty() {
                bail!("No datasets loaded");
            }

            let selection = if sizes.is_empty() && speeds.is_empty() && handicaps.is_empty() {
                store.selection()
            } else {
                Selection::new(sizes, speeds, handicaps)
            };
            let band_width = band_width.unwrap_or(config.default_band_width);
            println!("Selection: {}", describe_selection(&selection));

            for name in &names {
                let aggregate = aggregate_by_rank_banded(&corpus, name, &selection, band_width)?;
                print_report(&corpus, name, &aggregate);
            }
        }

        Commands::HandicapTable { name, size } => {
            let Some(name) = name.or_else(|| corpus.latest_name().map(str::to_string)) else {
                bail!("No datasets loaded");
            };
            let size = size.unwrap_or(ALL_SENTINEL);
            let table = handicap_performance_table(&corpus, &name, size)?;

            if size == ALL_SENTINEL {
                println!("\nOverall:   {} games", table.total_games);
            } else {
                println!("\n{}x{}:   {} games", size, size, table.total_games);
            }
            print!("          ");
            for handicap in 0..10 {
                print!("  hc {}   ", handicap);
            }
            println!();
            for row in &table.rows {
                print!("{:>9} ", row.label);
                for bucket in &row.handicaps {
                    print!("{:>7}   ", percent(bucket.winrate));
                }
                println!();
            }
        }

        Commands::Select {
            datasets,
            sizes,
            speeds,
            handicaps,
        } => {
            for name in &datasets {
                if !corpus.contains(name) {
                    tracing::warn!("Dataset {} is not in the corpus", name);
                }
            }
            for size in sizes.iter().filter(|s| !BOARD_SIZES.contains(s)) {
                tracing::warn!("Board size {} is never tallied", size);
            }
            for speed in speeds.iter().filter(|s| !GAME_SPEEDS.contains(s)) {
                tracing::warn!("Game speed {} is never tallied", speed);
            }
            for handicap in handicaps.iter().filter(|h| **h >= NUM_HANDICAPS) {
                tracing::warn!("Handicap {} is never tallied", handicap);
            }
            if !datasets.is_empty() {
                store.set_selected_datasets(&datasets)?;
            }
            let selection = store.set_selection(&Selection::new(sizes, speeds, handicaps))?;

            println!("\n=== Selection ===");
            println!("Datasets:   {:?}", store.selected_datasets(&corpus));
            println!("Sizes:      {:?}", selection.sizes);
            println!("Speeds:     {:?}", selection.speeds);
            println!("Handicaps:  {:?}", selection.handicaps);
        }
    }

    Ok(())
}

fn samples_label(samples: Option<u64>) -> String {
    samples
        .map(|n| human_number(n as f64))
        .unwrap_or_else(|| "N/A".to_string())
}

fn describe_selection(selection: &Selection) -> String {
    let sizes = if selection.sizes.is_empty() {
        "all sizes".to_string()
    } else {
        selection
            .sizes
            .iter()
            .map(|s| format!("{}x{}", s, s))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let speeds = if selection.speeds.is_empty() {
        "all speeds".to_string()
    } else {
        selection
            .speeds
            .iter()
            .map(|s| speed_label(*s))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let handicaps = if selection.handicaps.is_empty() {
        "all handicaps".to_string()
    } else {
        format!("handicaps {:?}", selection.handicaps)
    };
    format!("{}; {}; {}", sizes, speeds, handicaps)
}

fn print_report(corpus: &RawDataset, name: &str, aggregate: &BandedRankAggregate) {
    let info = &aggregate.info;

    println!("\n=== {} ===", info.title());
    println!("Dataset:          {}", info.dataset);
    println!("Rating system:    {}", info.rating_system);
    if let Some(args) = &info.log_args {
        println!("A / C:            {} / {}", args.a, args.c);
    }
    if let Some(args) = &info.linear_args {
        println!("M / B:            {} / {}", args.m, args.b);
    }
    println!("Samples:          {}", samples_label(info.num_samples));
    println!("Dropped games:    {}", human_number(info.ignored as f64));
    println!("Rank changes:     {}", info.unexpected_rank_changes);
    println!("Black win rate:   {}", percent(aggregate.avg_winrate));

    if let Some(record) = corpus.get(name) {
        let players = summarize_rank_distribution(&record.rank_distribution);
        if players.total_players > 0 {
            println!(
                "Mean rank:        {} ({} players)",
                rank_string(players.mean_rank),
                human_number(players.total_players as f64)
            );
        }
    }

    println!(
        "\n{:>9}  {:>8}  {:>9}  {:>9}",
        "ranks", "win", "predicted", "samples"
    );
    for band in aggregate.bands() {
        let marker = if band.insufficient_data(info.num_samples.unwrap_or_default()) {
            "  (insufficient data)"
        } else {
            ""
        };
        println!(
            "{:>9}  {:>8}  {:>9}  {:>9}{}",
            band.label,
            percent(band.winrate),
            percent(band.predicted_winrate),
            human_number(band.samples as f64),
            marker
        );
    }
}
