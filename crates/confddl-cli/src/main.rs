//! confddl - academic conference deadlines in the terminal.
//!
//! Fetches the community-maintained CCF deadline feed, shows deadlines in
//! UTC+8, and falls back to the local cache when the network is unavailable.

mod render;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use confddl_core::accept_rate::build_index;
use confddl_core::models::category_label;
use confddl_core::{
    AcceptRateIndex, ConferenceStore, Config, FetchOutcome, FileStorage, HttpTransport,
};

#[derive(Parser)]
#[command(name = "confddl")]
#[command(about = "Track CCF conference deadlines, online or from the local cache")]
struct Cli {
    /// Also write logs to daily files in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum View {
    All,
    Upcoming,
    Passed,
    Tbd,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the latest feed and update the cache
    Refresh,
    /// List conferences by deadline, with optional filters
    List {
        #[arg(long, value_enum, default_value_t = View::All)]
        view: View,

        /// CCF level (A, B, C, N). Repeat to select several
        #[arg(short, long)]
        level: Vec<String>,

        /// Category code or label (e.g. AI, SE). Repeat to select several
        #[arg(short, long)]
        category: Vec<String>,

        /// Case-insensitive match on the short or full title
        #[arg(short, long)]
        search: Option<String>,

        /// Use the cache only
        #[arg(long)]
        offline: bool,

        #[arg(long)]
        json: bool,
    },
    /// Show every detail of one conference
    Show {
        id: String,

        #[arg(long)]
        json: bool,
    },
    /// Add or remove a favorite
    Fav { id: String },
    /// List favorited conferences
    Favorites {
        /// Use the cache only
        #[arg(long)]
        offline: bool,
    },
    /// Convert per-venue acceptance-rate YAML files into JSON plus index.json
    BuildIndex { src: PathBuf, out: PathBuf },
}

/// Initialize the tracing subscriber for logging
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // RUST_LOG controls the level (e.g., RUST_LOG=confddl_core=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "confddl.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.log_dir.as_deref());
    info!("confddl starting");

    match cli.command {
        Commands::BuildIndex { src, out } => run_build_index(&src, &out),
        command => {
            let config = Config::load()?;
            let store = open_store(&config)?;
            run(command, &store).await
        }
    }
}

fn open_store(config: &Config) -> Result<ConferenceStore> {
    let cache_dir = config.cache_dir()?;
    let storage = FileStorage::new(cache_dir.clone())
        .with_context(|| format!("Failed to open cache at {}", cache_dir.display()))?;
    let transport = HttpTransport::new()?;
    let index = AcceptRateIndex::load_bundled(config.accept_rate_index_path.as_deref());

    let store = ConferenceStore::new(config, Arc::new(transport), Arc::new(storage), index);
    store.load_favorites();
    Ok(store)
}

async fn run(command: Commands, store: &ConferenceStore) -> Result<()> {
    match command {
        Commands::Refresh => {
            store.load_from_cache();
            let outcome = store.fetch_remote_conferences().await;
            report(&outcome);
            match outcome {
                FetchOutcome::Failed { .. } => anyhow::bail!("No conference data available"),
                _ => {
                    println!("{}", render::status_line(store));
                    Ok(())
                }
            }
        }
        Commands::List {
            view,
            level,
            category,
            search,
            offline,
            json,
        } => {
            load(store, offline).await?;
            let categories = category.iter().map(|c| category_label(c).to_string()).collect();
            store.set_filter(level.iter().map(|l| l.to_uppercase()).collect(), categories);
            if let Some(query) = search {
                store.set_search_query(&query);
            }

            let views = store.categorized();
            let favorites = store.snapshot().favorites;
            if json {
                let conferences = match view {
                    View::All => views.into_filtered(),
                    View::Upcoming => views.upcoming,
                    View::Passed => views.passed,
                    View::Tbd => views.tbd,
                };
                println!("{}", serde_json::to_string_pretty(&conferences)?);
                return Ok(());
            }

            println!("{}", render::status_line(store));
            if matches!(view, View::All | View::Upcoming) {
                print!("{}", render::section("Upcoming", &views.upcoming, &favorites));
            }
            if matches!(view, View::All | View::Tbd) {
                print!("{}", render::section("TBD", &views.tbd, &favorites));
            }
            if matches!(view, View::All | View::Passed) {
                print!("{}", render::section("Passed", &views.passed, &favorites));
            }
            Ok(())
        }
        Commands::Show { id, json } => {
            load(store, true).await?;
            let conference = store
                .get_conference_by_id(&id)
                .with_context(|| format!("No conference with id '{}'", id))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&conference)?);
            } else {
                print!("{}", render::detail(&conference, store.is_favorite(&id)));
            }
            Ok(())
        }
        Commands::Fav { id } => {
            println!("{}: {}", id, store.toggle_favorite(&id));
            Ok(())
        }
        Commands::Favorites { offline } => {
            load(store, offline).await?;
            let favorites = store.snapshot().favorites;
            let conferences = store.favorite_conferences();
            print!("{}", render::section("Favorites", &conferences, &favorites));
            Ok(())
        }
        Commands::BuildIndex { src, out } => run_build_index(&src, &out),
    }
}

/// Show the cache, refreshing first unless offline or still fresh.
async fn load(store: &ConferenceStore, offline: bool) -> Result<()> {
    let has_cache = store.load_from_cache();
    let stale = store.freshness().map(|f| f.is_stale()).unwrap_or(true);

    if !offline && (!has_cache || stale) {
        report(&store.fetch_remote_conferences().await);
    } else {
        store.load_local_accept_rates(false).await;
    }

    if store.conferences().is_empty() {
        anyhow::bail!("No conference data available. Run `confddl refresh` when online.");
    }
    Ok(())
}

fn report(outcome: &FetchOutcome) {
    match outcome {
        FetchOutcome::NoConferences => eprintln!("Feed contained no current conferences"),
        other => {
            if let Some(notice) = other.notice() {
                eprintln!("{}", notice);
            }
        }
    }
}

fn run_build_index(src: &Path, out: &Path) -> Result<()> {
    let report = build_index(src, out)?;
    println!(
        "Converted {} file(s), skipped {}, failed {}",
        report.converted,
        report.skipped.len(),
        report.failed.len()
    );
    for path in &report.failed {
        eprintln!("  failed: {}", path.display());
    }
    Ok(())
}
