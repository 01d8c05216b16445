mod display;
mod import;
mod sync;
mod telemetry;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing::{Level, warn};

use crate::display::{
    display_backtest, display_context, display_import_summary, display_prediction,
    display_records, display_sync_outcome,
};
use crate::sync::{DEFAULT_API_URL, ResultsClient, backfill, sync_latest};
use thailotto_db::db::{SqliteStore, db_path};
use thailotto_db::seed::seed_records;
use thailotto_db::store::HistoryStore;
use thailotto_engine::backtest::backtest;
use thailotto_engine::config::{ScoringWeights, load_weights, save_weights};
use thailotto_engine::context::{ContextResolver, parse_target_date};
use thailotto_engine::predict::Predictor;
use thailotto_engine::rank::RankOptions;
use thailotto_engine::schedule::next_draw_date;

#[derive(Parser)]
#[command(name = "thailotto", about = "Thai lottery two-digit heuristic scorer")]
struct Cli {
    /// SQLite history file (default: ./data/thailotto.db)
    #[arg(long, global = true, env = "THAILOTTO_DB")]
    db: Option<PathBuf>,

    /// Results API base URL
    #[arg(long, global = true, env = "THAILOTTO_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Insert the bundled seed draws into an empty history
    Seed,

    /// Import draws from a legacy .json or .csv file
    Import {
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Export the history to the legacy JSON layout
    Export {
        #[arg(short, long, default_value = "thai_lotto_stat_db.json")]
        file: PathBuf,
    },

    /// Show the database path
    DbPath,

    /// Print the default scoring weights as JSON
    Weights {
        /// Write them to this file instead
        #[arg(long)]
        init: Option<PathBuf>,
    },

    /// List the most recent draws
    List {
        #[arg(short, long, default_value = "10")]
        last: usize,
    },

    /// Fetch the latest result from the API
    Sync {
        /// Also fetch the target date's results for this many past years
        #[arg(long)]
        backfill_years: Option<u32>,

        /// Anchor date for the backfill (DD-MM-YYYY or YYYY-MM-DD, default: next draw)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Show the calendar context of a draw date
    Context {
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Rank candidate numbers for a draw
    Predict {
        /// Target draw (DD-MM-YYYY or YYYY-MM-DD, default: next scheduled draw)
        #[arg(short, long)]
        date: Option<String>,

        /// Number of candidates to show
        #[arg(short, long, default_value = "5")]
        top: usize,

        /// Keep zero and negative scores
        #[arg(long)]
        all: bool,

        /// Scoring weights JSON file
        #[arg(short, long)]
        weights: Option<PathBuf>,

        /// Skip the API sync and use cached history only
        #[arg(long)]
        offline: bool,

        /// Print the ranked candidates as JSON
        #[arg(long)]
        json: bool,
    },

    /// Walk-forward evaluation over past draws
    Backtest {
        #[arg(short, long, default_value = "5")]
        top: usize,

        /// Number of most recent draws to replay
        #[arg(long, default_value = "50")]
        tests: usize,

        #[arg(short, long)]
        weights: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    telemetry::init_tracing(cli.log_json, level);

    let path = cli.db.clone().unwrap_or_else(db_path);
    match &cli.command {
        Command::DbPath => {
            println!("{}", path.display());
            return Ok(());
        }
        Command::Weights { init } => return cmd_weights(init.as_deref()),
        _ => {}
    }
    let mut store = SqliteStore::open(&path)?;

    match cli.command {
        Command::Seed => cmd_seed(&mut store),
        Command::Import { file } => cmd_import(&mut store, &file),
        Command::Export { file } => cmd_export(&store, &file),
        Command::DbPath | Command::Weights { .. } => Ok(()),
        Command::List { last } => cmd_list(&store, last),
        Command::Sync { backfill_years, date } => {
            cmd_sync(&mut store, &cli.api_url, backfill_years, date.as_deref())
        }
        Command::Context { date } => cmd_context(date.as_deref()),
        Command::Predict { date, top, all, weights, offline, json } => cmd_predict(
            &mut store,
            &cli.api_url,
            date.as_deref(),
            RankOptions { top_n: top, include_non_positive: all },
            weights.as_deref(),
            offline,
            json,
        ),
        Command::Backtest { top, tests, weights } => {
            cmd_backtest(&store, top, tests, weights.as_deref())
        }
    }
}

fn target_date(raw: Option<&str>) -> Result<NaiveDate> {
    match raw {
        Some(raw) => Ok(parse_target_date(raw)?),
        None => Ok(next_draw_date(Local::now().date_naive())?),
    }
}

fn weights_from(path: Option<&Path>) -> Result<ScoringWeights> {
    match path {
        Some(path) => load_weights(path),
        None => Ok(ScoringWeights::default()),
    }
}

fn ensure_history(store: &dyn HistoryStore) -> Result<()> {
    if store.count()? == 0 {
        bail!("Empty history. Run first: thailotto seed (or thailotto import)");
    }
    Ok(())
}

fn cmd_seed(store: &mut SqliteStore) -> Result<()> {
    if store.count()? > 0 {
        println!("History already holds draws, seed skipped.");
        return Ok(());
    }
    let records = seed_records()?;
    let summary = store.append_many(&records)?;
    println!("Seeded {} draws.", summary.inserted);
    Ok(())
}

fn cmd_import(store: &mut SqliteStore, file: &Path) -> Result<()> {
    let result = import::import_file(store, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_export(store: &SqliteStore, file: &Path) -> Result<()> {
    let n = import::export_json(store, file)?;
    println!("Exported {} draws to {}", n, file.display());
    Ok(())
}

fn cmd_list(store: &SqliteStore, last: usize) -> Result<()> {
    ensure_history(store)?;
    display_records(&store.most_recent(last)?);
    Ok(())
}

fn cmd_sync(
    store: &mut SqliteStore,
    api_url: &str,
    backfill_years: Option<u32>,
    date: Option<&str>,
) -> Result<()> {
    let client = ResultsClient::new(api_url)?;
    let outcome = sync_latest(store, &client).context("sync failed")?;
    display_sync_outcome(&outcome);

    if let Some(years) = backfill_years {
        let anchor = target_date(date)?;
        let inserted = backfill(store, &client, anchor, years)?;
        println!("Backfill added {} draws.", inserted);
    }
    Ok(())
}

fn cmd_weights(init: Option<&Path>) -> Result<()> {
    let weights = ScoringWeights::default();
    match init {
        Some(path) => {
            save_weights(&weights, path)?;
            println!("Default weights written to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&weights)?),
    }
    Ok(())
}

fn cmd_context(date: Option<&str>) -> Result<()> {
    let target = target_date(date)?;
    display_context(&Predictor::default().resolver().resolve(target));
    Ok(())
}

fn cmd_predict(
    store: &mut SqliteStore,
    api_url: &str,
    date: Option<&str>,
    options: RankOptions,
    weights: Option<&Path>,
    offline: bool,
    json: bool,
) -> Result<()> {
    let target = target_date(date)?;
    let weights = weights_from(weights)?;

    if !offline {
        // Cached history is good enough when the API is unreachable.
        let synced = ResultsClient::new(api_url).and_then(|client| sync_latest(store, &client));
        if let Err(e) = synced {
            warn!("sync failed, using cached history: {:#}", e);
        }
    }

    let predictor = Predictor::new(ContextResolver::default(), &weights);
    let prediction = predictor.predict(store, target, options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&prediction.ranked)?);
    } else {
        display_prediction(&prediction);
    }
    Ok(())
}

fn cmd_backtest(store: &SqliteStore, top: usize, tests: usize, weights: Option<&Path>) -> Result<()> {
    ensure_history(store)?;
    let weights = weights_from(weights)?;
    let history = store.load()?;
    let predictor = Predictor::new(ContextResolver::default(), &weights);
    let report = backtest(&predictor, &history, top, tests);
    display_backtest(&report);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_init_writes_loadable_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.json");
        cmd_weights(Some(&path)).unwrap();
        assert_eq!(load_weights(&path).unwrap(), ScoringWeights::default());
    }

    #[test]
    fn test_cli_parses_weights_init() {
        let cli = Cli::try_parse_from(["thailotto", "weights", "--init", "w.json"]).unwrap();
        assert!(matches!(cli.command, Command::Weights { init: Some(_) }));
    }
}
