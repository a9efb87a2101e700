//! Factcollector CLI - fetch, deduplicate and browse facts

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use factcollector::config::{self, CollectorConfig};
use factcollector::ui::{self, Icons};
use factcollector::collector::interrupt_signal;
use factcollector::{CollectOutcome, Collector, FactStore, HttpFactSource};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "factcollector")]
#[command(version)]
#[command(about = "Digital Fact Collector - fetch, deduplicate and keep interesting facts")]
#[command(long_about = r#"
Factcollector fetches random facts from an online source and keeps the new
ones in a local JSON database. Facts that differ only in case or surrounding
whitespace are treated as duplicates.

Run without a subcommand for the interactive menu.

Example usage:
  factcollector collect
  factcollector run --interval 5
  factcollector list
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the fact database (overrides the config file)
    #[arg(short, long, global = true)]
    storage: Option<PathBuf>,

    /// Emit machine-readable JSON instead of human output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one fact and store it if it is new
    Collect,

    /// Fetch a fact now and then on a fixed interval until Ctrl+C
    Run {
        /// Minutes between collections
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..=config::MAX_INTERVAL_MINUTES))]
        interval: Option<u64>,
    },

    /// List every stored fact
    List,

    /// Show statistics about the collection
    Stats,

    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(self) -> bool {
        self == OutputMode::Human
    }
}

pub fn emit_success(output_mode: OutputMode, command: &str, data: serde_json::Value) -> anyhow::Result<()> {
    if output_mode == OutputMode::Json {
        let envelope = serde_json::json!({
            "ok": true,
            "command": command,
            "data": data,
        });
        println!("{}", serde_json::to_string(&envelope)?);
    }
    Ok(())
}

type HttpCollector = Collector<HttpFactSource>;

fn open_collector(config: &CollectorConfig) -> anyhow::Result<HttpCollector> {
    tracing::debug!("Using database {:?}", config.storage);
    let source = HttpFactSource::new(config.source_url.clone(), config.timeout())?;
    Ok(Collector::new(FactStore::open(&config.storage), source))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let output_mode = if cli.json { OutputMode::Json } else { OutputMode::Human };
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);

    let resolve_config = || -> anyhow::Result<CollectorConfig> {
        let mut config = config::load_config(Some(&config_path))
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
        if let Some(storage) = &cli.storage {
            config.storage = storage.clone();
        }
        Ok(config)
    };

    match cli.command {
        Some(Commands::Init { force }) => {
            config::write_config(&config_path, &CollectorConfig::default(), force)?;
            if output_mode.is_human() {
                ui::success(&format!("Wrote {}", config_path.display()));
            } else {
                emit_success(output_mode, "init", serde_json::json!({ "path": config_path }))?;
            }
        }
        Some(Commands::Collect) => {
            let mut collector = open_collector(&resolve_config()?)?;
            run_collect(&mut collector, output_mode).await?;
            if output_mode.is_human() {
                show_stats(collector.store());
            }
        }
        Some(Commands::Run { interval }) => {
            let mut config = resolve_config()?;
            if let Some(minutes) = interval {
                config.interval_minutes = minutes;
            }
            let mut collector = open_collector(&config)?;
            run_periodic(&mut collector, &config, output_mode).await?;
        }
        Some(Commands::List) => run_list(&FactStore::open(resolve_config()?.storage), output_mode)?,
        Some(Commands::Stats) => {
            let store = FactStore::open(resolve_config()?.storage);
            if output_mode.is_human() {
                show_stats(&store);
            } else {
                emit_success(output_mode, "stats", serde_json::to_value(store.stats())?)?;
            }
        }
        None => {
            let config = resolve_config()?;
            let mut collector = open_collector(&config)?;
            run_menu(&mut collector, &config).await?;
        }
    }

    Ok(())
}

/// Render one cycle outcome
fn report_outcome(outcome: &CollectOutcome, output_mode: OutputMode, total: usize) -> anyhow::Result<()> {
    if !output_mode.is_human() {
        let mut data = serde_json::json!({
            "outcome": outcome.as_str(),
            "total": total,
        });
        match outcome {
            CollectOutcome::Added(record) => data["record"] = serde_json::to_value(record)?,
            CollectOutcome::Duplicate(preview) => data["preview"] = preview.clone().into(),
            CollectOutcome::FetchFailed(reason) => data["error"] = reason.clone().into(),
            CollectOutcome::Empty => {}
        }
        return emit_success(output_mode, "collect", data);
    }

    ui::outcome(outcome);
    Ok(())
}

fn cycle_banner() {
    println!();
    println!(
        "{} {}",
        ui::dim(&format!("[{}]", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"))),
        "Collecting fact..."
    );
}

async fn run_collect(collector: &mut HttpCollector, output_mode: OutputMode) -> anyhow::Result<()> {
    let spinner = if output_mode.is_human() {
        cycle_banner();
        Some(ui::Spinner::new(&format!("Fetching from {}", collector.source().url())))
    } else {
        None
    };

    let result = collector.collect_once().await;
    if let Some(spinner) = spinner {
        spinner.finish();
    }

    let outcome = result.map_err(|e| {
        ui::error(&e.to_string());
        e
    }).context("Failed to save the fact database")?;

    report_outcome(&outcome, output_mode, collector.store().len())
}

async fn run_periodic(collector: &mut HttpCollector, config: &CollectorConfig, output_mode: OutputMode) -> anyhow::Result<()> {
    // Installed before the first cycle starts
    let shutdown = interrupt_signal().context("Failed to listen for Ctrl+C")?;

    if output_mode.is_human() {
        ui::header("Starting Digital Fact Collector...");
        ui::info("Interval", &format!("a new fact every {} minute(s)", config.interval_minutes));
        println!("{} {}", Icons::STOP, ui::muted("Press Ctrl+C to stop"));
    }

    let mut first = true;
    let mut total = collector.store().len();
    let result = collector
        .run_periodic(config.interval(), shutdown, |outcome| {
            if output_mode.is_human() {
                cycle_banner();
            }
            if let CollectOutcome::Added(_) = outcome {
                total += 1;
            }
            if let Err(e) = report_outcome(outcome, output_mode, total) {
                tracing::warn!("Failed to report outcome: {}", e);
            }
            if first && output_mode.is_human() {
                println!("{}", ui::dim(&format!("{} facts in database", total)));
            }
            first = false;
        })
        .await;

    let session = match result {
        Ok(session) => session,
        Err(e) => {
            ui::error(&e.to_string());
            return Err(e).context("Periodic collection stopped");
        }
    };

    if output_mode.is_human() {
        println!();
        println!();
        ui::header("Stopping Digital Fact Collector...");
        ui::section(&format!("{} Session", Icons::REPEAT));
        println!("{}", ui::session_table(&session));
        show_stats(collector.store());
        println!("Goodbye!");
    } else {
        emit_success(
            output_mode,
            "run",
            serde_json::json!({
                "session": session,
                "collection": collector.store().stats(),
            }),
        )?;
    }
    Ok(())
}

fn show_stats(store: &FactStore) {
    let stats = store.stats();
    println!();
    ui::banner("DIGITAL FACT COLLECTOR - STATISTICS");
    println!("{}", ui::collection_table(&stats));
    if let Some(fact) = &stats.most_recent_fact {
        println!("{} Most recent fact:", Icons::BULB);
        println!("  {}", fact);
    }
    ui::summary_row(&format!("{} Database:", Icons::DATABASE), &store.path().display().to_string());
    println!();
}

fn run_list(store: &FactStore, output_mode: OutputMode) -> anyhow::Result<()> {
    if !output_mode.is_human() {
        return emit_success(output_mode, "list", serde_json::to_value(store.facts())?);
    }

    if store.is_empty() {
        println!();
        println!("No facts in database yet!");
        return Ok(());
    }

    println!();
    ui::banner("ALL FACTS IN DATABASE");
    for record in store.facts() {
        ui::fact_entry(record);
    }
    println!("{}", ui::dim(&"=".repeat(60)));
    Ok(())
}

async fn run_menu(collector: &mut HttpCollector, config: &CollectorConfig) -> anyhow::Result<()> {
    ui::banner("DIGITAL FACT COLLECTOR");

    if !collector.store().is_empty() {
        show_stats(collector.store());
    }

    println!();
    println!("{} Options:", Icons::GLOBE);
    println!("1. Collect a single fact now");
    println!("2. Start automatic collection (every {} minutes)", config.interval_minutes);
    println!("3. View all facts");
    println!("4. Exit");
    print!("\nEnter your choice (1-4): ");
    std::io::Write::flush(&mut std::io::stdout())?;

    let choice = console::Term::stdout().read_line()?;
    match choice.trim() {
        "1" => {
            run_collect(collector, OutputMode::Human).await?;
            show_stats(collector.store());
        }
        "2" => run_periodic(collector, config, OutputMode::Human).await?,
        "3" => run_list(collector.store(), OutputMode::Human)?,
        "4" => println!("Goodbye!"),
        _ => ui::warn("Invalid choice!"),
    }
    Ok(())
}
