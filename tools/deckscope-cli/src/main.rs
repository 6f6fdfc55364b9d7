//! Deckscope command-line tool
//!
//! Analyzes a Commander deck from a Moxfield/Archidekt URL or a pasted
//! decklist, writes the JSON report and prints a short summary. Also
//! manages the label configuration and the card cache.

mod render;

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use deckscope::{
    AnalysisEvent, AnalysisReport, Analyzer, CardCache, Endpoints, EventSink, FetcherConfig,
    LabelConfig, LabelEngine, RateLimitedFetcher,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const CONFIG_FILE: &str = "labels_config.json";
const CACHE_FILE: &str = "scryfall_cache.json";
const OUTPUT_DIR: &str = "output";

/// Deck analyzed by `analyze --demo`.
const DEMO_DECK: &str = "Name: Demo Deck
Commander: Atraxa, Praetors' Voice
1 Sol Ring
1 Command Tower
1 Cultivate
1 Kodama's Reach
1 Demonic Tutor
1 Mana Vault
1 Birds of Paradise
1 Rhystic Study
1 Brainstorm
1 Swords to Plowshares
1 Wrath of God
1 Island
1 Forest
1 Mountain";

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("deckscope")
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("deckscope")
}

/// CLI arguments
#[derive(Parser)]
#[command(name = "deckscope")]
#[command(about = "Label Commander decks card by card and profile their strategy")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Label configuration file (created with defaults if missing)
    #[arg(short, long, env = "DECKSCOPE_CONFIG")]
    config: Option<PathBuf>,

    /// Card cache file
    #[arg(long, env = "DECKSCOPE_CACHE")]
    cache: Option<PathBuf>,

    /// Directory for JSON reports
    #[arg(short, long, env = "DECKSCOPE_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Minimum gap between remote requests, in milliseconds
    #[arg(long, env = "DECKSCOPE_MIN_INTERVAL_MS", default_value_t = 120)]
    min_interval_ms: u64,

    /// Attempts per remote request before giving up
    #[arg(long, env = "DECKSCOPE_MAX_RETRIES", default_value_t = 5)]
    max_retries: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a deck URL or decklist
    Analyze {
        /// Deck URL or decklist text; read from stdin when omitted
        input: Option<String>,
        /// Read the decklist from a file
        #[arg(short, long, conflicts_with = "input")]
        file: Option<PathBuf>,
        /// Analyze the built-in demo deck
        #[arg(long, conflicts_with_all = ["input", "file"])]
        demo: bool,
        /// Print the full report as JSON instead of the summary
        #[arg(long)]
        json: bool,
    },
    /// Look up and label a single card
    Card {
        /// Exact card name
        name: String,
    },
    /// Inspect or maintain the card cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Manage the label configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Clone, Subcommand)]
enum CacheAction {
    /// Show entry counts
    Stats,
    /// Remove every cached card
    Clear,
    /// Remove cached lookup failures so they are retried
    PurgeErrors,
}

#[derive(Clone, Subcommand)]
enum ConfigAction {
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Print the active configuration
    Show,
    /// Print the configuration file path
    Path,
}

/// Resolved file locations
#[derive(Debug, Clone)]
struct Paths {
    config: PathBuf,
    cache: PathBuf,
    output_dir: PathBuf,
}

impl Paths {
    fn from_cli(cli: &Cli) -> Self {
        Self {
            config: cli
                .config
                .clone()
                .unwrap_or_else(|| default_config_dir().join(CONFIG_FILE)),
            cache: cli
                .cache
                .clone()
                .unwrap_or_else(|| default_data_dir().join(CACHE_FILE)),
            output_dir: cli
                .output_dir
                .clone()
                .unwrap_or_else(|| default_data_dir().join(OUTPUT_DIR)),
        }
    }
}

fn build_analyzer(cli: &Cli, paths: &Paths) -> Result<Analyzer<RateLimitedFetcher>> {
    let config = LabelConfig::load_or_create(&paths.config)
        .with_context(|| format!("Failed to load label config {}", paths.config.display()))?;
    let engine = LabelEngine::new(&config).context("Label config has an invalid rule")?;

    let fetcher = RateLimitedFetcher::new(
        FetcherConfig::default()
            .with_min_interval(Duration::from_millis(cli.min_interval_ms))
            .with_max_retries(cli.max_retries),
    )?;
    let cache = CardCache::load(&paths.cache);
    info!(
        config = %paths.config.display(),
        cache = %paths.cache.display(),
        cached_cards = cache.len(),
        rules = engine.rule_count(),
        "analyzer ready"
    );

    Ok(Analyzer::new(
        Arc::new(fetcher),
        Arc::new(cache),
        Endpoints::default(),
        engine,
    )?)
}

fn read_input(input: Option<String>, file: Option<PathBuf>, demo: bool) -> Result<String> {
    if demo {
        return Ok(DEMO_DECK.to_string());
    }
    if let Some(input) = input {
        return Ok(input);
    }
    if let Some(file) = file {
        return fs::read_to_string(&file)
            .with_context(|| format!("Failed to read decklist {}", file.display()));
    }
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read decklist from stdin")?;
    Ok(text)
}

/// Writes `<dir>/<sanitized deck name>_labels.json`.
fn write_report(dir: &Path, report: &AnalysisReport) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    let path = dir.join(format!("{}_labels.json", report.file_stem()));
    let json = serde_json::to_string_pretty(report)?;
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Drains the event stream until its terminal event.
async fn consume_events(mut events: UnboundedReceiver<AnalysisEvent>) -> Result<AnalysisReport> {
    let mut total = 0;
    while let Some(event) = events.recv().await {
        match event {
            AnalysisEvent::Status(line) => eprintln!("{line}"),
            AnalysisEvent::Log(line) => info!("{line}"),
            AnalysisEvent::ProgressInit(count) => total = count,
            AnalysisEvent::Progress(done) => {
                if done == total {
                    eprintln!("Fetched {done}/{total} cards");
                }
            }
            AnalysisEvent::Finished(report) => return Ok(*report),
            AnalysisEvent::Failed(message) => bail!("Analysis failed: {message}"),
        }
    }
    bail!("Analysis ended without a result")
}

async fn analyze(cli: &Cli, paths: &Paths, text: String, json: bool) -> Result<()> {
    if text.trim().is_empty() {
        bail!("No deck given: paste a deck URL or a decklist");
    }

    let analyzer = Arc::new(build_analyzer(cli, paths)?);
    let report = consume_events(analyzer.spawn(text)).await?;

    match write_report(&paths.output_dir, &report) {
        Ok(path) => info!("Wrote report to {}", path.display()),
        Err(error) => warn!("Report not saved: {error:#}"),
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render::summary(&report));
        if let Some(image) = &report.commander_image {
            println!("Commander image: {image}");
        }
    }
    Ok(())
}

async fn inspect_card(cli: &Cli, paths: &Paths, name: &str) -> Result<()> {
    let analyzer = build_analyzer(cli, paths)?;
    let (sink, mut events) = EventSink::channel();

    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                AnalysisEvent::Status(line) => eprintln!("{line}"),
                AnalysisEvent::Log(line) => warn!("{line}"),
                _ => {}
            }
        }
    });

    let report = analyzer.inspect_card(name.trim(), 1, &sink).await;
    drop(sink);
    printer.await.context("Event printer stopped unexpectedly")?;

    print!("{}", render::card(&report));
    Ok(())
}

fn cache_command(paths: &Paths, action: CacheAction) -> Result<()> {
    let cache = CardCache::load(&paths.cache);
    match action {
        CacheAction::Stats => {
            println!("Cache: {}", paths.cache.display());
            println!("Cards: {}", cache.len());
            println!("Failed lookups: {}", cache.error_count());
        }
        CacheAction::Clear => {
            let count = cache.len();
            cache.clear().context("Failed to clear card cache")?;
            info!("Removed {count} cached cards");
        }
        CacheAction::PurgeErrors => {
            let removed = cache
                .purge_errors()
                .context("Failed to purge card cache")?;
            info!("Removed {removed} failed lookups");
        }
    }
    Ok(())
}

fn config_command(paths: &Paths, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init { force } => {
            if paths.config.exists() && !force {
                warn!(
                    "{} already exists, use --force to overwrite",
                    paths.config.display()
                );
                return Ok(());
            }
            LabelConfig::default()
                .save(&paths.config)
                .with_context(|| format!("Failed to write {}", paths.config.display()))?;
            info!("Wrote default label config to {}", paths.config.display());
        }
        ConfigAction::Show => {
            let config = LabelConfig::load_or_create(&paths.config)
                .with_context(|| format!("Failed to load {}", paths.config.display()))?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Path => println!("{}", paths.config.display()),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let paths = Paths::from_cli(&cli);

    match &cli.command {
        Commands::Analyze {
            input,
            file,
            demo,
            json,
        } => {
            let text = read_input(input.clone(), file.clone(), *demo)?;
            analyze(&cli, &paths, text, *json).await
        }
        Commands::Card { name } => inspect_card(&cli, &paths, name).await,
        Commands::Cache { action } => cache_command(&paths, action.clone()),
        Commands::Config { action } => config_command(&paths, action.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckscope::{CardDetails, CardReport, LabelSet, aggregate, derive, matchup};
    use std::collections::BTreeMap;

    fn empty_report(name: &str) -> AnalysisReport {
        let aggregate = aggregate(&BTreeMap::new(), &BTreeMap::new());
        AnalysisReport {
            deck_name: name.to_string(),
            commanders: Vec::new(),
            commander_image: None,
            cards: vec![CardReport {
                name: "Island".into(),
                quantity: 1,
                card: CardDetails::default(),
                error: None,
                labels: LabelSet::new(),
            }],
            derived: derive(&aggregate),
            matchup: matchup(&aggregate),
            aggregate,
        }
    }

    #[test]
    fn test_default_dirs() {
        assert!(default_config_dir().to_string_lossy().contains("deckscope"));
        assert!(default_data_dir().to_string_lossy().contains("deckscope"));
    }

    #[test]
    fn test_paths_prefer_flags() {
        let cli = Cli::try_parse_from([
            "deckscope",
            "--config",
            "/tmp/labels.json",
            "--output-dir",
            "/tmp/out",
            "cache",
            "stats",
        ])
        .unwrap();
        let paths = Paths::from_cli(&cli);
        assert_eq!(paths.config, PathBuf::from("/tmp/labels.json"));
        assert_eq!(paths.output_dir, PathBuf::from("/tmp/out"));
        assert!(paths.cache.ends_with(CACHE_FILE));
        assert_eq!(cli.min_interval_ms, 120);
        assert_eq!(cli.max_retries, 5);
    }

    #[test]
    fn test_demo_conflicts_with_input() {
        assert!(Cli::try_parse_from(["deckscope", "analyze", "--demo", "1 Sol Ring"]).is_err());
        assert!(Cli::try_parse_from(["deckscope", "analyze", "--demo"]).is_ok());
    }

    #[test]
    fn test_demo_deck_parses() {
        let text = read_input(None, None, true).unwrap();
        let deck = deckscope::parse_plain_deck(&text).unwrap();
        assert_eq!(deck.name, "Demo Deck");
        assert_eq!(deck.cards.len(), 14);
    }

    #[test]
    fn test_write_report_sanitizes_name() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("reports");

        let path = write_report(&out, &empty_report("Atraxa: +1/+1 Counters!")).unwrap();
        assert_eq!(path, out.join("Atraxa 11 Counters_labels.json"));

        let saved: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["deck_name"], "Atraxa: +1/+1 Counters!");
        assert_eq!(saved["cards"][0]["name"], "Island");

        let path = write_report(&out, &empty_report("???")).unwrap();
        assert!(path.ends_with("deck_labels.json"));
    }

    #[tokio::test]
    async fn test_consume_events_returns_report() {
        let (sink, events) = EventSink::channel();
        sink.emit(AnalysisEvent::ProgressInit(1));
        sink.emit(AnalysisEvent::Progress(1));
        sink.emit(AnalysisEvent::Finished(Box::new(empty_report("Done"))));
        let report = consume_events(events).await.unwrap();
        assert_eq!(report.deck_name, "Done");

        let (sink, events) = EventSink::channel();
        sink.emit(AnalysisEvent::Failed("boom".into()));
        let err = consume_events(events).await.unwrap_err();
        assert!(err.to_string().contains("boom"));

        let (sink, events) = EventSink::channel();
        drop(sink);
        assert!(consume_events(events).await.is_err());
    }
}
