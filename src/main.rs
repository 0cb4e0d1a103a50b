use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use hnreader::api::{HnClient, Listing};
use hnreader::app::{App, AppEvent, Route};
use hnreader::config::Config;
use hnreader::ui;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Get the config directory path (~/.config/hnreader/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("hnreader"))
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OrderingArg {
    Top,
    Best,
    New,
}

impl From<OrderingArg> for Listing {
    fn from(arg: OrderingArg) -> Self {
        match arg {
            OrderingArg::Top => Listing::Top,
            OrderingArg::Best => Listing::Best,
            OrderingArg::New => Listing::New,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "hnreader", version, about = "Terminal Hacker News reader")]
struct Args {
    /// Config file (default: ~/.config/hnreader/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// API base URL (overrides config)
    #[arg(long, value_name = "URL")]
    api_base: Option<String>,

    /// Initial story ordering
    #[arg(long, value_enum)]
    ordering: Option<OrderingArg>,

    /// Open an item directly
    #[arg(long, value_name = "ID", conflicts_with = "comments")]
    item: Option<u64>,

    /// Start on the newest comments feed
    #[arg(long)]
    comments: bool,

    /// Write logs to FILE instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

/// Install the tracing subscriber.
///
/// The TUI owns the terminal, so stderr logging defaults to errors only;
/// a log file defaults to info. `RUST_LOG` overrides either.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file '{}'", path.display()))?;
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_deref())?;

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => get_config_dir()?.join("config.toml"),
    };
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from '{}'", config_path.display()))?;

    // CLI flags override the config file
    if let Some(base) = args.api_base {
        config.api_base_url = base;
    }

    let client = HnClient::from_config(&config)
        .with_context(|| format!("Invalid API base URL '{}'", config.api_base_url))?;
    tracing::info!(base_url = client.base_url(), "Starting hnreader");

    let mut app = App::new(client, config);
    if let Some(ordering) = args.ordering {
        app.stories.set_ordering(ordering.into());
    }
    app.route = match (args.item, args.comments) {
        (Some(id), _) => Route::Item(id),
        (None, true) => Route::Comments,
        (None, false) => Route::Home,
    };

    // Create event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(64);

    ui::run(&mut app, event_tx, event_rx).await?;
    Ok(())
}
