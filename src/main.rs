use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use mangoview::script::{load_script, run_script};
use mangoview::view::LogView;
use mangoview::{init_logging, AppEvent, Config, DirectoryPageSource, LoadOutcome, ViewerSession};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "mangoview",
    version,
    about = "Replay pointer input against page metadata and print the resulting events"
)]
struct Cli {
    /// Directory holding page{N}.json metadata (overrides the config)
    pages: Option<PathBuf>,
    /// JSON script of input steps to replay
    script: Option<PathBuf>,
    /// Config file (.toml or .json)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Page to open first (overrides the config)
    #[arg(long)]
    page: Option<usize>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config.or_else(|| Config::default_path().ok()) {
        Some(path) => Config::load_or_default(&path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(pages) = cli.pages {
        config.pages.directory = pages;
    }

    init_logging(&config.logging.level)?;
    info!(
        "MangoView {} (built {})",
        mangoview::VERSION,
        mangoview::BUILD_DATE
    );

    let source = DirectoryPageSource::from_settings(&config.pages);
    let mut session = ViewerSession::new(&config, LogView::default());
    let printer = print_events(session.bus().receiver());

    let first = cli.page.unwrap_or(config.pages.first_page);
    if let LoadOutcome::Failed { error } = session.load(&source, first).await {
        return Err(error).with_context(|| {
            format!("no page to show in {}", source.directory().display())
        });
    }

    if let Some(path) = cli.script {
        let steps = load_script(&path)?;
        run_script(&mut session, &source, &steps).await;
    }

    // Dropping the session closes the bus, which ends the printer
    drop(session);
    printer.await?;

    Ok(())
}

/// Prints every event as one JSON line on stdout.
fn print_events(mut events: broadcast::Receiver<AppEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(line) => println!("{}", line),
                    Err(e) => warn!("Failed to encode event: {}", e),
                },
                Err(RecvError::Lagged(skipped)) => warn!("{} events not printed", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    })
}
