mod extract;
mod page;
mod query;
mod watch;

use std::error::Error;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::warn;

use crate::page::{PageSnapshot, SnapshotPage};
use crate::watch::ChangeWatcher;

/// Application configuration from CLI
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Config {
    /// Print a Spotify search URL instead of the bare search query
    #[arg(long)]
    url: bool,
    /// Poll interval in milliseconds for re-checking the page
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,
    /// Delay in milliseconds before the single not-yet-loaded retry
    #[arg(long, default_value_t = 500)]
    retry_ms: u64,
    /// Log at debug level on stderr regardless of RUST_LOG
    #[arg(long)]
    debug_log: bool,
}

/// Reads newline-delimited JSON page snapshots on stdin, resolves each
/// distinct title/video to an (artist, song) candidate and prints one
/// search query (or URL) per resolution.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cfg = Config::parse();

    let filter = if cfg.debug_log {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let page = SnapshotPage::new();
    let watcher =
        ChangeWatcher::with_retry_delay(page.clone(), Duration::from_millis(cfg.retry_ms));

    let (update_tx, mut update_rx) = mpsc::channel(32);
    let (signal_tx, signal_rx) = mpsc::channel(32);
    let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

    tokio::spawn(watch::listen(
        watcher,
        update_tx,
        Duration::from_millis(cfg.interval_ms),
        signal_rx,
        shutdown_rx,
    ));

    // Feed snapshots from stdin; every applied snapshot is one "page may
    // have changed" signal. EOF shuts the watcher down.
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match PageSnapshot::from_json(line) {
                        Ok(snapshot) => {
                            page.apply(snapshot);
                            if signal_tx.send(()).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => warn!("skipping snapshot line: {e}"),
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("stdin read error: {e}");
                    break;
                }
            }
        }
        let _ = shutdown_tx.send(()).await;
    });

    // A pending resolution followed by its retry can repeat the same
    // candidate; print each query once per title.
    let mut last_printed: Option<String> = None;
    while let Some(update) = update_rx.recv().await {
        let out = if cfg.url {
            query::search_url(&update.candidate)
        } else {
            query::search_query(&update.candidate)
        };
        if last_printed.as_deref() != Some(out.as_str()) {
            println!("{out}");
            last_printed = Some(out);
        }
    }
    Ok(())
}
