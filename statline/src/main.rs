//! Entry point for the statline client: parse args, start the ingest task
//! and the console display tick.

use anyhow::Result;
use statline::config::{self, ClientConfig};
use statline::connect::Connector;
use statline::{display, history};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so the display readout owns stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cfg = match config::parse_args(std::env::args(), ClientConfig::from_env()) {
        Ok(cfg) => cfg,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(());
        }
    };

    let store = history::shared(history::HISTORY_CAP);
    let ingest = tokio::spawn(Connector::new(cfg.addr).run(store.clone()));

    tokio::select! {
        _ = display::run_display(store) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
        }
    }

    ingest.abort();
    Ok(())
}
