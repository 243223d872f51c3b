//! Entry point for the statline agent: parse flags, init logging, serve.

use anyhow::Result;
use statline_agent::broadcast::Broadcaster;
use statline_agent::config::{self, AgentConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = match config::parse_args(std::env::args(), AgentConfig::from_env()) {
        Ok(cfg) => cfg,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(());
        }
    };

    let broadcaster = Broadcaster::bind(&cfg).await?;
    broadcaster.run().await?;
    Ok(())
}
