//! Broadcast server. One sampling task drives the [`Sampler`] at the
//! configured cadence and publishes on a broadcast channel; the accept loop
//! hands every connection its own writer task subscribed to that channel.
//! A stalled or dead peer therefore never disturbs the sampling cadence or
//! the other consumers.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::config::AgentConfig;
use crate::sampler::Sampler;
use crate::wire::{encode_frame, Sample};

// How far a slow consumer may fall behind before it starts losing the
// oldest samples (drop-oldest overflow policy).
const CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
    #[error("accept failed: {0}")]
    Accept(#[from] std::io::Error),
}

pub struct Broadcaster {
    listener: TcpListener,
    interval: Duration,
}

impl Broadcaster {
    /// Bind the configured address. Failure here is fatal to the process.
    pub async fn bind(cfg: &AgentConfig) -> Result<Self, AgentError> {
        let addr = cfg.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| AgentError::Bind {
                addr: addr.clone(),
                source,
            })?;
        info!("listening on {addr}");
        Ok(Self {
            listener,
            interval: cfg.interval,
        })
    }

    /// Address actually bound (resolves port 0 to the assigned one).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept loop. Never returns under normal operation; shutdown is
    /// process termination.
    pub async fn run(self) -> Result<(), AgentError> {
        let tx = spawn_sampler(self.interval);
        loop {
            let (stream, peer) = self.listener.accept().await?;
            info!("client connected: {peer}");
            tokio::spawn(stream_samples(stream, peer, tx.subscribe()));
        }
    }
}

// Tick at the configured period, publishing each sample to all writers.
// Publishing to zero subscribers is not an error; sampling just continues.
fn spawn_sampler(period: Duration) -> broadcast::Sender<Sample> {
    let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
    let publisher = tx.clone();
    tokio::spawn(async move {
        let mut sampler = Sampler::new();
        let mut tick = interval(period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tick.tick().await;
            let _ = publisher.send(sampler.collect());
        }
    });
    tx
}

// Per-connection writer: forward published samples until the peer goes away.
// A write error tears down this connection only.
async fn stream_samples(
    mut stream: TcpStream,
    peer: SocketAddr,
    mut rx: broadcast::Receiver<Sample>,
) {
    loop {
        let sample = match rx.recv().await {
            Ok(s) => s,
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!("client {peer} lagging, dropped {n} samples");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };
        // write_all: the whole frame goes out even under partial writes.
        if let Err(e) = stream.write_all(&encode_frame(&sample)).await {
            info!("client {peer} disconnected: {e}");
            break;
        }
    }
}
