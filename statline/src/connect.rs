//! Outbound connection management: a single-attempt connect, reconnect
//! backoff, and the state machine that drives ingestion into the shared
//! store.

use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpStream;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::frame::FrameReader;
use crate::history::SharedStore;

const BACKOFF_INITIAL: Duration = Duration::from_millis(500);
const BACKOFF_MAX: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("connection to {addr} failed: {source}")]
    Connect {
        addr: String,
        source: std::io::Error,
    },
}

/// Single connection attempt, no retry.
pub async fn connect(addr: &str) -> Result<TcpStream, ClientError> {
    TcpStream::connect(addr)
        .await
        .map_err(|source| ClientError::Connect {
            addr: addr.to_string(),
            source,
        })
}

/// Doubling delay between failed connect attempts, reset on success.
pub struct Backoff {
    initial: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max: max.max(initial),
            current: initial,
        }
    }

    /// Delay to wait before the next attempt.
    pub fn next_delay(&mut self) -> Duration {
        let d = self.current;
        self.current = (self.current * 2).min(self.max);
        d
    }

    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(BACKOFF_INITIAL, BACKOFF_MAX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnState {
    Disconnected,
    Connecting,
    Streaming,
}

/// Reconnecting consumer: Disconnected -> Connecting -> Streaming and back,
/// indefinitely. A closed or failed stream returns to Connecting with
/// backoff; only process termination ends the loop.
pub struct Connector {
    addr: String,
    backoff: Backoff,
    state: ConnState,
}

impl Connector {
    pub fn new(addr: String) -> Self {
        Self {
            addr,
            backoff: Backoff::default(),
            state: ConnState::Disconnected,
        }
    }

    fn set_state(&mut self, next: ConnState) {
        if self.state != next {
            debug!("connection state: {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    pub async fn run(mut self, store: SharedStore) {
        loop {
            self.set_state(ConnState::Connecting);
            let stream = match connect(&self.addr).await {
                Ok(s) => s,
                Err(e) => {
                    let wait = self.backoff.next_delay();
                    warn!("{e}; retrying in {wait:?}");
                    self.set_state(ConnState::Disconnected);
                    sleep(wait).await;
                    continue;
                }
            };
            self.backoff.reset();
            self.set_state(ConnState::Streaming);
            info!("connected to {}", self.addr);

            let mut reader = FrameReader::new(stream);
            loop {
                match reader.next_sample().await {
                    Ok(Some(sample)) => store.lock().await.record(&sample),
                    Ok(None) => {
                        info!("producer closed the stream");
                        break;
                    }
                    Err(e) => {
                        warn!("stream read failed: {e}");
                        break;
                    }
                }
            }
            self.set_state(ConnState::Disconnected);
        }
    }
}
