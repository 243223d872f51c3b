//! Agent configuration: bind address, port, and sampling interval.
//! Defaults are 0.0.0.0:5000 with a 2 second cadence; STATLINE_* environment
//! variables override the defaults and command-line flags override both.

use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    pub host: String,
    pub port: u16,
    pub interval: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl AgentConfig {
    /// Defaults overridden by STATLINE_HOST / STATLINE_PORT /
    /// STATLINE_INTERVAL_MS where set and parsable.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(v) = std::env::var("STATLINE_HOST") {
            if !v.is_empty() {
                cfg.host = v;
            }
        }
        if let Some(p) = std::env::var("STATLINE_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            cfg.port = p;
        }
        if let Some(ms) = std::env::var("STATLINE_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            cfg.interval = Duration::from_millis(ms);
        }
        cfg
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Apply command-line flags on top of a base config. `Err` carries the usage
/// text, returned for -h/--help and for anything unrecognized.
pub fn parse_args<I: IntoIterator<Item = String>>(
    args: I,
    base: AgentConfig,
) -> Result<AgentConfig, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "statline_agent".into());
    let usage =
        format!("Usage: {prog} [--host ADDR|-H ADDR] [--port PORT|-p PORT] [--interval-ms MS|-i MS]");
    let mut cfg = base;

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(usage),
            "--host" | "-H" => {
                cfg.host = it.next().ok_or_else(|| usage.clone())?;
            }
            "--port" | "-p" => {
                cfg.port = it
                    .next()
                    .and_then(|v| v.parse().ok())
                    .ok_or_else(|| usage.clone())?;
            }
            "--interval-ms" | "-i" => {
                let ms: u64 = it
                    .next()
                    .and_then(|v| v.parse().ok())
                    .ok_or_else(|| usage.clone())?;
                cfg.interval = Duration::from_millis(ms);
            }
            _ if arg.starts_with("--host=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        cfg.host = v.to_string();
                    }
                }
            }
            _ if arg.starts_with("--port=") => {
                cfg.port = arg
                    .split_once('=')
                    .and_then(|(_, v)| v.parse().ok())
                    .ok_or_else(|| usage.clone())?;
            }
            _ if arg.starts_with("--interval-ms=") => {
                let ms: u64 = arg
                    .split_once('=')
                    .and_then(|(_, v)| v.parse().ok())
                    .ok_or_else(|| usage.clone())?;
                cfg.interval = Duration::from_millis(ms);
            }
            _ => return Err(format!("Unexpected argument '{arg}'. {usage}")),
        }
    }
    Ok(cfg)
}
