//! Client configuration: which producer to stream from. The address comes
//! from a positional HOST:PORT argument, --addr, or STATLINE_ADDR, in that
//! order of precedence.

pub const DEFAULT_ADDR: &str = "127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub addr: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.into(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(v) = std::env::var("STATLINE_ADDR") {
            if !v.is_empty() {
                cfg.addr = v;
            }
        }
        cfg
    }
}

/// Apply command-line arguments on top of a base config. `Err` carries the
/// usage text.
pub fn parse_args<I: IntoIterator<Item = String>>(
    args: I,
    base: ClientConfig,
) -> Result<ClientConfig, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "statline".into());
    let usage = format!("Usage: {prog} [--addr HOST:PORT|-a HOST:PORT] [HOST:PORT]");
    let mut cfg = base;
    let mut positional_seen = false;

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(usage),
            "--addr" | "-a" => {
                cfg.addr = it.next().ok_or_else(|| usage.clone())?;
            }
            _ if arg.starts_with("--addr=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        cfg.addr = v.to_string();
                    }
                }
            }
            _ if !arg.starts_with('-') => {
                if positional_seen {
                    return Err(format!("Unexpected argument '{arg}'. {usage}"));
                }
                positional_seen = true;
                cfg.addr = arg;
            }
            _ => return Err(format!("Unexpected argument '{arg}'. {usage}")),
        }
    }
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn default_addr_without_args() {
        let cfg = parse_args(args(&["statline"]), ClientConfig::default()).unwrap();
        assert_eq!(cfg.addr, DEFAULT_ADDR);
    }

    #[test]
    fn positional_flag_and_assign_forms() {
        let cfg = parse_args(args(&["statline", "10.0.0.2:5000"]), ClientConfig::default()).unwrap();
        assert_eq!(cfg.addr, "10.0.0.2:5000");

        let cfg = parse_args(
            args(&["statline", "--addr", "example:6000"]),
            ClientConfig::default(),
        )
        .unwrap();
        assert_eq!(cfg.addr, "example:6000");

        let cfg = parse_args(args(&["statline", "-a", "host:1"]), ClientConfig::default()).unwrap();
        assert_eq!(cfg.addr, "host:1");

        let cfg = parse_args(
            args(&["statline", "--addr=host:2"]),
            ClientConfig::default(),
        )
        .unwrap();
        assert_eq!(cfg.addr, "host:2");
    }

    #[test]
    fn help_and_extra_positionals_return_usage() {
        assert!(parse_args(args(&["statline", "--help"]), ClientConfig::default())
            .unwrap_err()
            .contains("Usage:"));
        assert!(parse_args(
            args(&["statline", "a:1", "b:2"]),
            ClientConfig::default()
        )
        .is_err());
    }
}
