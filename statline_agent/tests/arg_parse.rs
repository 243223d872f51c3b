//! Flag parsing tests for the agent, exercised through the library so no
//! process spawning is needed.

use std::time::Duration;

use statline_agent::config::{parse_args, AgentConfig};

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn defaults_survive_empty_args() {
    let cfg = parse_args(args(&["statline_agent"]), AgentConfig::default()).unwrap();
    assert_eq!(cfg, AgentConfig::default());
    assert_eq!(cfg.bind_addr(), "0.0.0.0:5000");
}

#[test]
fn long_short_and_assign_forms() {
    let cfg = parse_args(
        args(&["agent", "--host", "127.0.0.1", "--port", "9001"]),
        AgentConfig::default(),
    )
    .unwrap();
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 9001);

    let cfg = parse_args(args(&["agent", "-p", "9002", "-i", "250"]), AgentConfig::default()).unwrap();
    assert_eq!(cfg.port, 9002);
    assert_eq!(cfg.interval, Duration::from_millis(250));

    let cfg = parse_args(
        args(&["agent", "--port=9003", "--interval-ms=500", "--host=10.0.0.1"]),
        AgentConfig::default(),
    )
    .unwrap();
    assert_eq!(cfg.port, 9003);
    assert_eq!(cfg.interval, Duration::from_millis(500));
    assert_eq!(cfg.host, "10.0.0.1");
}

#[test]
fn help_and_junk_return_usage() {
    let err = parse_args(args(&["agent", "--help"]), AgentConfig::default()).unwrap_err();
    assert!(err.contains("Usage:"));
    assert!(err.contains("--interval-ms"));

    let err = parse_args(args(&["agent", "--frobnicate"]), AgentConfig::default()).unwrap_err();
    assert!(err.contains("Unexpected argument"));

    // Unparsable port is rejected rather than silently defaulted.
    assert!(parse_args(args(&["agent", "--port", "nope"]), AgentConfig::default()).is_err());
}
