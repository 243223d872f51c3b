//! Loopback integration: run the broadcaster on an ephemeral port and check
//! that concurrent consumers each receive a decodable stream, and that one
//! consumer leaving does not stop service for the others.

use std::time::Duration;

use statline_agent::broadcast::Broadcaster;
use statline_agent::config::AgentConfig;
use statline_agent::wire::{decode_frame, Sample};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;

fn test_config() -> AgentConfig {
    AgentConfig {
        host: "127.0.0.1".into(),
        port: 0,
        interval: Duration::from_millis(50),
    }
}

async fn read_sample(stream: &mut BufReader<TcpStream>) -> Sample {
    let mut line = String::new();
    let n = timeout(Duration::from_secs(5), stream.read_line(&mut line))
        .await
        .expect("timed out waiting for a frame")
        .expect("read frame");
    assert!(n > 0, "stream closed unexpectedly");
    decode_frame(line.trim().as_bytes()).expect("frame decodes")
}

#[tokio::test]
async fn fans_out_to_concurrent_consumers() {
    let broadcaster = Broadcaster::bind(&test_config()).await.expect("bind");
    let addr = broadcaster.local_addr().expect("local addr");
    let server = tokio::spawn(broadcaster.run());

    let mut a = BufReader::new(TcpStream::connect(addr).await.expect("connect a"));
    let mut b = BufReader::new(TcpStream::connect(addr).await.expect("connect b"));

    let sa = read_sample(&mut a).await;
    let sb = read_sample(&mut b).await;
    for s in [sa, sb] {
        assert!((0.0..=100.0).contains(&s.cpu_usage));
        assert!((0.0..=100.0).contains(&s.memory_usage));
        assert!((-1.0..=100.0).contains(&s.gpu_usage));
    }

    // One consumer leaving must not affect the other.
    drop(a);
    let _ = read_sample(&mut b).await;
    let _ = read_sample(&mut b).await;

    server.abort();
}

#[tokio::test]
async fn keeps_accepting_after_a_client_departs() {
    let broadcaster = Broadcaster::bind(&test_config()).await.expect("bind");
    let addr = broadcaster.local_addr().expect("local addr");
    let server = tokio::spawn(broadcaster.run());

    {
        let mut first = BufReader::new(TcpStream::connect(addr).await.expect("connect"));
        let _ = read_sample(&mut first).await;
    }

    // A later client still gets served.
    let mut second = BufReader::new(TcpStream::connect(addr).await.expect("reconnect"));
    let _ = read_sample(&mut second).await;

    server.abort();
}

#[tokio::test]
async fn bind_conflict_is_reported() {
    let first = Broadcaster::bind(&test_config()).await.expect("bind");
    let taken = first.local_addr().expect("local addr");

    let cfg = AgentConfig {
        host: "127.0.0.1".into(),
        port: taken.port(),
        interval: Duration::from_millis(50),
    };
    let err = Broadcaster::bind(&cfg).await.err().expect("second bind fails");
    assert!(err.to_string().contains("failed to bind"));
}
