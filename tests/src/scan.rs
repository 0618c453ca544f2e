#![cfg(test)]
use std::time::{Duration, Instant};

use probr_common::config::ProbeConfig;
use probr_common::ports::PortSpec;
use probr_core::prober::PortProber;
use tokio::net::TcpListener;

/// Binds a listener on an ephemeral loopback port and keeps it alive.
async fn open_listener() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind loopback listener");
    let port = listener.local_addr().expect("listener has no addr").port();
    (listener, port)
}

/// Finds a port that is very likely closed: bind, read the port, drop.
async fn closed_port() -> u16 {
    let (listener, port) = open_listener().await;
    drop(listener);
    port
}

fn loopback_prober(cfg: &ProbeConfig) -> PortProber {
    PortProber::new("127.0.0.1", cfg)
}

#[tokio::test]
async fn finds_the_listening_port_and_skips_the_closed_one() {
    let (_guard, open) = open_listener().await;
    let closed = closed_port().await;

    let prober = loopback_prober(&ProbeConfig::default());
    let spec = PortSpec::from_ports(vec![open, closed]);

    let result = prober.scan(&spec).await.expect("scan failed");
    assert_eq!(result, vec![open], "expected exactly the listening port");
}

#[tokio::test]
async fn repeated_scans_of_a_stable_target_agree() {
    let (_guard_a, a) = open_listener().await;
    let (_guard_b, b) = open_listener().await;
    let closed = closed_port().await;

    let prober = loopback_prober(&ProbeConfig::default());
    let spec = PortSpec::from_ports(vec![a, b, closed]);

    let first = prober.scan(&spec).await.expect("first scan failed");
    let second = prober.scan(&spec).await.expect("second scan failed");

    let mut expected = vec![a, b];
    expected.sort_unstable();
    assert_eq!(first, expected);
    assert_eq!(first, second);
}

#[tokio::test]
async fn many_simultaneously_open_ports_all_show_up() {
    // A pile of live listeners probed with a small worker pool; any lost
    // append or duplicate would change the result length.
    let mut guards = Vec::new();
    let mut ports = Vec::new();
    for _ in 0..24 {
        let (listener, port) = open_listener().await;
        guards.push(listener);
        ports.push(port);
    }

    let cfg = ProbeConfig {
        concurrency: 6,
        ..ProbeConfig::default()
    };
    let prober = loopback_prober(&cfg);
    let spec = PortSpec::from_ports(ports.clone());

    let result = prober.scan(&spec).await.expect("scan failed");

    ports.sort_unstable();
    assert_eq!(result, ports);
}

#[tokio::test]
async fn unreachable_target_finishes_near_the_configured_timeout() {
    // TEST-NET-1 is reserved and should never answer; with everything
    // admitted at once the whole scan is bounded by one timeout, give or
    // take scheduling.
    let cfg = ProbeConfig {
        concurrency: 16,
        timeout: Duration::from_millis(300),
    };
    let prober = PortProber::new("192.0.2.1", &cfg);
    let spec = PortSpec::from_ports((4000..4016).collect());

    let start = Instant::now();
    let result = prober.scan(&spec).await.expect("scan failed");
    let elapsed = start.elapsed();

    assert!(result.is_empty(), "reserved address reported open ports");
    assert!(
        elapsed < Duration::from_secs(5),
        "scan took {elapsed:?}, attempts are not being abandoned on timeout"
    );
}
