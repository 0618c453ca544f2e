//! # Concurrent Port Prober
//!
//! Implements the core "which ports are open" use case.
//!
//! The prober fans a port list out across a bounded pool of workers, one
//! timed connect attempt per port, and aggregates the open ports into a
//! single shared collection. Per-port failures are absorbed at the worker
//! boundary; nothing a single port does can abort the scan.

use std::sync::Arc;
use std::time::Duration;

use probr_common::config::ProbeConfig;
use probr_common::ports::PortSpec;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::error;

use crate::connect::{Connector, ProbeStatus, TcpConnector};
use crate::observer::{NullObserver, PortObserver};

/// Probes TCP ports on a single target with bounded concurrency.
pub struct PortProber {
    target: String,
    concurrency: usize,
    timeout: Duration,
    connector: Arc<dyn Connector>,
    observer: Arc<dyn PortObserver>,
}

impl PortProber {
    pub fn new(target: impl Into<String>, cfg: &ProbeConfig) -> Self {
        Self {
            target: target.into(),
            // A zero limit would deadlock admission; clamp it to one worker.
            concurrency: cfg.concurrency.max(1),
            timeout: cfg.timeout,
            connector: Arc::new(TcpConnector),
            observer: Arc::new(NullObserver),
        }
    }

    /// Swaps the connection primitive, mainly for tests.
    pub fn with_connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = connector;
        self
    }

    /// Attaches an observer that receives one event per probed port.
    pub fn with_observer(mut self, observer: Arc<dyn PortObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Probes every port in `spec` and returns the open ones, sorted
    /// ascending and deduplicated.
    ///
    /// Blocks (asynchronously) until every submitted port has been attempted.
    /// At most the configured number of connection attempts is in flight at
    /// any instant; the rest wait on the admission semaphore.
    pub async fn scan(&self, spec: &PortSpec) -> anyhow::Result<Vec<u16>> {
        if spec.is_empty() {
            return Ok(Vec::new());
        }

        let open_ports: Arc<Mutex<Vec<u16>>> = Arc::new(Mutex::new(Vec::new()));
        let gate: Arc<Semaphore> = Arc::new(Semaphore::new(self.concurrency));
        let mut workers: JoinSet<()> = JoinSet::new();

        for port in spec.iter() {
            // Admission is gated *before* spawning, so the pool never holds
            // more than `concurrency` live attempts.
            let permit = gate.clone().acquire_owned().await?;

            let target = self.target.clone();
            let timeout = self.timeout;
            let connector = Arc::clone(&self.connector);
            let observer = Arc::clone(&self.observer);
            let open_ports = Arc::clone(&open_ports);

            workers.spawn(async move {
                let status = connector.connect(&target, port, timeout).await;
                drop(permit);

                if status == ProbeStatus::Open {
                    open_ports.lock().await.push(port);
                }
                observer.on_port_result(port, &status);
            });
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                // A panicking worker counts as "not reachable" for its port.
                error!("probe worker failed: {e}");
            }
        }

        let mut result = open_ports.lock().await.clone();
        result.sort_unstable();
        result.dedup();
        Ok(result)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    /// Connector that answers from a fixed set of open ports while counting
    /// how many attempts are in flight at once.
    struct FakeConnector {
        open: HashSet<u16>,
        errors: HashSet<u16>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        attempts: AtomicUsize,
    }

    impl FakeConnector {
        fn new(open: &[u16]) -> Self {
            Self {
                open: open.iter().copied().collect(),
                errors: HashSet::new(),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                attempts: AtomicUsize::new(0),
            }
        }

        fn failing_on(mut self, errors: &[u16]) -> Self {
            self.errors = errors.iter().copied().collect();
            self
        }
    }

    #[async_trait]
    impl Connector for FakeConnector {
        async fn connect(&self, _target: &str, port: u16, _limit: Duration) -> ProbeStatus {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            // Keep the attempt alive long enough for overlap to show up.
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.errors.contains(&port) {
                ProbeStatus::Error("connection pool exhausted".to_string())
            } else if self.open.contains(&port) {
                ProbeStatus::Open
            } else {
                ProbeStatus::Closed
            }
        }
    }

    /// Observer that records every event it sees.
    struct RecordingObserver {
        events: StdMutex<Vec<(u16, ProbeStatus)>>,
    }

    impl RecordingObserver {
        fn new() -> Self {
            Self {
                events: StdMutex::new(Vec::new()),
            }
        }
    }

    impl PortObserver for RecordingObserver {
        fn on_port_result(&self, port: u16, status: &ProbeStatus) {
            self.events.lock().unwrap().push((port, status.clone()));
        }
    }

    fn spec(s: &str) -> PortSpec {
        s.parse().unwrap()
    }

    fn prober_with(cfg: &ProbeConfig, connector: Arc<FakeConnector>) -> PortProber {
        PortProber::new("198.51.100.7", cfg).with_connector(connector)
    }

    #[tokio::test]
    async fn empty_spec_is_a_no_op() {
        let connector = Arc::new(FakeConnector::new(&[]));
        let prober = prober_with(&ProbeConfig::default(), connector.clone());

        let empty = PortSpec::from_ports(Vec::new());
        let result = prober.scan(&empty).await.unwrap();
        assert!(result.is_empty());
        assert_eq!(connector.attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn returns_only_open_ports_sorted() {
        let connector = Arc::new(FakeConnector::new(&[443, 22]));
        let prober = prober_with(&ProbeConfig::default(), connector);

        let result = prober.scan(&spec("443,80,22,8080")).await.unwrap();
        assert_eq!(result, vec![22, 443]);
    }

    #[tokio::test]
    async fn duplicate_input_ports_do_not_duplicate_results() {
        let connector = Arc::new(FakeConnector::new(&[80]));
        let prober = prober_with(&ProbeConfig::default(), connector);

        let result = prober.scan(&spec("80,79-81")).await.unwrap();
        assert_eq!(result, vec![80]);
    }

    #[tokio::test]
    async fn never_exceeds_the_concurrency_ceiling() {
        let connector = Arc::new(FakeConnector::new(&[]));
        let cfg = ProbeConfig {
            concurrency: 8,
            ..ProbeConfig::default()
        };
        let prober = prober_with(&cfg, connector.clone());

        prober.scan(&spec("1-200")).await.unwrap();

        let peak = connector.max_in_flight.load(Ordering::SeqCst);
        assert!(peak <= 8, "saw {peak} attempts in flight, limit is 8");
        assert_eq!(connector.attempts.load(Ordering::SeqCst), 200);
    }

    #[tokio::test]
    async fn no_updates_are_lost_under_contention() {
        // Every probed port is open, so any lost append is visible in the
        // final count. Repeat to give a race a chance to show.
        for _ in 0..10 {
            let connector = Arc::new(FakeConnector::new(
                &(1000..1064).collect::<Vec<u16>>(),
            ));
            let cfg = ProbeConfig {
                concurrency: 16,
                ..ProbeConfig::default()
            };
            let prober = prober_with(&cfg, connector);

            let result = prober.scan(&spec("1000-1063")).await.unwrap();
            assert_eq!(result.len(), 64);
            assert_eq!(result, (1000..1064).collect::<Vec<u16>>());
        }
    }

    #[tokio::test]
    async fn per_port_errors_are_absorbed() {
        let connector = Arc::new(FakeConnector::new(&[25]).failing_on(&[26, 27]));
        let prober = prober_with(&ProbeConfig::default(), connector.clone());

        let result = prober.scan(&spec("25-28")).await.unwrap();
        assert_eq!(result, vec![25]);
        assert_eq!(connector.attempts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn observer_sees_exactly_one_event_per_port() {
        let connector = Arc::new(FakeConnector::new(&[53]).failing_on(&[55]));
        let observer = Arc::new(RecordingObserver::new());
        let prober = prober_with(&ProbeConfig::default(), connector)
            .with_observer(observer.clone());

        prober.scan(&spec("53-56")).await.unwrap();

        let mut events = observer.events.lock().unwrap().clone();
        events.sort_by_key(|(port, _)| *port);
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], (53, ProbeStatus::Open));
        assert_eq!(events[1], (54, ProbeStatus::Closed));
        assert!(matches!(events[2], (55, ProbeStatus::Error(_))));
        assert_eq!(events[3], (56, ProbeStatus::Closed));
    }

    #[tokio::test]
    async fn repeated_scans_agree() {
        let connector = Arc::new(FakeConnector::new(&[110, 143]));
        let prober = prober_with(&ProbeConfig::default(), connector);

        let first = prober.scan(&spec("100-150")).await.unwrap();
        let second = prober.scan(&spec("100-150")).await.unwrap();
        assert_eq!(first, vec![110, 143]);
        assert_eq!(first, second);
    }
}
