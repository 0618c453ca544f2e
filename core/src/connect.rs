//! The connection primitive behind every probe.
//!
//! High-level modules depend on the [`Connector`] abstraction rather than on
//! sockets directly, so the prober can be driven by an instrumented fake in
//! tests while production code dials real TCP.

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Outcome of a single connection attempt against one port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStatus {
    /// The TCP handshake completed within the timeout.
    Open,
    /// The attempt was actively refused or ran into the timeout.
    Closed,
    /// Anything else that went wrong locally (name resolution, unreachable
    /// network, socket exhaustion). Absorbed per port, never fatal.
    Error(String),
}

/// Dials one `(target, port)` pair and classifies the outcome.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, target: &str, port: u16, limit: Duration) -> ProbeStatus;
}

/// The production connector: a timed `tokio` TCP connect.
///
/// Name resolution happens lazily inside [`TcpStream::connect`]; a target
/// that does not resolve simply fails every attempt, it never aborts a scan.
pub struct TcpConnector;

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self, target: &str, port: u16, limit: Duration) -> ProbeStatus {
        match timeout(limit, TcpStream::connect((target, port))).await {
            Ok(Ok(stream)) => {
                // Release the socket before the outcome is reported.
                drop(stream);
                ProbeStatus::Open
            }
            Ok(Err(e)) => classify_error(&e),
            Err(_elapsed) => ProbeStatus::Closed,
        }
    }
}

fn classify_error(e: &io::Error) -> ProbeStatus {
    match e.kind() {
        io::ErrorKind::ConnectionRefused | io::ErrorKind::TimedOut => ProbeStatus::Closed,
        _ => ProbeStatus::Error(e.to_string()),
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
