//! # Port Specification Model
//!
//! Defines the textual grammar for selecting which ports to probe.
//!
//! A spec is a comma-separated list of tokens, each of which is:
//! * A single port (e.g., `80`).
//! * An inclusive dash range (e.g., `20-22`).
//!
//! Ranges expand in ascending order; the overall list keeps the order the
//! user wrote. Duplicates across tokens are kept as written (probing a port
//! twice is wasteful but harmless; the scan result deduplicates anyway).

use std::str::FromStr;

use thiserror::Error;

/// A malformed port specification, pointing at the token that broke it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidPortSpec {
    #[error("'{0}' is not a port number")]
    NotANumber(String),
    #[error("port '{0}' is outside 1-65535")]
    OutOfRange(String),
    #[error("range '{0}' is missing a bound")]
    MissingBound(String),
    #[error("range '{0}' runs backwards")]
    Backwards(String),
}

/// An ordered list of ports to probe, built once from user input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortSpec {
    ports: Vec<u16>,
}

impl PortSpec {
    /// Builds a spec directly from already-validated port numbers.
    pub fn from_ports(ports: Vec<u16>) -> Self {
        Self { ports }
    }

    pub fn ports(&self) -> &[u16] {
        &self.ports
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.ports.iter().copied()
    }
}

impl FromStr for PortSpec {
    type Err = InvalidPortSpec;

    /// Parses a spec string like `"22,80,8000-8080"` into a [`PortSpec`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ports: Vec<u16> = Vec::new();

        for token in s.split(',') {
            let token = token.trim();

            match token.split_once('-') {
                Some((start, end)) => parse_range(token, start, end, &mut ports)?,
                None => ports.push(parse_port(token)?),
            }
        }

        Ok(Self { ports })
    }
}

/// Parses a single port token, enforcing the valid TCP port range.
fn parse_port(token: &str) -> Result<u16, InvalidPortSpec> {
    let value: u32 = token
        .parse()
        .map_err(|_| InvalidPortSpec::NotANumber(token.to_string()))?;

    if !(1..=u32::from(u16::MAX)).contains(&value) {
        return Err(InvalidPortSpec::OutOfRange(token.to_string()));
    }

    Ok(value as u16)
}

/// Expands a `start-end` token into every port of the closed interval.
fn parse_range(
    token: &str,
    start: &str,
    end: &str,
    ports: &mut Vec<u16>,
) -> Result<(), InvalidPortSpec> {
    let (start, end) = (start.trim(), end.trim());

    if start.is_empty() || end.is_empty() {
        return Err(InvalidPortSpec::MissingBound(token.to_string()));
    }

    let start_port = parse_port(start)?;
    let end_port = parse_port(end)?;

    if start_port > end_port {
        return Err(InvalidPortSpec::Backwards(token.to_string()));
    }

    ports.extend(start_port..=end_port);
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
