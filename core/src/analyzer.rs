//! # Security Log Analyzer
//!
//! Sequential scan of a text log: counts requests per IPv4 address and flags
//! lines matching a small set of suspicious patterns. Completely independent
//! of the prober; the two share no state.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::Context;
use regex::Regex;

const MESSAGE_PREVIEW_LEN: usize = 100;

/// One pattern-matched line worth surfacing in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// 1-based line number in the source file.
    pub line: usize,
    pub ip: String,
    /// The offending line, truncated to a preview length.
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    High,
}

/// Aggregated outcome of one analyzer run.
#[derive(Debug, Default)]
pub struct LogReport {
    request_counts: HashMap<String, usize>,
    alerts: Vec<Alert>,
}

impl LogReport {
    /// Every alert, in file order. Rendering may cap this; the report keeps
    /// them all.
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn request_counts(&self) -> &HashMap<String, usize> {
        &self.request_counts
    }

    /// The `n` busiest IPs, most requests first. Ties break on the address
    /// so the order is stable.
    pub fn top_talkers(&self, n: usize) -> Vec<(String, usize)> {
        let mut talkers: Vec<(String, usize)> = self
            .request_counts
            .iter()
            .map(|(ip, count)| (ip.clone(), *count))
            .collect();
        talkers.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        talkers.truncate(n);
        talkers
    }
}

pub struct LogAnalyzer {
    ip_pattern: Regex,
    suspicious_patterns: Vec<Regex>,
}

impl LogAnalyzer {
    pub fn new() -> anyhow::Result<Self> {
        let suspicious = [
            r"(?i)(\d+\.\d+\.\d+\.\d+).*?(failed|error|unauthorized|forbidden)",
            r"(?i)(\d+\.\d+\.\d+\.\d+).*?(admin|root|administrator)",
            r"(?i)(\d+\.\d+\.\d+\.\d+).*?(sql|script|exec|cmd)",
        ];

        Ok(Self {
            ip_pattern: Regex::new(r"(\d+\.\d+\.\d+\.\d+)")?,
            suspicious_patterns: suspicious
                .iter()
                .map(|p| Regex::new(p))
                .collect::<Result<Vec<Regex>, regex::Error>>()?,
        })
    }

    /// Streams `path` line by line and builds the report.
    pub fn analyze(&self, path: &Path) -> anyhow::Result<LogReport> {
        let file = File::open(path)
            .with_context(|| format!("cannot open log file '{}'", path.display()))?;
        let reader = BufReader::new(file);

        let mut report = LogReport::default();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("failed reading '{}'", path.display()))?;
            self.process_line(line.trim(), idx + 1, &mut report);
        }

        Ok(report)
    }

    fn process_line(&self, line: &str, line_num: usize, report: &mut LogReport) {
        let Some(ip) = self.ip_pattern.find(line) else {
            return;
        };
        let ip = ip.as_str().to_string();
        *report.request_counts.entry(ip.clone()).or_insert(0) += 1;

        // One alert per line is enough, whichever pattern fires first.
        if self
            .suspicious_patterns
            .iter()
            .any(|pattern| pattern.is_match(line))
        {
            report.alerts.push(Alert {
                line: line_num,
                ip,
                message: preview(line),
                severity: Severity::High,
            });
        }
    }
}

fn preview(line: &str) -> String {
    if line.chars().count() > MESSAGE_PREVIEW_LEN {
        let cut: String = line.chars().take(MESSAGE_PREVIEW_LEN).collect();
        format!("{cut}...")
    } else {
        line.to_string()
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
