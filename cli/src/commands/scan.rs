use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use probr_common::config::ProbeConfig;
use probr_common::ports::PortSpec;
use probr_core::connect::ProbeStatus;
use probr_core::observer::PortObserver;
use probr_core::prober::PortProber;

use crate::terminal::print;

/// Streams one status line per probed port and keeps the progress bar fed.
struct TerminalObserver {
    progress: ProgressBar,
}

impl PortObserver for TerminalObserver {
    fn on_port_result(&self, port: u16, status: &ProbeStatus) {
        match status {
            ProbeStatus::Open => {
                info!("Port {port}: {}", "OPEN".green().bold());
            }
            ProbeStatus::Closed => {
                info!("Port {port}: {}", "CLOSED".red());
            }
            ProbeStatus::Error(desc) => {
                warn!("Port {port}: ERROR - {desc}");
            }
        }
        self.progress.inc(1);
    }
}

pub async fn scan(
    target: String,
    ports: String,
    threads: usize,
    timeout_ms: u64,
) -> anyhow::Result<()> {
    if target.trim().is_empty() {
        anyhow::bail!("target host must not be empty");
    }

    let spec: PortSpec = ports
        .parse()
        .with_context(|| format!("invalid port spec '{ports}'"))?;

    let cfg = ProbeConfig {
        concurrency: threads,
        timeout: Duration::from_millis(timeout_ms),
    };

    print::header("starting scanner");
    info!(
        "Scanning {} ({} ports, {} workers)",
        target.bold(),
        spec.len(),
        cfg.concurrency
    );

    let progress = ProgressBar::new(spec.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner:.blue} probed {pos}/{len} ports")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    progress.enable_steady_tick(Duration::from_millis(100));

    let observer = Arc::new(TerminalObserver {
        progress: progress.clone(),
    });

    let prober = PortProber::new(target.as_str(), &cfg).with_observer(observer);

    let start_time: Instant = Instant::now();
    let open_ports: Vec<u16> = prober.scan(&spec).await?;
    progress.finish_and_clear();

    scan_ends(&target, &open_ports, start_time.elapsed());
    Ok(())
}

fn scan_ends(target: &str, open_ports: &[u16], total_time: Duration) {
    if open_ports.is_empty() {
        print::header("NO OPEN PORTS DETECTED");
        print::no_results();
        return;
    }

    print::header("Open Ports Summary");
    for port in open_ports {
        print::aligned_line(&format!("Port {port}"), 12, &"OPEN".green().bold());
    }
    print_summary(target, open_ports.len(), total_time);
}

fn print_summary(target: &str, open_len: usize, total_time: Duration) {
    let found: ColoredString = format!("{open_len} open ports").bold().green();
    let elapsed: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();

    print::fat_separator();
    print::centerln(&format!("Scan of {target} complete: {found} in {elapsed}"));
}
