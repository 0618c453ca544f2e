use std::path::Path;

use colored::*;
use tracing::info;

use probr_core::analyzer::{LogAnalyzer, LogReport};

use crate::terminal::print;

const MAX_ALERT_ROWS: usize = 10;
const TOP_TALKERS: usize = 5;

pub fn logs(log_file: &Path) -> anyhow::Result<()> {
    print::header("log analysis report");

    let analyzer = LogAnalyzer::new()?;
    let report = analyzer.analyze(log_file)?;

    render_alerts(&report);
    render_top_talkers(&report);
    Ok(())
}

fn render_alerts(report: &LogReport) {
    let alerts = report.alerts();
    if alerts.is_empty() {
        info!("No security alerts found");
        return;
    }

    info!(
        "{} security alerts (showing up to {})",
        alerts.len().to_string().bold().red(),
        MAX_ALERT_ROWS
    );
    for alert in alerts.iter().take(MAX_ALERT_ROWS) {
        print::line(&format!(
            "  {} {} {} {}",
            format!("line {:>5}", alert.line).cyan(),
            alert.ip.yellow(),
            alert.message,
            format!("{:?}", alert.severity).to_uppercase().red().bold()
        ));
    }
}

fn render_top_talkers(report: &LogReport) {
    let talkers = report.top_talkers(TOP_TALKERS);
    if talkers.is_empty() {
        info!("No IP addresses found in the log");
        return;
    }

    print::header("most active ips");
    for (ip, count) in &talkers {
        let unit: &str = if *count == 1 { "request" } else { "requests" };
        print::aligned_line(ip, 16, &format!("{count} {unit}").normal());
    }
}
