pub mod logs;
pub mod scan;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "probr")]
#[command(about = "A concurrent TCP port prober.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe a host for open TCP ports
    #[command(alias = "s")]
    Scan {
        /// Target host or IP address
        #[arg(long)]
        target: String,
        /// Port specification, e.g. "80,443" or "1-1000"
        #[arg(long, default_value = "1-1000")]
        ports: String,
        /// Maximum connection attempts in flight at once
        #[arg(long, default_value_t = 100)]
        threads: usize,
        /// Per-attempt connect timeout in milliseconds
        #[arg(long, default_value_t = 1000)]
        timeout_ms: u64,
    },
    /// Analyze a text log for per-IP activity and security alerts
    #[command(alias = "l")]
    Logs {
        /// Path to the log file
        #[arg(long)]
        log_file: PathBuf,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
