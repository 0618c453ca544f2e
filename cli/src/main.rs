mod commands;
mod terminal;

use commands::{CommandLine, Commands, logs, scan};
use terminal::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init();

    match commands.command {
        Commands::Scan {
            target,
            ports,
            threads,
            timeout_ms,
        } => scan::scan(target, ports, threads, timeout_ms).await,
        Commands::Logs { log_file } => logs::logs(&log_file),
    }
}
