//! Schemaforge
//!
//! Relational schema designer and Yii migration command compiler.
//!
//! This is the main entry point for the command-line tool.

use colored::Colorize;
use schemaforge_cli::{Cli, CliError};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() {
    // Initialize logging
    let filter =
        EnvFilter::try_from_env("SCHEMAFORGE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args();
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = schemaforge_cli::run(cli, &mut stdout) {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("{} {:#}", "error:".red().bold(), e);
        let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
        std::process::exit(code);
    }
}
