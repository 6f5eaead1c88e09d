//! Main entry point for gpgpass.

use clap::Parser;
use gpgpass::cli::Cli;
use gpgpass::utils::error_exit;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Clean up any edit buffers left behind by an interrupted session
    if let Err(e) = gpgpass::secure_temp::cleanup_old_temp_files() {
        tracing::warn!(error = %e, "failed to clean up old temp files");
    }

    if let Err(e) = cli.execute() {
        error_exit(&e.to_string(), 1);
    }
}
