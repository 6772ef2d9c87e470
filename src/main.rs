//! oodproxy - TLS-tunneled remote desktop launcher
//!
//! Stages session certificates, supervises an stunnel client subprocess,
//! and hands the decrypted local endpoint to an RDP or VNC client.

use clap::Parser;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "oodproxy")]
#[command(about = "Launch a TLS-tunneled remote desktop session via stunnel")]
struct Cli {
    /// Path to the launch file (KEY=VALUE session descriptor)
    config: PathBuf,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    if let Err(e) = oodproxy_core::init_logging(cli.debug) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(2);
    }

    match cli::launch::run_launch(&cli.config) {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            cli::launch::report_failure(&e);
            std::process::exit(1);
        }
    }
}
