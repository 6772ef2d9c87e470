//! Launch command implementation
//!
//! User-facing wrapper around the core launch flow: progress output here,
//! supervision and cleanup in oodproxy-core.

use colored::Colorize;
use oodproxy_core::error::{LaunchError, TunnelError};
use std::path::Path;
use tracing::info;

/// Run a complete launch from a launch-file path
pub fn run_launch(path: &Path) -> Result<(), LaunchError> {
    println!("{}", "Starting OOD proxy client".bold());
    info!("Starting OOD proxy client");

    oodproxy_core::launch::run_from_path(path)?;

    println!("{}", "Session ended.".green());
    Ok(())
}

/// Print a failure to the user
///
/// A readiness timeout gets its own wording so it is distinguishable from
/// a configuration mistake.
pub fn report_failure(error: &LaunchError) {
    match error {
        LaunchError::Tunnel(TunnelError::ReadyTimeout { seconds }) => {
            eprintln!(
                "{}",
                format!(
                    "The tunnel did not become ready within {} seconds.\n\
                     The remote endpoint may be unreachable or the local port busy.",
                    seconds
                )
                .red()
            );
        }
        other => eprintln!("{}", format!("{}", other).red()),
    }
}
