//! Core library for the oodproxy launcher
//!
//! This crate provides the process supervision and readiness layer for
//! TLS-tunneled remote-desktop sessions: certificate staging, stunnel
//! lifecycle management, orphan reclamation, and guaranteed cleanup.

pub mod error;
pub mod types;

pub mod auth;
pub mod config;
pub mod context;
pub mod launch;
pub mod session;
pub mod staging;
pub mod tunnel;

/// Initialize logging infrastructure
///
/// Sets up tracing with systemd journal logging when running under
/// systemd, and pretty stderr formatting otherwise. `debug` lowers the
/// filter to DEBUG (the `--debug` CLI flag).
pub fn init_logging(debug: bool) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = if debug {
        tracing_subscriber::filter::LevelFilter::DEBUG
    } else {
        tracing_subscriber::filter::LevelFilter::INFO
    };

    #[cfg(target_os = "linux")]
    {
        if std::env::var("JOURNAL_STREAM").is_ok() {
            // We're running under systemd, use journal logging
            let journal_layer = tracing_journald::layer()?;
            tracing_subscriber::registry()
                .with(journal_layer)
                .with(level)
                .init();
            return Ok(());
        }
    }

    // Fallback to stderr logging with pretty formatting
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().pretty())
        .with(level)
        .init();

    Ok(())
}
