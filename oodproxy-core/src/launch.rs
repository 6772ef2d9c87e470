//! Top-level launch flow
//!
//! Drives the whole run on a single thread: orphan reaping, certificate
//! staging, tunnel start, readiness wait, session launch. Whatever the
//! outcome, cleanup runs before the result is handed back.

use crate::config::{LaunchConfig, Protocol};
use crate::context::RunContext;
use crate::error::{ConfigError, Result, TunnelError};
use crate::staging::{stage_certificates, StagingArea};
use crate::tunnel::readiness::DEFAULT_READY_TIMEOUT;
use crate::tunnel::{reap_orphans, start_tunnel, wait_until_ready};
use crate::{auth, session};
use std::path::Path;
use tracing::info;

/// Load a launch file and run the session it describes
///
/// Configuration errors abort before any resource is acquired.
pub fn run_from_path(path: &Path) -> Result<()> {
    let config = crate::config::load_config(path)?;
    run(&config)
}

/// Run a session from a validated configuration
///
/// Cleanup is unconditional: every early return above still passes
/// through [`RunContext::cleanup`] before this function returns.
pub fn run(config: &LaunchConfig) -> Result<()> {
    let mut ctx = RunContext::new();
    let result = run_session(config, &mut ctx);
    ctx.cleanup();
    info!("Cleanup complete");
    result
}

fn run_session(config: &LaunchConfig, ctx: &mut RunContext) -> Result<()> {
    let reaped = reap_orphans();
    if reaped > 0 {
        info!("Reaped {} orphaned tunnel process(es)", reaped);
    }

    let staging = StagingArea::create()?;
    let staging_dir = staging.root().to_path_buf();
    ctx.staging = Some(staging);

    let certs = stage_certificates(&staging_dir, config)?;

    let handle = start_tunnel(&config.remote_proxy, &certs, &staging_dir)?;
    let local_port = handle.local_port();
    ctx.tunnel = Some(handle);

    info!("Waiting for stunnel to open port {}...", local_port);
    if !wait_until_ready(local_port, DEFAULT_READY_TIMEOUT) {
        return Err(TunnelError::ReadyTimeout {
            seconds: DEFAULT_READY_TIMEOUT.as_secs(),
        }
        .into());
    }
    info!("stunnel port is ready");

    match config.protocol {
        Protocol::Rdp => {
            // load_config enforces these for rdp; re-checked here so the
            // flow never depends on construction order.
            let username = config.username.as_deref().ok_or(ConfigError::MissingField {
                field: "USERNAME".to_string(),
            })?;
            let password = config.password.as_ref().ok_or(ConfigError::MissingField {
                field: "PASSWORD".to_string(),
            })?;

            ctx.credentials = Some(auth::store_rdp_credentials(username, password)?);
            session::rdp::launch(local_port, username, config.fullscreen, &staging_dir)?;
        }
        Protocol::Vnc => {
            let password = config.password.as_ref().ok_or(ConfigError::MissingField {
                field: "PASSWORD".to_string(),
            })?;
            session::vnc::launch(local_port, password, config.fullscreen)?;
        }
    }

    Ok(())
}
