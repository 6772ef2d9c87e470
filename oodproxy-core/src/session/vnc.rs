//! VNC session launch
//!
//! Hands the tunnel's local endpoint to the TurboVNC viewer. A missing
//! viewer is not a launch failure: the user gets an install hint and the
//! run ends cleanly through the usual cleanup path.

use crate::error::{Result, SessionError};
use crate::types::Password;
use std::path::PathBuf;
use std::process::Command;
use tracing::{info, warn};

const CLIENT_NAME: &str = "TurboVNC";

/// Per-machine TurboVNC installation path, probed before PATH
const TURBOVNC_VIEWER: &str = "/opt/TurboVNC/bin/vncviewer";

/// Launch the VNC viewer against the tunnel's local port
///
/// Blocks until the user closes the viewer.
pub fn launch(local_port: u16, password: &Password, fullscreen: bool) -> Result<()> {
    let Some(viewer) = find_viewer() else {
        warn!("TurboVNC is not installed; VNC connections are not available");
        eprintln!(
            "TurboVNC is not installed.\n\n\
             Please install it from: https://www.turbovnc.org/Downloads.html\n\
             Until then, VNC connections cannot be used."
        );
        return Ok(());
    };

    let mut cmd = Command::new(&viewer);
    cmd.args(["-SecurityTypes", "VncAuth"])
        .args(["-Password", password.expose()]);
    if fullscreen {
        cmd.arg("-FullScreen");
    }
    cmd.arg(format!("127.0.0.1::{}", local_port));

    info!("Launching VNC session via {}", viewer.display());
    let status = cmd.status().map_err(|e| SessionError::LaunchFailed {
        client: CLIENT_NAME,
        reason: e.to_string(),
    })?;

    info!("VNC viewer exited with {}", status);
    Ok(())
}

fn find_viewer() -> Option<PathBuf> {
    let installed = PathBuf::from(TURBOVNC_VIEWER);
    if installed.is_file() {
        return Some(installed);
    }
    which::which("vncviewer").ok()
}
