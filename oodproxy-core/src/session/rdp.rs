//! RDP session launch
//!
//! Generates a session file pointing at the tunnel's local endpoint and
//! hands it to the FreeRDP client. The session credential is injected via
//! the keyring beforehand (see [`crate::auth::credentials`]), so the file
//! disables the credential prompt.

use crate::error::{Result, SessionError};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

const CLIENT_NAME: &str = "FreeRDP";

/// FreeRDP client binaries, probed in order on PATH
const CLIENT_CANDIDATES: [&str; 2] = ["xfreerdp", "xfreerdp3"];

/// Launch the RDP client against the tunnel's local port
///
/// Blocks until the user closes the session.
pub fn launch(
    local_port: u16,
    username: &str,
    fullscreen: bool,
    staging_dir: &Path,
) -> Result<()> {
    let session_path = staging_dir.join("session.rdp");
    fs::write(&session_path, render_session_file(local_port, username, fullscreen))?;
    debug!("Session file written to {}", session_path.display());

    let client = find_client().ok_or(SessionError::ClientNotFound {
        client: CLIENT_NAME,
        hint: " (install the freerdp package)",
    })?;

    info!("Launching RDP session via {}", client.display());
    let status = Command::new(&client)
        .arg(&session_path)
        .status()
        .map_err(|e| SessionError::LaunchFailed {
            client: CLIENT_NAME,
            reason: e.to_string(),
        })?;

    info!("RDP client exited with {}", status);
    Ok(())
}

fn find_client() -> Option<PathBuf> {
    CLIENT_CANDIDATES
        .iter()
        .find_map(|name| which::which(*name).ok())
}

/// Render the .rdp session file contents
///
/// `screen mode id` 2 is fullscreen, 1 windowed; authentication level 0
/// and the disabled prompt rely on the injected keyring credential.
fn render_session_file(local_port: u16, username: &str, fullscreen: bool) -> String {
    let screen_mode = if fullscreen { 2 } else { 1 };
    format!(
        "full address:s:127.0.0.1:{port}\n\
         username:s:{username}\n\
         authentication level:i:0\n\
         prompt for credentials:i:0\n\
         screen mode id:i:{screen_mode}\n",
        port = local_port,
        username = username,
        screen_mode = screen_mode,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_session_file_windowed() {
        let contents = render_session_file(50123, "alice", false);
        assert!(contents.contains("full address:s:127.0.0.1:50123"));
        assert!(contents.contains("username:s:alice"));
        assert!(contents.contains("authentication level:i:0"));
        assert!(contents.contains("prompt for credentials:i:0"));
        assert!(contents.contains("screen mode id:i:1"));
    }

    #[test]
    fn test_render_session_file_fullscreen() {
        let contents = render_session_file(50123, "alice", true);
        assert!(contents.contains("screen mode id:i:2"));
    }
}
