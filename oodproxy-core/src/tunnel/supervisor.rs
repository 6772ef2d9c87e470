//! stunnel subprocess lifecycle: spawn, PID-marker tracking, termination
//!
//! The supervisor picks an ephemeral local port, renders an stunnel client
//! configuration into the staging directory, spawns the tunnel detached
//! from the terminal, and records its PID in a marker file so a future
//! run can reap it if this run crashes before cleanup.

use crate::error::{Result, TunnelError};
use crate::staging::CertPaths;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Marker-file naming convention, stable across versions so orphan
/// detection keeps working after upgrades.
pub const MARKER_PREFIX: &str = "stunnel-rdp-proxy-";
pub const MARKER_SUFFIX: &str = ".pid";

/// High ephemeral port range for the local accept endpoint
const PORT_RANGE: std::ops::RangeInclusive<u16> = 49152..=65534;

/// Well-known machine-scope stunnel installation paths, probed in order
/// before the per-user path and PATH
const INSTALL_PATHS: [&str; 4] = [
    "/usr/bin/stunnel",
    "/usr/bin/stunnel4",
    "/usr/local/bin/stunnel",
    "/opt/stunnel/bin/stunnel",
];

/// Per-user installation path relative to `$HOME`
const USER_INSTALL_PATH: &str = ".local/bin/stunnel";

/// Handle to the one running tunnel subprocess of this run
#[derive(Debug)]
pub struct TunnelHandle {
    pid: u32,
    local_port: u16,
    marker_path: PathBuf,
    child: Option<Child>,
}

impl TunnelHandle {
    /// The local port the tunnel accepts plaintext connections on
    pub fn local_port(&self) -> u16 {
        self.local_port
    }

    /// The tunnel subprocess PID
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Path of the PID marker file owned by this handle
    pub fn marker_path(&self) -> &Path {
        &self.marker_path
    }

    /// Terminate the tunnel process and delete its marker file
    ///
    /// Idempotent: safe to call multiple times and safe when the process
    /// has already exited. Sends SIGTERM first, escalates to SIGKILL after
    /// a bounded wait. Failures are logged, never propagated.
    pub fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            match child.try_wait() {
                Ok(Some(status)) => {
                    debug!("stunnel (PID {}) already exited: {}", self.pid, status);
                }
                _ => {
                    info!("Terminating stunnel process (PID {})", self.pid);
                    if let Err(e) = kill(Pid::from_raw(self.pid as i32), Signal::SIGTERM) {
                        if e != nix::errno::Errno::ESRCH {
                            warn!("Failed to send SIGTERM to stunnel: {}", e);
                        }
                    }

                    // try_wait reaps the child, so a terminated process is
                    // not misread as alive while it sits in zombie state.
                    let mut exited = false;
                    for _ in 0..20 {
                        thread::sleep(Duration::from_millis(100));
                        if matches!(child.try_wait(), Ok(Some(_))) {
                            exited = true;
                            break;
                        }
                    }

                    if !exited {
                        warn!("stunnel did not respond to SIGTERM, sending SIGKILL");
                        if let Err(e) = child.kill() {
                            warn!("Failed to SIGKILL stunnel: {}", e);
                        }
                        let _ = child.wait();
                    }
                }
            }
        }

        if self.marker_path.exists() {
            debug!("Deleting PID marker {}", self.marker_path.display());
            if let Err(e) = fs::remove_file(&self.marker_path) {
                warn!(
                    "Failed to delete PID marker {}: {}",
                    self.marker_path.display(),
                    e
                );
            }
        }
    }
}

/// Start the stunnel client subprocess
///
/// Picks a pseudo-random local port (a collision with an already-bound
/// port is possible and surfaces later as a readiness timeout, not here),
/// renders the tunnel configuration into the staging directory, spawns
/// stunnel detached from the terminal, and writes the PID marker file.
///
/// # Errors
///
/// `TunnelError::ExecutableNotFound` if no stunnel installation exists
/// (nothing is spawned in that case), `TunnelError::SpawnFailed` if the
/// OS refuses the spawn, and `TunnelError::ExitedImmediately` if the
/// process dies right after start (configuration or executable fault).
pub fn start_tunnel(
    remote_proxy: &str,
    certs: &CertPaths,
    staging_dir: &Path,
) -> Result<TunnelHandle> {
    let local_port = pick_local_port();
    info!("Starting stunnel proxy on 127.0.0.1:{}", local_port);

    let conf = render_tunnel_config(local_port, remote_proxy, certs);
    let conf_path = staging_dir.join("stunnel.conf");
    fs::write(&conf_path, conf)?;

    let executable = find_tunnel_executable().ok_or(TunnelError::ExecutableNotFound)?;
    debug!("Launching stunnel from {}", executable.display());

    let mut child = Command::new(&executable)
        .arg(&conf_path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| TunnelError::SpawnFailed {
            reason: e.to_string(),
        })?;

    if let Ok(Some(status)) = child.try_wait() {
        warn!("stunnel exited immediately with {}", status);
        return Err(TunnelError::ExitedImmediately.into());
    }

    let pid = child.id();
    let marker_path = marker_path_for(pid);
    if let Err(e) = fs::write(&marker_path, pid.to_string()) {
        // Without a marker a crash would leave an untraceable orphan, so
        // the spawn is rolled back instead.
        let _ = child.kill();
        let _ = child.wait();
        return Err(e.into());
    }

    info!("stunnel running with PID {}, marker {}", pid, marker_path.display());

    Ok(TunnelHandle {
        pid,
        local_port,
        marker_path,
        child: Some(child),
    })
}

/// Marker path for a tunnel PID in the system temp directory
pub fn marker_path_for(pid: u32) -> PathBuf {
    std::env::temp_dir().join(format!("{}{}{}", MARKER_PREFIX, pid, MARKER_SUFFIX))
}

/// Locate the stunnel executable
///
/// Probes the machine-scope installation paths first, then the per-user
/// `~/.local/bin` install, then falls back to PATH.
pub fn find_tunnel_executable() -> Option<PathBuf> {
    find_in(&candidate_paths()).or_else(|| which::which("stunnel").ok())
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = INSTALL_PATHS.iter().map(|p| PathBuf::from(*p)).collect();
    if let Some(home) = std::env::var_os("HOME") {
        candidates.push(Path::new(&home).join(USER_INSTALL_PATH));
    }
    candidates
}

fn find_in(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| p.is_file()).cloned()
}

fn pick_local_port() -> u16 {
    rand::thread_rng().gen_range(PORT_RANGE)
}

/// Render the stunnel client configuration
///
/// `foreground = yes` keeps the spawned PID the supervised PID (stunnel
/// daemonizes on its own otherwise); the empty `pid` disables stunnel's
/// own PID file in favor of our marker convention.
fn render_tunnel_config(local_port: u16, remote_proxy: &str, certs: &CertPaths) -> String {
    format!(
        "foreground = yes\n\
         pid =\n\
         \n\
         [proxy]\n\
         client = yes\n\
         accept = 127.0.0.1:{port}\n\
         connect = {remote}\n\
         cert = {cert}\n\
         key = {key}\n\
         CAfile = {ca}\n\
         verifyChain = yes\n\
         sslVersion = TLSv1.2\n\
         options = NO_SSLv3\n\
         options = NO_TLSv1\n",
        port = local_port,
        remote = remote_proxy,
        cert = certs.cert.display(),
        key = certs.key.display(),
        ca = certs.ca.display(),
    )
}
