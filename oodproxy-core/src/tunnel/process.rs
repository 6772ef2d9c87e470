//! stunnel process management and termination
//!
//! This module provides functions to identify, check, and terminate
//! stunnel processes that are not children of the current run (orphans
//! from a previous run).

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::process::Command;
use std::thread;
use std::time::Duration;

/// Process image name the orphan reaper matches against
pub const TUNNEL_PROCESS_NAME: &str = "stunnel";

/// Error types for process operations
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Failed to terminate process: {0}")]
    TerminationFailed(String),

    #[error("Process did not respond to signals")]
    UnresponsiveProcess,
}

/// Check whether a process with this PID exists at all
pub fn process_exists(pid: u32) -> bool {
    kill(Pid::from_raw(pid as i32), None).is_ok()
}

/// Check whether the process with this PID is an stunnel process
///
/// Matching the executable name defends against PID reuse: a marker left
/// behind by a crashed run must never cause an unrelated process to be
/// killed.
pub fn is_tunnel_process(pid: u32) -> bool {
    let output = Command::new("ps")
        .args(["-p", &pid.to_string(), "-o", "comm="])
        .output();

    match output {
        Ok(out) => {
            if out.status.success() {
                let comm = String::from_utf8_lossy(&out.stdout);
                comm.trim().contains(TUNNEL_PROCESS_NAME)
            } else {
                false
            }
        }
        Err(_) => false,
    }
}

/// Terminate a non-child stunnel process gracefully
///
/// Sends SIGTERM first, waits up to 5 seconds, then sends SIGKILL if the
/// process is still alive. Succeeds immediately if the process is already
/// gone.
pub fn terminate(pid: u32) -> Result<(), ProcessError> {
    let target = Pid::from_raw(pid as i32);

    if !process_exists(pid) {
        return Ok(()); // Already terminated
    }

    if let Err(e) = kill(target, Signal::SIGTERM) {
        if e == nix::errno::Errno::ESRCH {
            return Ok(());
        }
        return Err(ProcessError::TerminationFailed(format!(
            "Failed to send SIGTERM: {}",
            e
        )));
    }

    // Wait up to 5 seconds for graceful termination
    for _ in 0..10 {
        thread::sleep(Duration::from_millis(500));
        if !process_exists(pid) {
            return Ok(());
        }
    }

    // Process still alive, send SIGKILL (forceful termination)
    if let Err(e) = kill(target, Signal::SIGKILL) {
        if e == nix::errno::Errno::ESRCH {
            return Ok(());
        }
        return Err(ProcessError::TerminationFailed(format!(
            "Failed to send SIGKILL: {}",
            e
        )));
    }

    thread::sleep(Duration::from_millis(500));

    if process_exists(pid) {
        Err(ProcessError::UnresponsiveProcess)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_exists_for_own_pid() {
        assert!(process_exists(std::process::id()));
    }

    #[test]
    fn test_process_exists_with_nonexistent_pid() {
        // PID 99999999 should not exist
        assert!(!process_exists(99999999));
    }

    #[test]
    fn test_is_tunnel_process_with_pid_1() {
        // PID 1 (init/systemd) exists but is not stunnel
        assert!(!is_tunnel_process(1));
    }

    #[test]
    fn test_is_tunnel_process_with_nonexistent_pid() {
        assert!(!is_tunnel_process(99999999));
    }

    #[test]
    fn test_terminate_nonexistent_process() {
        // Should succeed (process already gone)
        assert!(terminate(99999999).is_ok());
    }
}
