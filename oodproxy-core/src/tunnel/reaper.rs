//! Orphaned tunnel reclamation
//!
//! A run that crashes before cleanup leaves behind its stunnel process
//! and PID marker. Each new run scans the marker location first and
//! reclaims whatever it finds: the marker is deleted in every case, and
//! the recorded process is terminated only when it still is an stunnel
//! process (PID reuse by an unrelated process must never get it killed).
//!
//! Nothing here is fatal. Failing to reap an orphan must not block
//! starting a new session, so every error is logged and swallowed.

use crate::tunnel::process;
use crate::tunnel::supervisor::{MARKER_PREFIX, MARKER_SUFFIX};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Reap stale tunnel markers from the system temp directory
///
/// Returns the number of orphaned processes terminated.
pub fn reap_orphans() -> usize {
    reap_orphans_in(&std::env::temp_dir())
}

/// Reap stale tunnel markers from a specific directory
pub fn reap_orphans_in(dir: &Path) -> usize {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot scan {} for orphan markers: {}", dir.display(), e);
            return 0;
        }
    };

    let mut terminated = 0;

    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !name.starts_with(MARKER_PREFIX) || !name.ends_with(MARKER_SUFFIX) {
            continue;
        }

        // The marker content is the decimal PID. Unparseable content is
        // garbage; the marker is still deleted.
        let pid = fs::read_to_string(&path)
            .ok()
            .and_then(|s| s.trim().parse::<u32>().ok());

        if let Some(pid) = pid {
            if process::process_exists(pid) && process::is_tunnel_process(pid) {
                info!("Killing orphaned stunnel process (PID {})", pid);
                match process::terminate(pid) {
                    Ok(()) => terminated += 1,
                    Err(e) => warn!("Failed to terminate orphan PID {}: {}", pid, e),
                }
            } else {
                debug!("Marker {} references no live stunnel process", name);
            }
        } else {
            debug!("Marker {} has unparseable content, discarding", name);
        }

        // Deleted regardless of termination outcome; reaping is idempotent
        // so a concurrent run racing on the same marker is harmless.
        if let Err(e) = fs::remove_file(&path) {
            warn!("Failed to delete marker {}: {}", path.display(), e);
        }
    }

    terminated
}
