//! Per-run resource context and cleanup coordination
//!
//! Every resource acquired during a run (credential binding, tunnel
//! handle with its marker file, staging directory) is owned by one
//! [`RunContext`], and [`RunContext::cleanup`] releases them in reverse
//! acquisition order on every exit path. Each step is independently
//! guarded: a failure in one never prevents the others from running, and
//! none of them propagates an error.

use crate::auth::CredentialBinding;
use crate::staging::StagingArea;
use crate::tunnel::TunnelHandle;
use tracing::{debug, warn};

/// Owner of everything a run acquires
#[derive(Debug, Default)]
pub struct RunContext {
    pub staging: Option<StagingArea>,
    pub tunnel: Option<TunnelHandle>,
    pub credentials: Option<CredentialBinding>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release every acquired resource
    ///
    /// Idempotent: each slot is taken on first cleanup, so a second call
    /// is a no-op. Guarantees no run leaves behind a credential entry, a
    /// running tunnel process, a stray marker, or staged certificate
    /// material.
    pub fn cleanup(&mut self) {
        if let Some(binding) = self.credentials.take() {
            debug!("Removing RDP credential binding");
            if let Err(e) = binding.remove() {
                warn!("Failed to remove credential binding: {}", e);
            }
        }

        if let Some(mut handle) = self.tunnel.take() {
            // stop() terminates the process and deletes the marker file,
            // each step guarded and logged internally.
            handle.stop();
        }

        if let Some(staging) = self.staging.take() {
            staging.remove();
        }
    }
}

// Unwinding must release resources too. cleanup() is idempotent, so the
// explicit call at the end of the launch flow and this impl never
// double-release.
impl Drop for RunContext {
    fn drop(&mut self) {
        self.cleanup();
    }
}
