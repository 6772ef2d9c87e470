//! Ephemeral staging directory and certificate staging
//!
//! Each run owns one staging directory under the system temp location.
//! It holds the decoded certificate material, the rendered stunnel
//! configuration, and (for RDP) the generated session file. The directory
//! is removed recursively during final cleanup and never reused across
//! runs.

use crate::config::LaunchConfig;
use crate::error::{Result, StageError};
use data_encoding::BASE64;
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Fixed filenames for the staged certificate material
const CERT_FILE: &str = "cert.pem";
const KEY_FILE: &str = "key.pem";
const CA_FILE: &str = "ca.pem";

/// Paths of the three staged certificate files
#[derive(Debug, Clone)]
pub struct CertPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
    pub ca: PathBuf,
}

/// An exclusively-owned ephemeral directory for this run
#[derive(Debug)]
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    /// Create a fresh staging directory under the system temp location
    ///
    /// The name carries a random component so it is never reused across
    /// runs.
    pub fn create() -> Result<Self> {
        let suffix: u32 = rand::thread_rng().gen();
        let root = std::env::temp_dir().join(format!("stunnel-{:08x}", suffix));
        fs::create_dir(&root)?;
        debug!("Created staging directory: {}", root.display());
        Ok(Self { root })
    }

    /// The staging directory path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Remove the staging directory and everything in it
    ///
    /// Best-effort: failures are logged, never propagated. Safe to call
    /// when the directory is already gone.
    pub fn remove(&self) {
        if self.root.exists() {
            debug!("Removing staging directory: {}", self.root.display());
            if let Err(e) = fs::remove_dir_all(&self.root) {
                warn!(
                    "Failed to remove staging directory {}: {}",
                    self.root.display(),
                    e
                );
            }
        }
    }
}

/// Decode the three certificate blobs and write them into `dir`
///
/// Idempotent: re-running with the same inputs overwrites the files.
///
/// # Errors
///
/// Returns `StageError::Decode` if a blob is not valid base64 and
/// `StageError::Io` if a write fails.
pub fn stage_certificates(dir: &Path, config: &LaunchConfig) -> Result<CertPaths> {
    let cert = write_decoded(dir, CERT_FILE, "CRT_BASE64", &config.crt_base64)?;
    let key = write_decoded(dir, KEY_FILE, "KEY_BASE64", &config.key_base64)?;
    let ca = write_decoded(dir, CA_FILE, "CACRT_BASE64", &config.cacrt_base64)?;

    debug!("Certificates decoded and written to {}", dir.display());
    Ok(CertPaths { cert, key, ca })
}

fn write_decoded(dir: &Path, filename: &str, field: &'static str, blob: &str) -> Result<PathBuf> {
    let bytes = BASE64
        .decode(blob.as_bytes())
        .map_err(|_| StageError::Decode { field })?;

    let path = dir.join(filename);
    fs::write(&path, bytes).map_err(|source| StageError::Io {
        path: path.display().to_string(),
        source,
    })?;

    Ok(path)
}
