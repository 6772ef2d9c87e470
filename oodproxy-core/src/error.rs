//! Error types for the oodproxy launcher
//!
//! This module defines all error types used throughout the application,
//! providing consistent error handling and user-friendly error messages.

use thiserror::Error;

/// Main error type for the oodproxy application
#[derive(Error, Debug)]
pub enum LaunchError {
    /// Errors related to launch-file loading/validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors related to certificate staging
    #[error("Certificate staging error: {0}")]
    Stage(#[from] StageError),

    /// Errors related to the tunnel subprocess
    #[error("Tunnel error: {0}")]
    Tunnel(#[from] TunnelError),

    /// Errors related to credential injection
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    /// Errors related to the remote-desktop client
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Launch-file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("The launch file could not be found: {path}")]
    LoadFailed { path: String },

    #[error("'{field}' is missing or empty")]
    MissingField { field: String },

    #[error("Unsupported protocol '{proto}': only 'rdp' and 'vnc' are supported")]
    UnsupportedProtocol { proto: String },
}

/// Certificate staging errors
#[derive(Error, Debug)]
pub enum StageError {
    #[error("'{field}' is not valid base64")]
    Decode { field: &'static str },

    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Tunnel subprocess errors
#[derive(Error, Debug)]
pub enum TunnelError {
    #[error("stunnel executable not found in any known installation path")]
    ExecutableNotFound,

    #[error("Failed to spawn stunnel: {reason}")]
    SpawnFailed { reason: String },

    #[error("stunnel exited immediately after start")]
    ExitedImmediately,

    #[error("Tunnel did not become ready within {seconds} seconds")]
    ReadyTimeout { seconds: u64 },
}

/// Keyring credential-injection errors
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Keyring service unavailable")]
    ServiceUnavailable,

    #[error("Failed to store RDP credential in keyring")]
    StoreFailed,

    #[error("Failed to remove RDP credential from keyring")]
    RemoveFailed,
}

/// Remote-desktop client errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("{client} is not installed{hint}")]
    ClientNotFound {
        client: &'static str,
        hint: &'static str,
    },

    #[error("Failed to launch {client}: {reason}")]
    LaunchFailed {
        client: &'static str,
        reason: String,
    },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, LaunchError>;
