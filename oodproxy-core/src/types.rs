//! Type definitions and wrappers for secure data handling
//!
//! This module provides a type-safe wrapper for the session password using
//! the secrecy crate to prevent accidental exposure in logs or debug output.

use secrecy::{ExposeSecret, Secret};

/// Wrapper for the remote-desktop session password
///
/// The password is injected transiently into the OS credential store (RDP)
/// or passed to the viewer process (VNC); it must never appear in logs or
/// debug output.
#[derive(Clone, Debug)]
pub struct Password(Secret<String>);

impl Password {
    /// Create a new Password from a plain string
    pub fn new(password: String) -> Self {
        Self(Secret::new(password))
    }

    /// Expose the password value (use with caution!)
    ///
    /// This should only be called when handing the password to the
    /// credential store or the viewer process.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl From<String> for Password {
    fn from(password: String) -> Self {
        Self::new(password)
    }
}
