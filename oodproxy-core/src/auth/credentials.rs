//! Keyring operations for transient RDP credential injection
//!
//! Uses the system keyring to hold the RDP session credential under a
//! fixed synthetic target tied to the loopback endpoint. The entry exists
//! only for the lifetime of the run and is removed unconditionally during
//! cleanup.

use crate::error::{CredentialError, Result};
use crate::types::Password;
use keyring::Entry;
use tracing::debug;

/// Synthetic credential target for the tunneled RDP endpoint
pub const RDP_CREDENTIAL_TARGET: &str = "TERMSRV/127.0.0.1";

/// A live credential entry owned by this run
///
/// At most one binding exists at a time; dropping the run context removes
/// it through [`CredentialBinding::remove`].
#[derive(Debug)]
pub struct CredentialBinding {
    target: String,
    username: String,
}

impl CredentialBinding {
    /// The credential target identifier
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Remove the credential entry from the keyring
    pub fn remove(&self) -> std::result::Result<(), CredentialError> {
        let entry = Entry::new(&self.target, &self.username)
            .map_err(|_| CredentialError::ServiceUnavailable)?;

        entry
            .delete_credential()
            .map_err(|_| CredentialError::RemoveFailed)?;

        debug!("Removed RDP credential for {}", self.target);
        Ok(())
    }
}

/// Store the RDP session credential in the system keyring
pub fn store_rdp_credentials(username: &str, password: &Password) -> Result<CredentialBinding> {
    let entry = Entry::new(RDP_CREDENTIAL_TARGET, username)
        .map_err(|_| CredentialError::ServiceUnavailable)?;

    entry
        .set_password(password.expose())
        .map_err(|_| CredentialError::StoreFailed)?;

    debug!("Stored RDP credential for {}", RDP_CREDENTIAL_TARGET);

    Ok(CredentialBinding {
        target: RDP_CREDENTIAL_TARGET.to_string(),
        username: username.to_string(),
    })
}
