//! Transient credential injection for the remote-desktop client

pub mod credentials;

pub use credentials::{store_rdp_credentials, CredentialBinding, RDP_CREDENTIAL_TARGET};
