//! Launch-file parsing and validation
//!
//! The launch file is a line-oriented `KEY=VALUE` format produced by the
//! portal that hands out session descriptors. Lines without a `=` are
//! ignored; keys and values are trimmed; later duplicates win.

use crate::error::{ConfigError, LaunchError, Result};
use crate::types::Password;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

/// Keys that must be present and non-empty in every launch file
const REQUIRED_FIELDS: [&str; 5] = [
    "REMOTE_PROXY",
    "CRT_BASE64",
    "KEY_BASE64",
    "CACRT_BASE64",
    "PROTO",
];

/// Remote-desktop protocol selected by the launch file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Rdp,
    Vnc,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Rdp => "rdp",
            Protocol::Vnc => "vnc",
        }
    }
}

impl FromStr for Protocol {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("rdp") {
            Ok(Protocol::Rdp)
        } else if s.eq_ignore_ascii_case("vnc") {
            Ok(Protocol::Vnc)
        } else {
            Err(ConfigError::UnsupportedProtocol {
                proto: s.to_string(),
            })
        }
    }
}

/// Validated launch configuration
///
/// Construction goes through [`load_config`], so every instance satisfies
/// the protocol-conditional field requirements.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// Remote stunnel endpoint, `host:port`
    pub remote_proxy: String,

    /// Base64-encoded client certificate
    pub crt_base64: String,

    /// Base64-encoded private key
    pub key_base64: String,

    /// Base64-encoded CA certificate
    pub cacrt_base64: String,

    /// Selected remote-desktop protocol
    pub protocol: Protocol,

    /// Session username (required for rdp)
    pub username: Option<String>,

    /// Session password (required for rdp and vnc)
    pub password: Option<Password>,

    /// Whether the client should start fullscreen
    pub fullscreen: bool,
}

/// Load and validate a launch file
///
/// # Errors
///
/// Returns `ConfigError::LoadFailed` if the file cannot be read,
/// `ConfigError::MissingField` if a required key is absent or empty, and
/// `ConfigError::UnsupportedProtocol` for any `PROTO` other than rdp/vnc.
pub fn load_config(path: &Path) -> Result<LaunchConfig> {
    let contents =
        std::fs::read_to_string(path).map_err(|_| ConfigError::LoadFailed {
            path: path.display().to_string(),
        })?;

    let fields = parse_fields(&contents);

    for field in REQUIRED_FIELDS {
        if fields.get(field).map_or(true, |v| v.is_empty()) {
            return Err(ConfigError::MissingField {
                field: field.to_string(),
            }
            .into());
        }
    }

    let protocol: Protocol = fields["PROTO"].parse().map_err(LaunchError::Config)?;

    // Protocol-conditional requirements: rdp needs a username and password
    // for credential injection, vnc only needs the password.
    let required_extra: &[&str] = match protocol {
        Protocol::Rdp => &["USERNAME", "PASSWORD"],
        Protocol::Vnc => &["PASSWORD"],
    };
    for field in required_extra {
        if fields.get(*field).map_or(true, |v| v.is_empty()) {
            return Err(ConfigError::MissingField {
                field: field.to_string(),
            }
            .into());
        }
    }

    let fullscreen = fields
        .get("FULLSCREEN")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    tracing::debug!("Launch file parsed successfully: proto={}", protocol.as_str());

    Ok(LaunchConfig {
        remote_proxy: fields["REMOTE_PROXY"].clone(),
        crt_base64: fields["CRT_BASE64"].clone(),
        key_base64: fields["KEY_BASE64"].clone(),
        cacrt_base64: fields["CACRT_BASE64"].clone(),
        protocol,
        username: fields.get("USERNAME").cloned(),
        password: fields.get("PASSWORD").cloned().map(Password::from),
        fullscreen,
    })
}

/// Split launch-file contents into trimmed key/value pairs
fn parse_fields(contents: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    for line in contents.lines() {
        if let Some((key, value)) = line.split_once('=') {
            fields.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    fields
}
