//! CLI command implementations

pub mod launch;
