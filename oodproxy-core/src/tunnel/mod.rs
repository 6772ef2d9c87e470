//! Tunnel subprocess supervision
//!
//! Lifecycle management for the stunnel client subprocess: orphan
//! reclamation from previous runs, spawn and PID-marker tracking,
//! readiness polling, and guaranteed termination.

pub mod process;
pub mod readiness;
pub mod reaper;
pub mod supervisor;

pub use readiness::wait_until_ready;
pub use reaper::reap_orphans;
pub use supervisor::{start_tunnel, TunnelHandle};
