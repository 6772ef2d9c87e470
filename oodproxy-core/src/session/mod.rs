//! Remote-desktop client launch
//!
//! The launcher's job is not finished until the session ends, so both
//! clients are waited on until the user closes them.

pub mod rdp;
pub mod vnc;
