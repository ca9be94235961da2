//! wst-cli library root.
//!
//! Re-exports the configuration, roster file handling and command bodies
//! so that integration tests can exercise them without going through the
//! argument parser.

pub mod commands;
pub mod config;
pub mod session;
