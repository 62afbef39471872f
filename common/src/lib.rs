//! Shared building blocks for the `isoseed` workspace.
//!
//! * [`config`]: the run configuration, built once by the CLI and passed by reference.
//! * [`network`]: IPv4 helpers used when deriving host records.

pub mod config;
pub mod network;
