//! # Hand Control Library
//!
//! Turns per-frame hand landmark observations into discrete car commands
//! and delivers them to the embedded controller over TCP.
//! This library is used by all nodes in the dora-rs dataflow.

pub mod control;
pub mod types;
pub mod utils;

// Re-export everything for convenience
pub use control::*;
pub use types::*;
pub use utils::*;
