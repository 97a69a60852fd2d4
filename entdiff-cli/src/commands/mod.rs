//! Command implementations for the entdiff CLI
//!
//! Each command module provides a `run` function that executes the command logic.

pub mod files;
pub mod log;
pub mod tree;
