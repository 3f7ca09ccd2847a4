//! CLI command implementations.

pub mod diff;
