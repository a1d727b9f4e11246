//! CLI command handlers

pub mod commands;

pub use commands::{generate, inspect, sample_records};
