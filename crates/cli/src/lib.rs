//! # ShiftSync CLI
//!
//! Command-line layer - argument parsing, wiring and entry point.
//!
//! This crate contains:
//! - `shiftsync` commands (`sync`, `fetch`, `reconcile`)
//! - Application context (dependency injection)
//! - Logging setup
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - Only this crate uses `anyhow`, and only at the outermost layer

pub mod args;
pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use args::{Cli, Command, ReconcileArgs, ScrapeArgs};
pub use context::AppContext;
