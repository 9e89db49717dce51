//! `transient-curves` library crate.
//!
//! The binary (`tcurve`) is a thin wrapper around this library so that:
//!
//! - the alignment engine is testable without spawning processes
//! - modules are reusable (e.g., future report generators, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
pub mod units;
