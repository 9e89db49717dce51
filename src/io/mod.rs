//! File I/O: CSV ingest, CSV export, and comparison JSON.

pub mod comparison;
pub mod export;
pub mod ingest;
