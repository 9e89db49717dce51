//! Terminal reporting for aligned comparisons.

mod format;

pub use format::{format_comparison_table, format_run_summary};
