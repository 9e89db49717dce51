//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the engine stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{AlignConfig, ComparablePointSet, DurationSource, SteadyStateReference};
use crate::io::ingest::RowError;

/// Format the run summary (inputs, durations, ingest notes).
pub fn format_run_summary(
    config: &AlignConfig,
    sets: &[ComparablePointSet],
    row_errors: &[RowError],
    rows_read: usize,
) -> String {
    let mut out = String::new();

    out.push_str("=== tcurve - Transient Alignment ===\n");
    out.push_str(&format!("Input: {}\n", config.input.display()));
    out.push_str(&format!("Time column: {}\n", config.time_col));
    out.push_str(&format!("Quantity: {}\n", config.value_label));
    out.push_str(&format!(
        "Grid: {}\n",
        config
            .grid
            .iter()
            .map(|p| format!("{:.0}%", p * 100.0))
            .collect::<Vec<_>>()
            .join(", ")
    ));

    match &config.duration {
        DurationSource::Fixed(d) => {
            out.push_str(&format!("Duration: fixed {d:.3}s\n"));
        }
        DurationSource::Tracked {
            input,
            column,
            threshold,
        } => {
            let column = column.as_deref().unwrap_or("<run's own column>");
            match input {
                Some(path) => out.push_str(&format!(
                    "Duration: first `{column}` sample > {threshold} (tracked in {})\n",
                    path.display()
                )),
                None => out.push_str(&format!(
                    "Duration: first `{column}` sample > {threshold}\n"
                )),
            }
        }
    }

    out.push_str("\nRuns:\n");
    for set in sets {
        out.push_str(&format!(
            "- {:<12} duration={:.3}s ({} grid points)\n",
            set.label,
            set.duration,
            set.points.len()
        ));
    }

    out.push_str(&format!(
        "\nRows: read={rows_read} | skipped={}\n",
        row_errors.len()
    ));
    for err in row_errors.iter().take(5) {
        out.push_str(&format!(
            "  line {} `{}`: {}\n",
            err.line, err.column, err.message
        ));
    }
    if row_errors.len() > 5 {
        out.push_str(&format!("  ... and {} more\n", row_errors.len() - 5));
    }

    out
}

/// Format the aligned comparison table: one row per grid percent, one column
/// per run, plus the steady-state baseline when available at that percent.
pub fn format_comparison_table(
    sets: &[ComparablePointSet],
    steady: Option<&SteadyStateReference>,
) -> String {
    let mut out = String::new();
    if sets.is_empty() {
        return out;
    }

    out.push_str(&format!("{:>8}", "percent"));
    for set in sets {
        out.push_str(&format!(" {:>12}", truncate(&set.label, 12)));
    }
    if steady.is_some() {
        out.push_str(&format!(" {:>12}", "steady"));
    }
    out.push('\n');

    out.push_str(&format!("{:->8}", ""));
    for _ in sets {
        out.push_str(&format!(" {:->12}", ""));
    }
    if steady.is_some() {
        out.push_str(&format!(" {:->12}", ""));
    }
    out.push('\n');

    // All sets share the grid, in grid order; iterate the first.
    for (row, &(percent, _)) in sets[0].points.iter().enumerate() {
        out.push_str(&format!("{:>7.1}%", percent * 100.0));
        for set in sets {
            out.push_str(&format!(" {:>12.4}", set.points[row].1));
        }
        if let Some(steady) = steady {
            match steady.value_at(percent) {
                Some(v) => out.push_str(&format!(" {:>12.4}", v)),
                None => out.push_str(&format!(" {:>12}", "-")),
            }
        }
        out.push('\n');
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
