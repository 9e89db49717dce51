//! Read/write comparison JSON files.
//!
//! Comparison JSON is the "portable" representation of an aligned run
//! comparison:
//!
//! - the percent grid and per-run point sets
//! - durations (fixed or threshold-derived) per run
//! - the optional steady-state baseline
//!
//! The schema is defined by `domain::ComparisonFile`. `tcurve chart` renders
//! one of these without needing the raw test-cell CSVs.

use std::fs::File;
use std::path::Path;

use crate::domain::{ComparablePointSet, ComparisonFile, SteadyStateReference};
use crate::error::AppError;

pub const TOOL_NAME: &str = "tcurve";

/// Write a comparison JSON file.
pub fn write_comparison_json(
    path: &Path,
    grid: &[f64],
    value_label: &str,
    sets: &[ComparablePointSet],
    steady_state: Option<&SteadyStateReference>,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::usage(format!(
            "Failed to create comparison JSON '{}': {e}",
            path.display()
        ))
    })?;

    let comparison = ComparisonFile {
        tool: TOOL_NAME.to_string(),
        generated: chrono::Local::now().date_naive(),
        value_label: value_label.to_string(),
        grid: grid.to_vec(),
        runs: sets.to_vec(),
        steady_state: steady_state.cloned(),
    };

    serde_json::to_writer_pretty(file, &comparison)
        .map_err(|e| AppError::usage(format!("Failed to write comparison JSON: {e}")))?;

    Ok(())
}

/// Read a comparison JSON file.
pub fn read_comparison_json(path: &Path) -> Result<ComparisonFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::usage(format!(
            "Failed to open comparison JSON '{}': {e}",
            path.display()
        ))
    })?;
    let comparison: ComparisonFile = serde_json::from_reader(file)
        .map_err(|e| AppError::usage(format!("Invalid comparison JSON: {e}")))?;
    Ok(comparison)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_json_round_trips() {
        let dir = std::env::temp_dir().join("tcurve-comparison");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("comparison.json");

        let sets = vec![ComparablePointSet {
            label: "Test 5".to_string(),
            duration: 3.5,
            points: vec![(0.0, 1.0), (1.0, 2.0)],
        }];
        let steady = SteadyStateReference::new(vec![(0.0, 0.9), (1.0, 2.1)]).unwrap();

        write_comparison_json(&path, &[0.0, 1.0], "Boost (kPa)", &sets, Some(&steady)).unwrap();
        let read_back = read_comparison_json(&path).unwrap();

        assert_eq!(read_back.tool, TOOL_NAME);
        assert_eq!(read_back.grid, vec![0.0, 1.0]);
        assert_eq!(read_back.runs, sets);
        assert_eq!(read_back.steady_state.unwrap().points(), steady.points());
    }
}
