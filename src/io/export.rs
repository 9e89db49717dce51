//! Export aligned comparison points to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts: one row per `(run, grid point)`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::ComparablePointSet;
use crate::error::AppError;

/// Write aligned point sets to a CSV file.
///
/// `time_s` is the evaluation time `percent * duration` for that run, so
/// downstream tooling can recover the absolute timeline.
pub fn write_points_csv(
    path: &Path,
    sets: &[ComparablePointSet],
    value_label: &str,
) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::usage(format!(
            "Failed to create export CSV '{}': {e}",
            path.display()
        ))
    })?;

    writeln!(file, "run,percent,time_s,{}", csv_header(value_label))
        .map_err(|e| AppError::usage(format!("Failed to write export CSV header: {e}")))?;

    for set in sets {
        for &(p, v) in &set.points {
            writeln!(
                file,
                "{},{:.6},{:.6},{:.10}",
                set.label,
                p,
                p * set.duration,
                v
            )
            .map_err(|e| AppError::usage(format!("Failed to write export CSV row: {e}")))?;
        }
    }

    Ok(())
}

fn csv_header(label: &str) -> String {
    // Keep the value header a single unquoted token.
    label
        .chars()
        .map(|c| if c == ',' || c.is_whitespace() { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_writes_one_row_per_grid_point() {
        let dir = std::env::temp_dir().join("tcurve-export");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("points.csv");

        let sets = vec![ComparablePointSet {
            label: "Test 1".to_string(),
            duration: 4.0,
            points: vec![(0.0, 0.0), (0.5, 20.0), (1.0, 40.0)],
        }];

        write_points_csv(&path, &sets, "Boost (kPa)").unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "run,percent,time_s,Boost_(kPa)");
        assert!(lines[2].starts_with("Test 1,0.500000,2.000000,"));
    }
}
