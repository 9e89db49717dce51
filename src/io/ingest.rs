//! CSV ingest and normalization.
//!
//! Turns engine-test CSV exports into validated `TimeSeries` /
//! `SteadyStateReference` values that are safe to hand to the engine.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (no hidden heuristics beyond the documented
//!   percent-scale normalization)
//! - **Separation of concerns**: no interpolation logic here
//!
//! Test-cell exports are messy: stray whitespace around delimiters, a UTF-8
//! BOM on the first header, column names that differ only in case. All of
//! that is normalized away before lookup.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{SteadyStateReference, TimeSeries};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub column: String,
    pub message: String,
}

/// One requested column, loaded and validated.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub label: String,
    pub series: TimeSeries,
}

/// Ingest output: validated series + row errors + counts.
#[derive(Debug, Clone)]
pub struct IngestedSeries {
    pub series: Vec<LoadedSeries>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// An in-memory CSV table with normalized header lookup.
#[derive(Debug, Clone)]
pub struct Table {
    header_map: HashMap<String, usize>,
    records: Vec<StringRecord>,
}

impl Table {
    pub fn read(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path)
            .map_err(|e| AppError::usage(format!("Failed to open CSV '{}': {e}", path.display())))?;
        Self::from_reader(file).map_err(|e| {
            AppError::usage(format!("Failed to read CSV '{}': {e}", path.display()))
        })
    }

    fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, String> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers().map_err(|e| e.to_string())?.clone();
        let header_map = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (normalize_header_name(name), idx))
            .collect();

        let mut records = Vec::new();
        for result in reader.records() {
            records.push(result.map_err(|e| e.to_string())?);
        }

        Ok(Self {
            header_map,
            records,
        })
    }

    pub fn rows(&self) -> usize {
        self.records.len()
    }

    /// Index of a named column, or a usage error listing what exists.
    fn column_index(&self, name: &str) -> Result<usize, AppError> {
        self.header_map
            .get(&normalize_header_name(name))
            .copied()
            .ok_or_else(|| {
                let mut known: Vec<&str> =
                    self.header_map.keys().map(String::as_str).collect();
                known.sort_unstable();
                AppError::usage(format!(
                    "Missing column `{name}` (available: {})",
                    known.join(", ")
                ))
            })
    }

    /// Extract two numeric columns as paired samples, collecting row errors.
    ///
    /// Rows where either cell is blank or unparseable are skipped and
    /// reported; the pairing is positional, so a skipped row drops both
    /// cells.
    fn paired_columns(
        &self,
        x_col: &str,
        y_col: &str,
        row_errors: &mut Vec<RowError>,
    ) -> Result<(Vec<f64>, Vec<f64>), AppError> {
        let x_idx = self.column_index(x_col)?;
        let y_idx = self.column_index(y_col)?;

        let mut xs = Vec::with_capacity(self.records.len());
        let mut ys = Vec::with_capacity(self.records.len());

        for (idx, record) in self.records.iter().enumerate() {
            // +2: records start after the header row, and CSV line numbers
            // are 1-based.
            let line = idx + 2;
            let x = parse_cell(record, x_idx);
            let y = parse_cell(record, y_idx);
            match (x, y) {
                (Some(x), Some(y)) => {
                    xs.push(x);
                    ys.push(y);
                }
                (None, _) => row_errors.push(RowError {
                    line,
                    column: x_col.to_string(),
                    message: "missing or non-numeric value".to_string(),
                }),
                (_, None) => row_errors.push(RowError {
                    line,
                    column: y_col.to_string(),
                    message: "missing or non-numeric value".to_string(),
                }),
            }
        }

        Ok((xs, ys))
    }
}

/// Load one `TimeSeries` per requested value column, sharing the time column.
///
/// Works for both shapes of export: long files with named quantity columns
/// (`Boost (kPa)`, `Torque`, ...) and wide per-test files whose value columns
/// are test numbers (`1`, `5`, `8`, ...).
pub fn load_series_columns(
    path: &Path,
    time_col: &str,
    value_cols: &[String],
) -> Result<IngestedSeries, AppError> {
    let table = Table::read(path)?;
    let mut row_errors = Vec::new();
    let mut series = Vec::with_capacity(value_cols.len());

    for col in value_cols {
        let (times, values) = table.paired_columns(time_col, col, &mut row_errors)?;
        let ts = TimeSeries::new(times, values).map_err(|e| {
            AppError::no_data(format!(
                "Column `{col}` of '{}': {e}",
                path.display()
            ))
        })?;
        series.push(LoadedSeries {
            label: col.clone(),
            series: ts,
        });
    }

    Ok(IngestedSeries {
        series,
        row_errors,
        rows_read: table.rows(),
    })
}

/// Load a steady-state reference file.
///
/// The percent column may be logged as fractions (0–1) or percent (0–100);
/// when the maximum observed value exceeds 1.0 the whole column is scaled by
/// 0.01. The heuristic is deterministic and mirrors how the rigs label these
/// files.
pub fn load_steady_state(
    path: &Path,
    percent_col: &str,
    value_col: &str,
) -> Result<SteadyStateReference, AppError> {
    let table = Table::read(path)?;
    let mut row_errors = Vec::new();
    let (mut percents, values) = table.paired_columns(percent_col, value_col, &mut row_errors)?;

    if percents.is_empty() {
        return Err(AppError::no_data(format!(
            "No usable steady-state rows in '{}'",
            path.display()
        )));
    }

    let max = percents.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    if max > 1.0 {
        for p in &mut percents {
            *p *= 0.01;
        }
    }

    SteadyStateReference::new(percents.into_iter().zip(values).collect()).map_err(|e| {
        AppError::no_data(format!(
            "Steady-state reference '{}': {e}",
            path.display()
        ))
    })
}

fn normalize_header_name(name: &str) -> String {
    // Excel and test-bench exporters sometimes emit UTF-8 CSVs with a BOM
    // prefix on the first header (e.g. "﻿Time"). If we don't strip it, the
    // schema check incorrectly reports a missing column.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_cell(record: &StringRecord, idx: usize) -> Option<f64> {
    let s = record.get(idx).map(str::trim).filter(|s| !s.is_empty())?;
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(csv: &str) -> Table {
        Table::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn header_lookup_is_case_insensitive_and_bom_tolerant() {
        let t = table("\u{feff}Time, Boost (kPa)\n0.0, 10.0\n1.0, 12.0\n");
        assert!(t.column_index("time").is_ok());
        assert!(t.column_index("BOOST (KPA)").is_ok());
        assert!(t.column_index("torque").is_err());
    }

    #[test]
    fn whitespace_around_delimiters_is_trimmed() {
        let t = table("Time ,  1\n 0.0 , 40.0 \n 1.0 , 55.0 \n");
        let mut errors = Vec::new();
        let (times, values) = t.paired_columns("Time", "1", &mut errors).unwrap();
        assert_eq!(times, vec![0.0, 1.0]);
        assert_eq!(values, vec![40.0, 55.0]);
        assert!(errors.is_empty());
    }

    #[test]
    fn bad_rows_are_collected_with_line_numbers() {
        let t = table("Time,Torque\n0.0,100\n1.0,n/a\n2.0,\n3.0,130\n");
        let mut errors = Vec::new();
        let (times, values) = t.paired_columns("Time", "Torque", &mut errors).unwrap();
        assert_eq!(times, vec![0.0, 3.0]);
        assert_eq!(values, vec![100.0, 130.0]);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].line, 3);
        assert_eq!(errors[1].line, 4);
    }

    #[test]
    fn wide_test_columns_load_as_separate_series() {
        let dir = std::env::temp_dir().join("tcurve-ingest-wide");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("wide.csv");
        std::fs::write(&path, "Time,1,5\n0.0,40,42\n1.0,55,50\n2.0,60,58\n").unwrap();

        let out =
            load_series_columns(&path, "Time", &["1".to_string(), "5".to_string()]).unwrap();
        assert_eq!(out.series.len(), 2);
        assert_eq!(out.series[0].label, "1");
        assert_eq!(out.series[1].series.values(), &[42.0, 50.0, 58.0]);
        assert_eq!(out.rows_read, 3);
    }

    #[test]
    fn steady_state_percent_scale_is_normalized() {
        let dir = std::env::temp_dir().join("tcurve-ingest-ss");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("steady.csv");
        std::fs::write(&path, "Percent,Boost\n0,30\n25,31\n50,33\n75,34\n100,35\n").unwrap();

        let reference = load_steady_state(&path, "Percent", "Boost").unwrap();
        assert_eq!(reference.points().len(), 5);
        assert_eq!(reference.value_at(0.25), Some(31.0));
        assert_eq!(reference.value_at(1.0), Some(35.0));
    }

    #[test]
    fn short_column_is_a_no_data_error() {
        let dir = std::env::temp_dir().join("tcurve-ingest-short");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("short.csv");
        std::fs::write(&path, "Time,Torque\n0.0,100\n").unwrap();

        let err = load_series_columns(&path, "Time", &["Torque".to_string()]).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
