//! Shared alignment pipeline used by the `align` and `compare` subcommands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> (duration resolution) -> percent-grid alignment -> unit
//! conversion -> optional steady-state baseline.
//!
//! The subcommand handlers then focus on presentation (printing, exports,
//! charts).

use rayon::prelude::*;

use crate::domain::{
    AlignConfig, ComparablePointSet, DurationSource, SteadyStateReference, TransientRun,
};
use crate::engine::{self, PolicyRun};
use crate::error::AppError;
use crate::io::ingest::{self, RowError};

/// All computed outputs of one alignment run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub sets: Vec<ComparablePointSet>,
    pub steady: Option<SteadyStateReference>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Execute the full pipeline and return the computed outputs.
pub fn run(config: &AlignConfig) -> Result<RunOutput, AppError> {
    validate_grid(&config.grid)?;

    let ingested =
        ingest::load_series_columns(&config.input, &config.time_col, &config.value_cols)?;
    let mut row_errors = ingested.row_errors;
    let rows_read = ingested.rows_read;

    let sets = match &config.duration {
        DurationSource::Fixed(duration) => {
            let runs = ingested
                .series
                .into_iter()
                .map(|s| TransientRun::new(s.label, s.series, *duration))
                .collect::<Result<Vec<_>, _>>()
                .map_err(AppError::from)?;

            // Runs are independent; align them in parallel, input order
            // preserved by the indexed collect.
            runs.par_iter()
                .map(|run| engine::align_to_percent_grid(run, &config.grid))
                .collect::<Result<Vec<_>, _>>()
                .map_err(AppError::from)?
        }
        DurationSource::Tracked {
            input,
            column,
            threshold,
        } => {
            let tracked_path = input.as_deref().unwrap_or(&config.input);
            let tracked_cols: Vec<String> = match column {
                Some(name) => vec![name.clone(); config.value_cols.len()],
                None => config.value_cols.clone(),
            };

            let tracked =
                ingest::load_series_columns(tracked_path, &config.time_col, &tracked_cols)?;
            row_errors.extend(tracked.row_errors);

            let runs: Vec<PolicyRun> = ingested
                .series
                .into_iter()
                .zip(tracked.series)
                .map(|(measured, tracked)| PolicyRun {
                    label: measured.label,
                    measured: measured.series,
                    tracked: tracked.series,
                })
                .collect();

            engine::compare_policies(&runs, *threshold, &config.grid).map_err(AppError::from)?
        }
    };

    let sets: Vec<ComparablePointSet> =
        sets.iter().map(|s| s.converted(config.conversion)).collect();

    let steady = match &config.steady_state {
        Some(path) => {
            let reference = ingest::load_steady_state(
                path,
                &config.steady_percent_col,
                &config.steady_value_col,
            )?;
            Some(reference.converted(config.conversion))
        }
        None => None,
    };

    Ok(RunOutput {
        sets,
        steady,
        row_errors,
        rows_read,
    })
}

fn validate_grid(grid: &[f64]) -> Result<(), AppError> {
    if grid.is_empty() {
        return Err(AppError::usage("Percent grid must not be empty."));
    }
    if grid.iter().any(|p| !p.is_finite() || *p < 0.0) {
        return Err(AppError::usage(
            "Percent grid values must be finite and >= 0 (fractions, e.g. 0,0.25,0.5,0.75,1).",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Conversion;
    use std::path::PathBuf;

    fn write_fixture(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("tcurve-pipeline");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn base_config(input: PathBuf, duration: DurationSource) -> AlignConfig {
        AlignConfig {
            input,
            time_col: "Time".to_string(),
            value_cols: vec!["1".to_string(), "2".to_string()],
            duration,
            grid: vec![0.0, 0.5, 1.0],
            conversion: Conversion::None,
            value_label: "Boost (kPa)".to_string(),
            steady_state: None,
            steady_percent_col: "Percent".to_string(),
            steady_value_col: "Boost".to_string(),
            export_csv: None,
            export_comparison: None,
            chart: None,
            chart_width: 900,
            chart_height: 600,
        }
    }

    #[test]
    fn fixed_duration_pipeline_end_to_end() {
        let input = write_fixture(
            "fixed.csv",
            "Time,1,2\n0.0,0.0,5.0\n2.0,20.0,15.0\n4.0,40.0,25.0\n",
        );
        let out = run(&base_config(input, DurationSource::Fixed(4.0))).unwrap();

        assert_eq!(out.sets.len(), 2);
        assert_eq!(out.sets[0].points, vec![(0.0, 0.0), (0.5, 20.0), (1.0, 40.0)]);
        assert_eq!(out.sets[1].points, vec![(0.0, 5.0), (0.5, 15.0), (1.0, 25.0)]);
        assert!(out.row_errors.is_empty());
        assert_eq!(out.rows_read, 3);
    }

    #[test]
    fn tracked_duration_resolves_per_run() {
        let input = write_fixture(
            "tracked_measured.csv",
            "Time,1,2\n0.0,0.0,0.0\n1.0,10.0,5.0\n2.0,20.0,10.0\n4.0,40.0,20.0\n",
        );
        let tracked = write_fixture(
            "tracked_torque.csv",
            "Time,1,2\n0.0,0.0,0.0\n1.0,500.0,100.0\n2.0,520.0,300.0\n4.0,530.0,500.0\n",
        );

        let config = base_config(
            input,
            DurationSource::Tracked {
                input: Some(tracked),
                column: None,
                threshold: 490.0,
            },
        );
        let out = run(&config).unwrap();

        // Run 1 crosses 490 at t=1s, run 2 at t=4s.
        assert_eq!(out.sets[0].duration, 1.0);
        assert_eq!(out.sets[1].duration, 4.0);
        assert_eq!(out.sets[0].points[2], (1.0, 10.0));
        assert_eq!(out.sets[1].points[2], (1.0, 20.0));
    }

    #[test]
    fn threshold_never_reached_is_exit_4() {
        let input = write_fixture(
            "never.csv",
            "Time,1,2\n0.0,10.0,10.0\n1.0,20.0,20.0\n2.0,30.0,30.0\n",
        );
        let config = base_config(
            input,
            DurationSource::Tracked {
                input: None,
                column: None,
                threshold: 490.0,
            },
        );
        let err = run(&config).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn conversion_applies_to_sets_and_steady_state() {
        let input = write_fixture(
            "convert.csv",
            "Time,1,2\n0.0,100.0,100.0\n4.0,200.0,300.0\n",
        );
        let steady = write_fixture("convert_ss.csv", "Percent,Torque\n0,100\n100,250\n");

        let mut config = base_config(input, DurationSource::Fixed(4.0));
        config.conversion = Conversion::TorqueNm;
        config.steady_state = Some(steady);
        config.steady_value_col = "Torque".to_string();

        let out = run(&config).unwrap();
        assert!((out.sets[0].points[0].1 - 135.58179483).abs() < 1e-6);
        let steady = out.steady.unwrap();
        assert!((steady.value_at(1.0).unwrap() - 338.954487075).abs() < 1e-6);
    }

    #[test]
    fn empty_grid_is_a_usage_error() {
        let input = write_fixture("grid.csv", "Time,1,2\n0.0,0.0,0.0\n1.0,1.0,1.0\n");
        let mut config = base_config(input, DurationSource::Fixed(1.0));
        config.grid = vec![];
        assert_eq!(run(&config).unwrap_err().exit_code(), 2);
    }
}
