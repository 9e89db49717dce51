//! Synthetic engine-test sample generation.
//!
//! Real test-cell recordings are proprietary, so `tcurve sample` writes a set
//! of demo CSVs with the same shapes the tool ingests: wide per-test transient
//! files, a steady-state reference, and a torque curve. Generation is seeded
//! and fully deterministic for a given `SampleSpec`, which also makes the
//! files usable as fixtures.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct SampleSpec {
    pub seed: u64,
    /// Number of synthetic test runs (wide columns).
    pub runs: usize,
    /// Samples per run.
    pub samples: usize,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            seed: 42,
            runs: 5,
            samples: 60,
        }
    }
}

/// A batch of synthetic transients recorded on one shared sampling clock.
#[derive(Debug, Clone)]
pub struct SampleBatch {
    pub times: Vec<f64>,
    pub runs: Vec<SampleRun>,
}

/// One synthetic test run (a column in the wide files).
#[derive(Debug, Clone)]
pub struct SampleRun {
    pub label: String,
    /// Settle time of this run's first-order response (seconds).
    pub settle: f64,
    /// Boost response (kPa).
    pub boost: Vec<f64>,
    /// Measured torque (lbf·ft).
    pub torque: Vec<f64>,
}

/// Generate the synthetic batch (deterministic for a given `SampleSpec`).
pub fn generate_batch(spec: &SampleSpec) -> Result<SampleBatch, AppError> {
    if spec.runs == 0 || spec.samples < 2 {
        return Err(AppError::usage(
            "Sample generation needs at least 1 run and 2 samples.",
        ));
    }

    let mut rng = StdRng::seed_from_u64(spec.seed);
    let noise = Normal::new(0.0, 0.15)
        .map_err(|e| AppError::compute(format!("Noise distribution error: {e}")))?;

    // Slower policies settle later; spread the settle times out so the
    // percent-grid alignment actually has something to normalize.
    let settles: Vec<f64> = (0..spec.runs)
        .map(|i| 3.0 + i as f64 * 1.2 + rng.gen_range(-0.3..0.3))
        .collect();
    let t_max = settles.iter().fold(0.0_f64, |a, &b| a.max(b)) * 1.15;
    let dt = t_max / (spec.samples as f64 - 1.0);
    let times: Vec<f64> = (0..spec.samples).map(|k| k as f64 * dt).collect();

    let mut runs = Vec::with_capacity(spec.runs);
    for (i, &settle) in settles.iter().enumerate() {
        let tau = settle / rng.gen_range(3.0..5.0);
        let boost_ss = rng.gen_range(32.0..42.0);
        let torque_target = rng.gen_range(480.0..540.0);

        let mut boost = Vec::with_capacity(spec.samples);
        let mut torque = Vec::with_capacity(spec.samples);
        for &t in &times {
            let rise = 1.0 - (-t / tau).exp();
            boost.push(boost_ss * rise + noise.sample(&mut rng));
            torque.push(torque_target * rise + 2.0 * noise.sample(&mut rng));
        }

        runs.push(SampleRun {
            label: format!("{}", i + 1),
            settle,
            boost,
            torque,
        });
    }

    Ok(SampleBatch { times, runs })
}

/// Write the demo CSV set; returns the paths written.
pub fn write_demo_files(out_dir: &Path, spec: &SampleSpec) -> Result<Vec<PathBuf>, AppError> {
    std::fs::create_dir_all(out_dir).map_err(|e| {
        AppError::usage(format!(
            "Failed to create sample directory '{}': {e}",
            out_dir.display()
        ))
    })?;

    let batch = generate_batch(spec)?;
    let mut written = Vec::new();

    written.push(write_wide_file(
        &out_dir.join("speed_transient_boost.csv"),
        &batch,
        |run| &run.boost,
    )?);
    written.push(write_wide_file(
        &out_dir.join("speed_transient_torque.csv"),
        &batch,
        |run| &run.torque,
    )?);
    written.push(write_steady_state(
        &out_dir.join("steady_state_boost.csv"),
        &batch,
    )?);
    written.push(write_torque_curve(&out_dir.join("torque_curve.csv"), spec.seed)?);

    Ok(written)
}

/// Wide per-test file: `Time` column plus one column per run label.
fn write_wide_file(
    path: &Path,
    batch: &SampleBatch,
    select: impl Fn(&SampleRun) -> &Vec<f64>,
) -> Result<PathBuf, AppError> {
    let mut file = create(path)?;

    let labels: Vec<&str> = batch.runs.iter().map(|r| r.label.as_str()).collect();
    writeln!(file, "Time,{}", labels.join(",")).map_err(|e| write_err(path, e))?;

    for (k, &t) in batch.times.iter().enumerate() {
        let mut row = format!("{t:.4}");
        for run in &batch.runs {
            row.push_str(&format!(",{:.4}", select(run)[k]));
        }
        writeln!(file, "{row}").map_err(|e| write_err(path, e))?;
    }

    Ok(path.to_path_buf())
}

fn write_steady_state(path: &Path, batch: &SampleBatch) -> Result<PathBuf, AppError> {
    let mut file = create(path)?;
    writeln!(file, "Percent,Boost").map_err(|e| write_err(path, e))?;

    // Checkpoint baseline: the mean settled boost level, flat across the
    // transient (that is what "no transient" means).
    let settled: f64 = batch
        .runs
        .iter()
        .filter_map(|r| r.boost.last())
        .sum::<f64>()
        / batch.runs.len().max(1) as f64;
    for percent in [0.0, 25.0, 50.0, 75.0, 100.0] {
        writeln!(file, "{percent},{settled:.4}").map_err(|e| write_err(path, e))?;
    }

    Ok(path.to_path_buf())
}

fn write_torque_curve(path: &Path, seed: u64) -> Result<PathBuf, AppError> {
    let mut file = create(path)?;
    writeln!(file, "Speed,Torque").map_err(|e| write_err(path, e))?;

    let mut rng = StdRng::seed_from_u64(seed ^ 0x7051_C0DE);
    // Lug curve shape: peak torque mid-range, falling off toward rated speed.
    for i in 0..29 {
        let speed = 800.0 + i as f64 * 50.0;
        let x = (speed - 1400.0) / 700.0;
        let torque = 620.0 - 180.0 * x * x + rng.gen_range(-4.0..4.0);
        writeln!(file, "{speed},{torque:.2}").map_err(|e| write_err(path, e))?;
    }

    Ok(path.to_path_buf())
}

fn create(path: &Path) -> Result<File, AppError> {
    File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create '{}': {e}", path.display())))
}

fn write_err(path: &Path, e: std::io::Error) -> AppError {
    AppError::usage(format!("Failed to write '{}': {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic_for_a_seed() {
        let spec = SampleSpec::default();
        let a = generate_batch(&spec).unwrap();
        let b = generate_batch(&spec).unwrap();
        assert_eq!(a.times, b.times);
        for (ra, rb) in a.runs.iter().zip(&b.runs) {
            assert_eq!(ra.boost, rb.boost);
            assert_eq!(ra.torque, rb.torque);
        }
    }

    #[test]
    fn time_base_is_strictly_increasing() {
        let batch = generate_batch(&SampleSpec::default()).unwrap();
        assert!(batch.times.windows(2).all(|w| w[1] > w[0]));
        assert_eq!(batch.runs.len(), 5);
    }

    #[test]
    fn demo_files_ingest_cleanly() {
        let dir = std::env::temp_dir().join("tcurve-sample-demo");
        let spec = SampleSpec {
            seed: 7,
            runs: 3,
            samples: 20,
        };
        let written = write_demo_files(&dir, &spec).unwrap();
        assert_eq!(written.len(), 4);

        let ingest = crate::io::ingest::load_series_columns(
            &dir.join("speed_transient_boost.csv"),
            "Time",
            &["1".to_string(), "3".to_string()],
        )
        .unwrap();
        assert_eq!(ingest.series.len(), 2);
        assert_eq!(ingest.series[0].series.len(), 20);
        assert!(ingest.row_errors.is_empty());

        let steady = crate::io::ingest::load_steady_state(
            &dir.join("steady_state_boost.csv"),
            "Percent",
            "Boost",
        )
        .unwrap();
        assert_eq!(steady.points().len(), 5);
    }
}
