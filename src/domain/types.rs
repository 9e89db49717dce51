//! Shared domain types.
//!
//! These types are intentionally lightweight and (where exported) serializable
//! so they can be:
//!
//! - used in-memory during alignment
//! - exported to JSON/CSV
//! - reloaded later to re-render charts without the raw test data
//!
//! All of them are read-only snapshots: constructed once from tabular input,
//! consumed, and discarded. No identity beyond value equality.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::engine::{EngineError, EngineResult};
use crate::units::Conversion;

/// An ordered series of `(time, value)` samples for one measured quantity.
///
/// Invariants (checked at construction, required for interpolation to be
/// well-defined):
///
/// - at least two samples
/// - time strictly increasing
/// - all samples finite
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    times: Vec<f64>,
    values: Vec<f64>,
}

impl TimeSeries {
    pub fn new(times: Vec<f64>, values: Vec<f64>) -> EngineResult<Self> {
        if times.len() != values.len() {
            return Err(EngineError::MalformedSeries {
                what: "time and value columns have different lengths",
            });
        }
        if times.len() < 2 {
            return Err(EngineError::MalformedSeries {
                what: "fewer than two samples",
            });
        }
        if times.iter().any(|t| !t.is_finite()) || values.iter().any(|v| !v.is_finite()) {
            return Err(EngineError::MalformedSeries {
                what: "non-finite sample",
            });
        }
        if times.windows(2).any(|w| w[1] <= w[0]) {
            return Err(EngineError::MalformedSeries {
                what: "time values not strictly increasing",
            });
        }
        Ok(Self { times, values })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// First recorded time (the lower interpolation bound).
    pub fn t_min(&self) -> f64 {
        self.times[0]
    }

    /// Last recorded time (the upper interpolation bound).
    pub fn t_max(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    pub fn samples(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }

    /// Apply a unit conversion to the values, returning a new series.
    ///
    /// Pure multiplicative map; no rounding or clamping.
    pub fn converted(&self, conversion: Conversion) -> Self {
        Self {
            times: self.times.clone(),
            values: self.values.iter().map(|&v| conversion.apply(v)).collect(),
        }
    }
}

/// A recorded transient event: one time series plus its total duration.
///
/// `duration` is the elapsed time of the specific recorded event, either
/// known from the test log (fixed-duration comparison) or derived from a
/// completion threshold (policy comparison). Runs being compared may have
/// different durations; that is the point of the percent-complete grid.
#[derive(Debug, Clone, PartialEq)]
pub struct TransientRun {
    pub label: String,
    pub series: TimeSeries,
    pub duration: f64,
}

impl TransientRun {
    pub fn new(label: impl Into<String>, series: TimeSeries, duration: f64) -> EngineResult<Self> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(EngineError::MalformedSeries {
                what: "duration must be finite and > 0",
            });
        }
        Ok(Self {
            label: label.into(),
            series,
            duration,
        })
    }
}

/// Baseline values at fixed fractional checkpoints (no-transient reference).
///
/// Percent values are fractions in `[0, 1]`; ingest normalizes 0–100 inputs
/// before construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteadyStateReference {
    points: Vec<(f64, f64)>,
}

impl SteadyStateReference {
    pub fn new(points: Vec<(f64, f64)>) -> EngineResult<Self> {
        if points.is_empty() {
            return Err(EngineError::MalformedSeries {
                what: "steady-state reference has no checkpoints",
            });
        }
        for &(p, v) in &points {
            if !(p.is_finite() && v.is_finite()) {
                return Err(EngineError::MalformedSeries {
                    what: "non-finite steady-state checkpoint",
                });
            }
            if !(0.0..=1.0).contains(&p) {
                return Err(EngineError::MalformedSeries {
                    what: "steady-state percent outside [0, 1]",
                });
            }
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Baseline value at a given percent checkpoint, if one exists there.
    pub fn value_at(&self, percent: f64) -> Option<f64> {
        self.points
            .iter()
            .find(|(p, _)| (p - percent).abs() < 1e-9)
            .map(|&(_, v)| v)
    }

    pub fn converted(&self, conversion: Conversion) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|&(p, v)| (p, conversion.apply(v)))
                .collect(),
        }
    }
}

/// Engine output for one run: values evaluated at the percent grid, in grid
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparablePointSet {
    pub label: String,
    /// Duration used to map percent → time (seconds).
    pub duration: f64,
    /// `(percent, value)` pairs, one per grid point.
    pub points: Vec<(f64, f64)>,
}

impl ComparablePointSet {
    /// Apply a unit conversion element-wise to the values.
    pub fn converted(&self, conversion: Conversion) -> Self {
        Self {
            label: self.label.clone(),
            duration: self.duration,
            points: self
                .points
                .iter()
                .map(|&(p, v)| (p, conversion.apply(v)))
                .collect(),
        }
    }
}

/// Portable comparison file (JSON).
///
/// Holds everything needed to re-render or post-process a comparison without
/// the raw test-cell CSVs: the grid, per-run point sets, and the optional
/// steady-state baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonFile {
    pub tool: String,
    pub generated: NaiveDate,
    /// Axis label for the compared quantity (after unit conversion).
    pub value_label: String,
    pub grid: Vec<f64>,
    pub runs: Vec<ComparablePointSet>,
    pub steady_state: Option<SteadyStateReference>,
}

/// How the per-run duration is obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum DurationSource {
    /// Known elapsed time of each recorded event, from the test log.
    Fixed(f64),
    /// Derived per run: first time the tracked quantity exceeds the
    /// threshold.
    Tracked {
        /// File holding the tracked quantity; `None` means the main input.
        input: Option<PathBuf>,
        /// Tracked column name; `None` means each run's own column label
        /// (the wide per-test layout, where e.g. torque file test `5` tracks
        /// boost file test `5`).
        column: Option<String>,
        threshold: f64,
    },
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct AlignConfig {
    pub input: PathBuf,
    pub time_col: String,
    pub value_cols: Vec<String>,
    pub duration: DurationSource,
    pub grid: Vec<f64>,
    pub conversion: Conversion,
    /// Axis label for the compared quantity; defaults to the column name.
    pub value_label: String,

    pub steady_state: Option<PathBuf>,
    pub steady_percent_col: String,
    pub steady_value_col: String,

    pub export_csv: Option<PathBuf>,
    pub export_comparison: Option<PathBuf>,
    pub chart: Option<PathBuf>,
    pub chart_width: u32,
    pub chart_height: u32,
}
