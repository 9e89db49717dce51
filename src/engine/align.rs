//! Percent-grid alignment and policy comparison.
//!
//! Recorded transients have different absolute durations, so comparing them
//! sample-by-sample is meaningless. Instead each run is resampled at a shared
//! grid of percent-complete checkpoints: for grid point `p` the run is
//! evaluated at `t = p * duration` through its own piecewise-linear
//! interpolant. The result is one directly comparable `(percent, value)` set
//! per run.

use crate::domain::{ComparablePointSet, TimeSeries, TransientRun};
use crate::engine::interp::PiecewiseLinear;
use crate::engine::{EngineError, EngineResult};

/// Resample one run onto the percent-complete grid.
///
/// Pure function: no side effects, deterministic, O(samples + grid).
/// Evaluation times that fall outside the recorded span surface as
/// `OutOfDomain`; they are never clamped or extrapolated.
pub fn align_to_percent_grid(run: &TransientRun, grid: &[f64]) -> EngineResult<ComparablePointSet> {
    let interpolant = PiecewiseLinear::new(&run.series);

    let mut points = Vec::with_capacity(grid.len());
    for &p in grid {
        let t = p * run.duration;
        let value = interpolant.eval(t)?;
        points.push((p, value));
    }

    Ok(ComparablePointSet {
        label: run.label.clone(),
        duration: run.duration,
        points,
    })
}

/// Elapsed time at which `tracked` first exceeds `threshold` (strictly).
///
/// This is the dynamic effective duration used for policy comparison: a
/// control policy "completes" its transient when the tracked quantity (e.g.
/// measured torque) first crosses the completion threshold.
pub fn effective_duration(tracked: &TimeSeries, threshold: f64) -> EngineResult<f64> {
    let mut max_observed = f64::NEG_INFINITY;
    for (t, v) in tracked.samples() {
        if v > threshold {
            return Ok(t);
        }
        max_observed = max_observed.max(v);
    }
    Err(EngineError::ThresholdNeverReached {
        threshold,
        max_observed,
    })
}

/// One run in a policy comparison: the measured quantity to resample plus the
/// tracked quantity that defines completion. Both come from the same
/// recording, so they share a time base, but they need not be the same
/// column.
#[derive(Debug, Clone)]
pub struct PolicyRun {
    pub label: String,
    pub measured: TimeSeries,
    pub tracked: TimeSeries,
}

/// Align every policy run using its own threshold-derived duration.
///
/// A run whose tracked quantity never reaches the threshold fails the whole
/// comparison; the caller decides whether to drop that run and retry.
pub fn compare_policies(
    runs: &[PolicyRun],
    threshold: f64,
    grid: &[f64],
) -> EngineResult<Vec<ComparablePointSet>> {
    runs.iter()
        .map(|run| {
            let duration = effective_duration(&run.tracked, threshold)?;
            let run = TransientRun::new(run.label.clone(), run.measured.clone(), duration)?;
            align_to_percent_grid(&run, grid)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(times: &[f64], values: &[f64]) -> TimeSeries {
        TimeSeries::new(times.to_vec(), values.to_vec()).unwrap()
    }

    #[test]
    fn end_to_end_example() {
        let run = TransientRun::new(
            "demo",
            series(&[0.0, 2.0, 4.0], &[0.0, 20.0, 40.0]),
            4.0,
        )
        .unwrap();

        let set = align_to_percent_grid(&run, &[0.0, 0.5, 1.0]).unwrap();
        assert_eq!(set.points, vec![(0.0, 0.0), (0.5, 20.0), (1.0, 40.0)]);
        assert_eq!(set.duration, 4.0);
    }

    #[test]
    fn boundary_exactness() {
        let run = TransientRun::new(
            "demo",
            series(&[0.0, 1.0, 3.0], &[7.0, 2.0, 11.0]),
            3.0,
        )
        .unwrap();

        let set = align_to_percent_grid(&run, &[0.0, 1.0]).unwrap();
        assert_eq!(set.points[0].1, 7.0);
        assert_eq!(set.points[1].1, 11.0);
    }

    #[test]
    fn out_of_domain_surfaces() {
        let run = TransientRun::new(
            "demo",
            series(&[0.0, 2.0, 4.0], &[0.0, 20.0, 40.0]),
            4.0,
        )
        .unwrap();

        // p = 1.5 → t = 6s, beyond the 4s recording.
        let err = align_to_percent_grid(&run, &[1.5]).unwrap_err();
        assert!(matches!(err, EngineError::OutOfDomain { t, .. } if (t - 6.0).abs() < 1e-12));
    }

    #[test]
    fn grid_slightly_past_one_ok_when_recording_outlasts_duration() {
        // Recording runs to 5s but the event itself took 4s.
        let run = TransientRun::new(
            "demo",
            series(&[0.0, 2.5, 5.0], &[0.0, 25.0, 50.0]),
            4.0,
        )
        .unwrap();

        let set = align_to_percent_grid(&run, &[1.0, 1.2]).unwrap();
        assert!((set.points[0].1 - 40.0).abs() < 1e-12);
        assert!((set.points[1].1 - 48.0).abs() < 1e-12);
    }

    #[test]
    fn effective_duration_first_strict_crossing() {
        let tracked = series(&[0.0, 1.0, 2.0, 3.0], &[100.0, 300.0, 500.0, 500.0]);
        assert_eq!(effective_duration(&tracked, 490.0).unwrap(), 2.0);
        // Strictly greater: an exact hit does not count.
        assert_eq!(effective_duration(&tracked, 300.0).unwrap(), 2.0);
    }

    #[test]
    fn threshold_never_reached() {
        let tracked = series(&[0.0, 1.0, 2.0], &[10.0, 20.0, 30.0]);
        let err = effective_duration(&tracked, 490.0).unwrap_err();
        assert_eq!(
            err,
            EngineError::ThresholdNeverReached {
                threshold: 490.0,
                max_observed: 30.0
            }
        );
    }

    #[test]
    fn compare_policies_uses_per_run_durations() {
        // Two policies reach 490 at different times; both get resampled over
        // their own span.
        let fast = PolicyRun {
            label: "fast".to_string(),
            measured: series(&[0.0, 1.0, 2.0, 4.0], &[0.0, 10.0, 20.0, 40.0]),
            tracked: series(&[0.0, 1.0, 2.0, 4.0], &[0.0, 250.0, 500.0, 520.0]),
        };
        let slow = PolicyRun {
            label: "slow".to_string(),
            measured: series(&[0.0, 2.0, 4.0], &[0.0, 20.0, 40.0]),
            tracked: series(&[0.0, 2.0, 4.0], &[0.0, 250.0, 500.0]),
        };

        let sets = compare_policies(&[fast, slow], 490.0, &[0.0, 0.5, 1.0]).unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].duration, 2.0);
        assert_eq!(sets[1].duration, 4.0);
        // Outputs land on the same percent grid despite different durations.
        assert_eq!(sets[0].points[2].0, 1.0);
        assert!((sets[0].points[2].1 - 20.0).abs() < 1e-12);
        assert!((sets[1].points[2].1 - 40.0).abs() < 1e-12);
    }
}
