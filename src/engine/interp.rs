//! Piecewise-linear interpolation over a validated time series.
//!
//! Contract:
//!
//! - exact at knots: evaluating at an observed sample time returns that
//!   sample's value
//! - bounded between bracketing samples everywhere else
//! - **no extrapolation**: evaluation outside the recorded span is an
//!   `OutOfDomain` error, never a clamp

use crate::domain::TimeSeries;
use crate::engine::{EngineError, EngineResult};

/// A piecewise-linear interpolant borrowed from a `TimeSeries`.
///
/// The series constructor already guarantees the invariants interpolation
/// needs (≥2 samples, strictly increasing, finite), so building one is
/// infallible and evaluation only has to check the domain.
#[derive(Debug, Clone, Copy)]
pub struct PiecewiseLinear<'a> {
    series: &'a TimeSeries,
}

impl<'a> PiecewiseLinear<'a> {
    pub fn new(series: &'a TimeSeries) -> Self {
        Self { series }
    }

    /// Evaluate the interpolant at time `t`.
    pub fn eval(&self, t: f64) -> EngineResult<f64> {
        let times = self.series.times();
        let values = self.series.values();
        let t_min = self.series.t_min();
        let t_max = self.series.t_max();

        // NaN `t` fails this test too and is reported as out of domain.
        if !(t >= t_min && t <= t_max) {
            return Err(EngineError::OutOfDomain { t, t_min, t_max });
        }

        // First index with times[hi] >= t; clamp so lo = hi - 1 is valid.
        let hi = times
            .partition_point(|&x| x < t)
            .clamp(1, times.len() - 1);
        let lo = hi - 1;

        let (t0, v0) = (times[lo], values[lo]);
        let (t1, v1) = (times[hi], values[hi]);

        // When t == t1 the ratio is exactly 1.0 (identical numerator and
        // denominator), so knots evaluate exactly.
        Ok(v0 + (v1 - v0) * (t - t0) / (t1 - t0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(times: &[f64], values: &[f64]) -> TimeSeries {
        TimeSeries::new(times.to_vec(), values.to_vec()).unwrap()
    }

    #[test]
    fn exact_at_knots() {
        let s = series(&[0.0, 1.5, 4.0, 9.0], &[2.0, -1.0, 7.0, 7.5]);
        let f = PiecewiseLinear::new(&s);
        for (t, v) in s.samples() {
            assert_eq!(f.eval(t).unwrap(), v);
        }
    }

    #[test]
    fn midpoint_is_average() {
        let s = series(&[0.0, 2.0], &[10.0, 30.0]);
        let f = PiecewiseLinear::new(&s);
        assert!((f.eval(1.0).unwrap() - 20.0).abs() < 1e-12);
    }

    #[test]
    fn bounded_by_bracketing_samples() {
        let s = series(&[0.0, 1.0, 3.0, 7.0], &[5.0, 1.0, 9.0, 2.0]);
        let f = PiecewiseLinear::new(&s);
        for i in 0..=70 {
            let t = i as f64 * 0.1;
            let v = f.eval(t).unwrap();
            // Find the bracketing pair and check the monotone bound.
            let times = s.times();
            let values = s.values();
            let hi = times.partition_point(|&x| x < t).clamp(1, times.len() - 1);
            let (a, b) = (values[hi - 1], values[hi]);
            assert!(v >= a.min(b) - 1e-12 && v <= a.max(b) + 1e-12, "t={t} v={v}");
        }
    }

    #[test]
    fn out_of_domain_is_an_error() {
        let s = series(&[0.5, 4.0], &[0.0, 1.0]);
        let f = PiecewiseLinear::new(&s);
        assert!(matches!(
            f.eval(0.4),
            Err(EngineError::OutOfDomain { .. })
        ));
        assert!(matches!(
            f.eval(6.0),
            Err(EngineError::OutOfDomain { .. })
        ));
        assert!(matches!(
            f.eval(f64::NAN),
            Err(EngineError::OutOfDomain { .. })
        ));
    }
}
