//! Typed errors for the alignment engine.
//!
//! These are deterministic input errors, not transient conditions: there is
//! nothing to retry. The CLI layer wraps them in `AppError` with an exit code;
//! library callers can match on the variants directly.

use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The series cannot support interpolation (too short, non-monotonic
    /// time, or non-finite samples). Raised at construction, before any
    /// evaluation is attempted.
    #[error("malformed series: {what}")]
    MalformedSeries { what: &'static str },

    /// Evaluation time falls outside the recorded span of the series.
    ///
    /// Extrapolation is never performed: a value outside the observed time
    /// range is physically meaningless for a comparison point.
    #[error("evaluation time {t}s outside recorded span [{t_min}s, {t_max}s]")]
    OutOfDomain { t: f64, t_min: f64, t_max: f64 },

    /// The tracked quantity never exceeded the completion threshold, so no
    /// effective duration can be derived for this run.
    #[error("tracked value never exceeded threshold {threshold} (max observed: {max_observed})")]
    ThresholdNeverReached { threshold: f64, max_observed: f64 },
}
