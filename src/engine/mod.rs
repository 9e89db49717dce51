//! Transient alignment & comparison engine.
//!
//! Pure computation over in-memory series: no I/O, no rendering, no global
//! state. Everything here is testable headlessly.

mod align;
mod error;
mod interp;

pub use align::{PolicyRun, align_to_percent_grid, compare_policies, effective_duration};
pub use error::{EngineError, EngineResult};
pub use interp::PiecewiseLinear;
