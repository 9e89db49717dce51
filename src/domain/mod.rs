//! Domain types shared across ingest, engine, reporting, and plotting.

mod types;

pub use types::{
    AlignConfig, ComparablePointSet, ComparisonFile, DurationSource, SteadyStateReference,
    TimeSeries, TransientRun,
};
