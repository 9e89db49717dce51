//! Synthetic demo data (no proprietary test-cell recordings required).

pub mod sample;
