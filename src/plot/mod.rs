//! Chart rendering (SVG output files).

mod svg;

pub use svg::{
    AlignedChart, ChartStyle, TorqueCurveChart, TransientPanel, render_aligned_svg,
    render_dual_transient_svg, render_torque_curve_svg,
};
