//! Plotters-powered SVG chart rendering.
//!
//! Why the SVG backend?
//! - headless: no fontconfig/font-kit system dependencies
//! - text lands as `<text>` elements, so labels stay crisp and editable
//! - easy to drop into reports or convert to PNG downstream
//!
//! The chart types are intentionally data-driven: all series and labels are
//! computed outside the render call, and styling travels in an explicit
//! `ChartStyle` value rather than process-global theme state. Rendering never
//! feeds back into the engine.

use std::path::Path;

use plotters::prelude::*;

use crate::domain::{ComparablePointSet, SteadyStateReference};
use crate::error::AppError;

/// Explicit chart styling (no ambient/global theme state).
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub font: (&'static str, i32),
    pub axis_font: (&'static str, i32),
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 900,
            height: 600,
            font: ("sans-serif", 22),
            axis_font: ("sans-serif", 15),
        }
    }
}

impl ChartStyle {
    pub fn sized(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

/// Aligned-comparison chart: one line per run over percent-complete, with
/// optional steady-state checkpoint markers.
pub struct AlignedChart<'a> {
    pub title: &'a str,
    pub sets: &'a [ComparablePointSet],
    pub steady: Option<&'a SteadyStateReference>,
    pub y_label: &'a str,
}

/// One panel of raw time-domain series (e.g. actuator positions per test).
pub struct TransientPanel<'a> {
    pub y_label: &'a str,
    /// `(label, samples)` per series; samples are `(time, value)`.
    pub series: &'a [(String, Vec<(f64, f64)>)],
}

/// Torque-curve chart: a single curve with the area under it filled.
pub struct TorqueCurveChart<'a> {
    pub title: &'a str,
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub curve: &'a [(f64, f64)],
}

pub fn render_aligned_svg(
    chart: &AlignedChart<'_>,
    style: &ChartStyle,
    path: &Path,
) -> Result<(), AppError> {
    let mut xs: Vec<f64> = Vec::new();
    let mut ys: Vec<f64> = Vec::new();
    for set in chart.sets {
        for &(p, v) in &set.points {
            xs.push(p);
            ys.push(v);
        }
    }
    if let Some(steady) = chart.steady {
        for &(p, v) in steady.points() {
            xs.push(p);
            ys.push(v);
        }
    }
    let (x0, x1) = padded_range(&xs)?;
    let (y0, y1) = padded_range(&ys)?;

    let root = SVGBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut ctx = ChartBuilder::on(&root)
        .margin(12)
        .caption(chart.title, style.font.into_font())
        .x_label_area_size(44)
        .y_label_area_size(64)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(render_err)?;

    ctx.configure_mesh()
        .x_desc("Transient complete (%)")
        .y_desc(chart.y_label)
        .x_label_formatter(&|p| format!("{:.0}", p * 100.0))
        .label_style(style.axis_font.into_font())
        .draw()
        .map_err(render_err)?;

    for (i, set) in chart.sets.iter().enumerate() {
        let color = Palette99::pick(i);
        ctx.draw_series(LineSeries::new(
            set.points.iter().copied(),
            color.stroke_width(2),
        ))
        .map_err(render_err)?
        .label(set.label.clone())
        .legend(move |(x, y)| {
            PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2))
        });
    }

    if let Some(steady) = chart.steady {
        ctx.draw_series(
            steady
                .points()
                .iter()
                .map(|&(p, v)| Circle::new((p, v), 4, BLACK.filled())),
        )
        .map_err(render_err)?
        .label("Steady state")
        .legend(|(x, y)| Circle::new((x + 8, y), 4, BLACK.filled()));
    }

    ctx.configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_err)?;

    root.present().map_err(render_err)
}

/// Render two stacked time-domain panels sharing the x axis (the original
/// report's VNT/EGR actuator-position figure).
pub fn render_dual_transient_svg(
    title: &str,
    top: &TransientPanel<'_>,
    bottom: &TransientPanel<'_>,
    style: &ChartStyle,
    path: &Path,
) -> Result<(), AppError> {
    let root = SVGBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;
    let (upper, lower) = root.split_vertically((style.height / 2) as i32);

    draw_panel(&upper, Some(title), top, "", style, true)?;
    draw_panel(&lower, None, bottom, "Time (s)", style, false)?;

    root.present().map_err(render_err)
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    title: Option<&str>,
    panel: &TransientPanel<'_>,
    x_label: &str,
    style: &ChartStyle,
    legend: bool,
) -> Result<(), AppError> {
    let mut xs: Vec<f64> = Vec::new();
    let mut ys: Vec<f64> = Vec::new();
    for (_, samples) in panel.series {
        for &(t, v) in samples {
            xs.push(t);
            ys.push(v);
        }
    }
    let (x0, x1) = padded_range(&xs)?;
    let (y0, y1) = padded_range(&ys)?;

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(64);
    if let Some(title) = title {
        builder.caption(title, style.font.into_font());
    }
    let mut ctx = builder
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(render_err)?;

    ctx.configure_mesh()
        .x_desc(x_label)
        .y_desc(panel.y_label)
        .label_style(style.axis_font.into_font())
        .draw()
        .map_err(render_err)?;

    for (i, (label, samples)) in panel.series.iter().enumerate() {
        let color = Palette99::pick(i);
        ctx.draw_series(LineSeries::new(
            samples.iter().copied(),
            color.stroke_width(2),
        ))
        .map_err(render_err)?
        .label(label.clone())
        .legend(move |(x, y)| {
            PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2))
        });
    }

    if legend {
        ctx.configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_err)?;
    }

    Ok(())
}

pub fn render_torque_curve_svg(
    chart: &TorqueCurveChart<'_>,
    style: &ChartStyle,
    path: &Path,
) -> Result<(), AppError> {
    let xs: Vec<f64> = chart.curve.iter().map(|&(x, _)| x).collect();
    let ys: Vec<f64> = chart.curve.iter().map(|&(_, y)| y).collect();
    let (x0, x1) = padded_range(&xs)?;
    let (_, y1) = padded_range(&ys)?;

    let root = SVGBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut ctx = ChartBuilder::on(&root)
        .margin(12)
        .caption(chart.title, style.font.into_font())
        .x_label_area_size(44)
        .y_label_area_size(64)
        .build_cartesian_2d(x0..x1, 0.0..y1)
        .map_err(render_err)?;

    ctx.configure_mesh()
        .x_desc(chart.x_label)
        .y_desc(chart.y_label)
        .label_style(style.axis_font.into_font())
        .draw()
        .map_err(render_err)?;

    let color = Palette99::pick(0);
    ctx.draw_series(AreaSeries::new(
        chart.curve.iter().copied(),
        0.0,
        color.mix(0.2),
    ))
    .map_err(render_err)?;
    ctx.draw_series(LineSeries::new(
        chart.curve.iter().copied(),
        color.stroke_width(2),
    ))
    .map_err(render_err)?;

    root.present().map_err(render_err)
}

/// Finite min/max with 5% padding; degenerate or empty input is an error
/// rather than a silently broken axis.
fn padded_range(values: &[f64]) -> Result<(f64, f64), AppError> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in values {
        if v.is_finite() {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    if !(lo.is_finite() && hi.is_finite()) {
        return Err(AppError::compute("Nothing to plot (no finite values)."));
    }
    if (hi - lo).abs() < 1e-12 {
        lo -= 0.5;
        hi += 0.5;
    }
    let pad = (hi - lo) * 0.05;
    Ok((lo - pad, hi + pad))
}

fn render_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::compute(format!("Chart rendering failed: {e}"))
}
