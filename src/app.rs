//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the alignment pipeline
//! - prints reports
//! - writes optional exports and charts

use clap::Parser;

use crate::cli::{
    AlignArgs, ChartArgs, Cli, Command, CommonArgs, CompareArgs, SampleArgs, TorqueArgs,
    TransientsArgs,
};
use crate::domain::{AlignConfig, DurationSource};
use crate::error::AppError;
use crate::plot::{
    AlignedChart, ChartStyle, TorqueCurveChart, TransientPanel, render_aligned_svg,
    render_dual_transient_svg, render_torque_curve_svg,
};

pub mod pipeline;

/// Entry point for the `tcurve` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Align(args) => handle_align(args),
        Command::Compare(args) => handle_compare(args),
        Command::Chart(args) => handle_chart(args),
        Command::Transients(args) => handle_transients(args),
        Command::Torque(args) => handle_torque(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_align(args: AlignArgs) -> Result<(), AppError> {
    if !(args.duration.is_finite() && args.duration > 0.0) {
        return Err(AppError::usage("--duration must be finite and > 0."));
    }
    let config = align_config_from_args(&args.common, DurationSource::Fixed(args.duration));
    run_and_present(&config)
}

fn handle_compare(args: CompareArgs) -> Result<(), AppError> {
    let config = align_config_from_args(
        &args.common,
        DurationSource::Tracked {
            input: args.tracked_input.clone(),
            column: args.tracked_col.clone(),
            threshold: args.threshold,
        },
    );
    run_and_present(&config)
}

fn run_and_present(config: &AlignConfig) -> Result<(), AppError> {
    let output = pipeline::run(config)?;

    println!(
        "{}",
        crate::report::format_run_summary(config, &output.sets, &output.row_errors, output.rows_read)
    );
    println!(
        "{}",
        crate::report::format_comparison_table(&output.sets, output.steady.as_ref())
    );

    if let Some(path) = &config.export_csv {
        crate::io::export::write_points_csv(path, &output.sets, &config.value_label)?;
    }
    if let Some(path) = &config.export_comparison {
        crate::io::comparison::write_comparison_json(
            path,
            &config.grid,
            &config.value_label,
            &output.sets,
            output.steady.as_ref(),
        )?;
    }
    if let Some(path) = &config.chart {
        render_aligned_svg(
            &AlignedChart {
                title: &config.value_label,
                sets: &output.sets,
                steady: output.steady.as_ref(),
                y_label: &config.value_label,
            },
            &ChartStyle::sized(config.chart_width, config.chart_height),
            path,
        )?;
        println!("Chart written to {}", path.display());
    }

    Ok(())
}

fn handle_chart(args: ChartArgs) -> Result<(), AppError> {
    let comparison = crate::io::comparison::read_comparison_json(&args.comparison)?;

    render_aligned_svg(
        &AlignedChart {
            title: &args.title,
            sets: &comparison.runs,
            steady: comparison.steady_state.as_ref(),
            y_label: &comparison.value_label,
        },
        &ChartStyle::sized(args.width, args.height),
        &args.out,
    )?;

    println!("Chart written to {}", args.out.display());
    Ok(())
}

fn handle_transients(args: TransientsArgs) -> Result<(), AppError> {
    let top = load_panel_series(&args, &args.top_cols)?;
    let bottom = load_panel_series(&args, &args.bottom_cols)?;

    render_dual_transient_svg(
        &args.title,
        &TransientPanel {
            y_label: &args.top_label,
            series: &top,
        },
        &TransientPanel {
            y_label: &args.bottom_label,
            series: &bottom,
        },
        &ChartStyle::sized(args.width, args.height),
        &args.out,
    )?;

    println!("Chart written to {}", args.out.display());
    Ok(())
}

fn load_panel_series(
    args: &TransientsArgs,
    cols: &[String],
) -> Result<Vec<(String, Vec<(f64, f64)>)>, AppError> {
    let ingested = crate::io::ingest::load_series_columns(&args.input, &args.time_col, cols)?;
    Ok(ingested
        .series
        .into_iter()
        .map(|s| {
            let series = s.series.converted(args.convert);
            (format!("Test {}", s.label), series.samples().collect())
        })
        .collect())
}

fn handle_torque(args: TorqueArgs) -> Result<(), AppError> {
    let ingested = crate::io::ingest::load_series_columns(
        &args.input,
        &args.speed_col,
        &[args.torque_col.clone()],
    )?;
    let loaded = ingested
        .series
        .into_iter()
        .next()
        .ok_or_else(|| AppError::no_data("No torque column loaded."))?;
    let series = loaded.series.converted(args.convert);
    let curve: Vec<(f64, f64)> = series.samples().collect();

    let y_label = match args.convert.unit_suffix() {
        Some(suffix) => format!("Torque {suffix}"),
        None => "Torque".to_string(),
    };

    render_torque_curve_svg(
        &TorqueCurveChart {
            title: &args.title,
            x_label: "Speed (rpm)",
            y_label: &y_label,
            curve: &curve,
        },
        &ChartStyle::sized(args.width, args.height),
        &args.out,
    )?;

    println!("Chart written to {}", args.out.display());
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let spec = crate::data::sample::SampleSpec {
        seed: args.seed,
        runs: args.runs,
        samples: args.samples,
    };
    let written = crate::data::sample::write_demo_files(&args.out_dir, &spec)?;

    println!("Wrote {} demo files:", written.len());
    for path in written {
        println!("- {}", path.display());
    }
    Ok(())
}

pub fn align_config_from_args(args: &CommonArgs, duration: DurationSource) -> AlignConfig {
    let value_label = args
        .label
        .clone()
        .or_else(|| args.value_cols.first().cloned())
        .unwrap_or_else(|| "value".to_string());
    let steady_value_col = args
        .steady_value_col
        .clone()
        .or_else(|| args.value_cols.first().cloned())
        .unwrap_or_else(|| "value".to_string());

    AlignConfig {
        input: args.input.clone(),
        time_col: args.time_col.clone(),
        value_cols: args.value_cols.clone(),
        duration,
        grid: args.grid.clone(),
        conversion: args.convert,
        value_label,
        steady_state: args.steady_state.clone(),
        steady_percent_col: args.steady_percent_col.clone(),
        steady_value_col,
        export_csv: args.export.clone(),
        export_comparison: args.export_comparison.clone(),
        chart: args.chart.clone(),
        chart_width: args.width,
        chart_height: args.height,
    }
}
