/// chart.rs — ROI vs Price chart
///
/// SVG file via plotters (green = price up, red = price down) and a quick
/// braille plot on the terminal via textplots.
use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;
use textplots::{Chart, Plot, Shape};
use tracing::{info, warn};

use roi_engine::{Direction, RoiSeries};

const CHART_SIZE: (u32, u32) = (1024, 768);
/// Terminal plot resolution is far below this anyway
const TERMINAL_MAX_POINTS: usize = 2_000;

fn series_color(direction: Direction) -> RGBColor {
    match direction {
        Direction::Up => GREEN,
        Direction::Down => RED,
    }
}

/// A ROI of ±inf or NaN (zero entry price) cannot be placed on an axis.
fn is_plottable(&(x, y): &(f64, f64)) -> bool {
    x.is_finite() && y.is_finite()
}

fn finite_points(points: &[(f64, f64)]) -> impl Iterator<Item = (f64, f64)> + '_ {
    points.iter().copied().filter(is_plottable)
}

/// (x_min, x_max, y_min, y_max) over every finite point, padded when flat.
/// `None` when there is nothing to plot.
pub fn plot_bounds(series: &[RoiSeries]) -> Option<(f64, f64, f64, f64)> {
    let mut points = series.iter().flat_map(|s| finite_points(&s.points));
    let (x0, y0) = points.next()?;
    let (mut x_min, mut x_max, mut y_min, mut y_max) = (x0, x0, y0, y0);
    for (x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if x_min == x_max {
        x_min -= 1.0;
        x_max += 1.0;
    }
    if y_min == y_max {
        y_min -= 1.0;
        y_max += 1.0;
    }
    Some((x_min, x_max, y_min, y_max))
}

/// Write the chart to `path`. Returns false (and writes nothing) when no
/// series has a finite point.
pub fn render_svg(series: &[RoiSeries], path: &Path) -> Result<bool> {
    let Some((x_min, x_max, y_min, y_max)) = plot_bounds(series) else {
        warn!("No finite ROI points to plot, skipping chart");
        return Ok(false);
    };

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("ROI vs Price", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Price")
        .y_desc("ROI (%)")
        .draw()?;

    for s in series.iter().filter(|s| s.points.iter().any(is_plottable)) {
        let color = series_color(s.direction);
        chart
            .draw_series(LineSeries::new(finite_points(&s.points), color.stroke_width(2)))?
            .label(s.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    info!("Chart saved to {}", path.display());
    Ok(true)
}

/// Every n-th point so the terminal plot stays cheap on long sweeps.
fn thin(points: &[(f64, f64)]) -> Vec<(f32, f32)> {
    let finite: Vec<(f64, f64)> = finite_points(points).collect();
    let stride = finite.len().div_ceil(TERMINAL_MAX_POINTS).max(1);
    finite
        .into_iter()
        .step_by(stride)
        .map(|(x, y)| (x as f32, y as f32))
        .collect()
}

/// Print the chart to stdout.
pub fn print_terminal(series: &[RoiSeries]) {
    let Some((x_min, x_max, _, _)) = plot_bounds(series) else {
        return;
    };
    let lines: Vec<Vec<(f32, f32)>> = series.iter().map(|s| thin(&s.points)).collect();
    let shapes: Vec<Shape> = lines.iter().map(|pts| Shape::Lines(pts)).collect();

    println!("ROI (%) vs Price");
    let mut chart = Chart::new(160, 60, x_min as f32, x_max as f32);
    let mut plot = &mut chart;
    for shape in &shapes {
        plot = plot.lineplot(shape);
    }
    plot.display();
}
