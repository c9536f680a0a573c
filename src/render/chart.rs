//! Vertical bar chart rendered to PNG.

use std::path::Path;

use anyhow::{Context, bail};
use plotters::prelude::*;

pub const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
pub const SALMON: RGBColor = RGBColor(250, 128, 114);
const GRID: RGBColor = RGBColor(190, 190, 190);

const TITLE: &str = "Execution Time Comparison of Scheduling Strategies";
const X_DESC: &str = "Scheduling Strategy";
const Y_DESC: &str = "Execution Time (seconds)";

/// Smallest image the chart layout fits into.
pub const MIN_CHART_SIZE: (u32, u32) = (200, 150);

/// Number of dashed grid lines above the baseline.
const GRID_LINES: u32 = 5;

/// Fraction of the plot height used by the tallest bar.
const HEADROOM: f64 = 0.9;

/// One bar of the chart.
#[derive(Debug, Clone)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub color: RGBColor,
}

/// Render `bars` side by side, scaled to the largest value, and save as PNG.
///
/// # Parameters
///
/// * `bars` - Bars in left-to-right order; values must be finite and >= 0
/// * `path` - Output PNG path
/// * `width`, `height` - Image size in pixels, at least [`MIN_CHART_SIZE`]
pub fn draw_bar_chart(bars: &[Bar], path: &Path, width: u32, height: u32) -> anyhow::Result<()> {
    if bars.is_empty() {
        bail!("Bar chart needs at least one bar");
    }
    if let Some(bar) = bars.iter().find(|b| !b.value.is_finite() || b.value < 0.0) {
        bail!("Bar {:?} has invalid value {}", bar.label, bar.value);
    }
    if width < MIN_CHART_SIZE.0 || height < MIN_CHART_SIZE.1 {
        bail!(
            "Chart size {}x{} is below the minimum {}x{}",
            width,
            height,
            MIN_CHART_SIZE.0,
            MIN_CHART_SIZE.1
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create chart directory {}", parent.display()))?;
    }

    let max_value = bars.iter().map(|b| b.value).fold(0.0, f64::max);
    let y_top = if max_value > 0.0 { max_value / HEADROOM } else { 1.0 };
    let last = bars.len() as u32 - 1;

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(TITLE, ("sans-serif", 18))
        .margin(12)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d((0..last).into_segmented(), 0.0..y_top)?;

    let category = |v: &SegmentValue<u32>| match v {
        SegmentValue::CenterOf(i) => bars.get(*i as usize).map(|b| b.label.clone()).unwrap_or_default(),
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .disable_mesh()
        .x_label_formatter(&category)
        .x_desc(X_DESC)
        .y_desc(Y_DESC)
        .draw()?;

    for i in 1..=GRID_LINES {
        let y = y_top * i as f64 / GRID_LINES as f64;
        chart.draw_series(DashedLineSeries::new(
            vec![(SegmentValue::Exact(0), y), (SegmentValue::Last, y)],
            6,
            4,
            GRID.stroke_width(1),
        ))?;
    }

    let colors: Vec<RGBColor> = bars.iter().map(|b| b.color).collect();
    let bar_margin = chart.plotting_area().dim_in_pixel().0 / (bars.len() as u32 * 5);
    chart.draw_series(
        Histogram::vertical(&chart)
            .margin(bar_margin)
            .style_func(move |x, _| {
                let index = match x {
                    SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => *i as usize,
                    SegmentValue::Last => usize::MAX,
                };
                colors.get(index).copied().unwrap_or(BLACK).filled()
            })
            .data(bars.iter().enumerate().map(|(i, bar)| (i as u32, bar.value))),
    )?;

    for bar in bars {
        log::debug!("Bar {:?}: {:.3}", bar.label, bar.value);
    }

    root.present()
        .with_context(|| format!("Failed to save chart to {}", path.display()))?;
    Ok(())
}
