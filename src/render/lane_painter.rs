//! # Lane View Rendering
//!
//! Draws one animation frame onto any plotters drawing area:
//! - A title naming the scheduling strategy
//! - A header row with the simulated time of the frame, and a strip below it
//!   showing how far through the animated span the frame is
//! - A shaded execution zone on every VM lane, from the enter to the exit
//!   position, on axes labelled `Time` and `VM ID`
//! - Each cloudlet as a box with a black outline, light gray while running and
//!   light green once completed, with a green progress bar over it
//!
//! Waiting cloudlets sit at an off-canvas sentinel and are not drawn.

use anyhow::{Context, anyhow};
use image::RgbImage;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::analyzer::{Frame, LaneLayout, RenderState};

const RUNNING_FILL: RGBColor = RGBColor(211, 211, 211);
const COMPLETED_FILL: RGBColor = RGBColor(144, 238, 144);
const PROGRESS_FILL: RGBColor = RGBColor(0, 128, 0);
const LANE_FILL: RGBColor = RGBColor(235, 242, 250);
const TIME_STRIP: RGBColor = RGBColor(90, 90, 90);

const FONT: &str = "sans-serif";
const TITLE_FONT_SIZE: u32 = 22;
const LABEL_FONT_SIZE: u32 = 16;

/// Height of the header row holding the time label and strip, in pixels.
const HEADER_HEIGHT: u32 = 30;
/// Height of the time strip at the bottom of the header row.
const TIME_STRIP_HEIGHT: u32 = 5;

/// Paints frames for one record set.
#[derive(Debug, Clone)]
pub struct LanePainter {
    title: String,
    layout: LaneLayout,
    lanes: u32,
    t_max: f64,
    width: u32,
    height: u32,
}

impl LanePainter {
    /// # Parameters
    ///
    /// * `strategy` - Strategy name shown in the title
    /// * `layout` - World geometry shared with the frame engine
    /// * `lanes` - Number of VM lanes to draw
    /// * `t_max` - End of the animated time span, for the time strip
    /// * `width`, `height` - Output size in pixels
    pub fn new(strategy: &str, layout: LaneLayout, lanes: u32, t_max: f64, width: u32, height: u32) -> Self {
        Self {
            title: format!("{} VM Scheduling Animation", strategy),
            layout,
            lanes,
            t_max,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Draw `frame` over the whole of `root`.
    pub fn paint<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        frame: &Frame,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        root.fill(&WHITE)?;
        let body = root.titled(&self.title, (FONT, TITLE_FONT_SIZE))?;
        let (header, plot_area) = body.split_vertically(HEADER_HEIGHT);

        self.paint_header(&header, frame.time)?;

        let layout = &self.layout;
        let (y_min, y_max) = layout.world_y(self.lanes);
        let mut chart = ChartBuilder::on(&plot_area)
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(layout.world_x.0..layout.world_x.1, y_min..y_max)?;

        let lane_label = |y: &f64| {
            if y.fract() == 0.0 && *y >= 0.0 {
                format!("{:.0}", y)
            } else {
                String::new()
            }
        };
        chart
            .configure_mesh()
            .disable_x_mesh()
            .y_labels(self.lanes as usize + 3)
            .y_label_formatter(&lane_label)
            .x_desc("Time")
            .y_desc("VM ID")
            .axis_desc_style((FONT, LABEL_FONT_SIZE))
            .draw()?;

        let zone_width = layout.exit_x - layout.enter_x + layout.box_width;
        chart.draw_series((0..self.lanes).map(|lane| {
            let y = lane as f64;
            Rectangle::new(
                [(layout.enter_x, y), (layout.enter_x + zone_width, y + layout.box_height)],
                LANE_FILL.filled(),
            )
        }))?;

        for record in frame.states.iter().filter(|r| self.is_visible(&r.state)) {
            let state = &record.state;
            let (x, y) = (state.position_x, state.lane_y);
            let corners = [(x, y), (x + layout.box_width, y + layout.box_height)];
            let fill = if state.completed { COMPLETED_FILL } else { RUNNING_FILL };
            chart.draw_series(std::iter::once(Rectangle::new(corners, fill.filled())))?;

            let bar_width = layout.box_width * state.progress_fraction;
            if bar_width > 0.0 {
                chart.draw_series(std::iter::once(Rectangle::new(
                    [(x, y), (x + bar_width, y + layout.box_height)],
                    PROGRESS_FILL.filled(),
                )))?;
            }
            chart.draw_series(std::iter::once(Rectangle::new(corners, BLACK.stroke_width(1))))?;
        }

        Ok(())
    }

    /// Paint `frame` into an in-memory RGB image.
    pub fn render(&self, frame: &Frame) -> anyhow::Result<RgbImage> {
        let mut buffer = vec![0u8; self.width as usize * self.height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (self.width, self.height)).into_drawing_area();
            self.paint(&root, frame)
                .with_context(|| format!("Failed to paint frame {}", frame.index))?;
            root.present().context("Failed to flush frame buffer")?;
        }
        RgbImage::from_raw(self.width, self.height, buffer).ok_or_else(|| anyhow!("Frame buffer size mismatch"))
    }

    fn paint_header<DB: DrawingBackend>(
        &self,
        header: &DrawingArea<DB, Shift>,
        time: f64,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let (width, height) = header.dim_in_pixel();
        header.draw(&Text::new(
            format!("Simulated Time: {:.1}s", time),
            (10, 2),
            (FONT, LABEL_FONT_SIZE).into_font(),
        ))?;

        if self.t_max > 0.0 {
            let fraction = (time / self.t_max).clamp(0.0, 1.0);
            let strip_end = (fraction * width as f64).round() as i32;
            let top = height.saturating_sub(TIME_STRIP_HEIGHT) as i32;
            header.draw(&Rectangle::new([(0, top), (strip_end, height as i32)], TIME_STRIP.filled()))?;
        }
        Ok(())
    }

    /// Whether any part of a box at `state` falls inside the visible world.
    fn is_visible(&self, state: &RenderState) -> bool {
        let (y_min, y_max) = self.layout.world_y(self.lanes);
        state.position_x + self.layout.box_width > self.layout.world_x.0
            && state.position_x < self.layout.world_x.1
            && state.lane_y + self.layout.box_height > y_min
            && state.lane_y < y_max
    }
}
