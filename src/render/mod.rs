//! Rendering collaborators for the animation and the comparison chart.
//!
//! Drawing goes through plotters.
//!
//! - `lane_painter`: draws one animation frame
//! - `sinks`: GIF and PNG-sequence outputs
//! - `chart`: bar chart for the runtime comparison

pub mod chart;
pub mod lane_painter;
pub mod sinks;

use crate::analyzer::Frame;

pub use lane_painter::LanePainter;
pub use sinks::{GifSink, PngSequenceSink};

/// Consumer of computed frames, fed in frame order by the animation driver.
pub trait FrameSink {
    /// Draw and persist one frame. Frames are not retained by the caller.
    fn submit(&mut self, frame: &Frame) -> anyhow::Result<()>;

    /// Called once after the last frame.
    fn finish(&mut self) -> anyhow::Result<()>;
}
