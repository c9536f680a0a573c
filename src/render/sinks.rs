//! Frame sinks writing the animation to disk.
//!
//! Two output formats:
//! - `GifSink`: a single looping animated GIF
//! - `PngSequenceSink`: one numbered PNG per frame in a directory, for
//!   external encoders

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow, bail};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::analyzer::Frame;

use super::FrameSink;
use super::lane_painter::LanePainter;

/// Writes frames into an animated GIF.
///
/// Each submitted frame is painted onto a GIF backend and flushed with
/// `present`, so encoding errors surface per frame. The file trailer is
/// written when the backend is dropped in `finish`; the encoder reports no
/// error from that step.
pub struct GifSink {
    painter: LanePainter,
    area: Option<DrawingArea<BitMapBackend<'static>, Shift>>,
    path: PathBuf,
    frames_written: usize,
}

impl GifSink {
    /// Create the output file and prepare a looping encoder.
    ///
    /// # Parameters
    ///
    /// * `path` - Output `.gif` path; parent directories are created
    /// * `painter` - Frame painter
    /// * `display_fps` - Playback rate of the animation
    pub fn create(path: &Path, painter: LanePainter, display_fps: u32) -> anyhow::Result<Self> {
        let max_side = u16::MAX as u32;
        if painter.width() > max_side || painter.height() > max_side {
            bail!(
                "GIF frames are limited to {}x{} pixels, got {}x{}",
                max_side,
                max_side,
                painter.width(),
                painter.height()
            );
        }
        ensure_parent_dir(path)?;

        let frame_delay_ms = 1000 / display_fps.max(1);
        let backend = BitMapBackend::gif(path, (painter.width(), painter.height()), frame_delay_ms)
            .with_context(|| format!("Failed to create {}", path.display()))?;

        Ok(Self {
            painter,
            area: Some(backend.into_drawing_area()),
            path: path.to_path_buf(),
            frames_written: 0,
        })
    }
}

impl FrameSink for GifSink {
    fn submit(&mut self, frame: &Frame) -> anyhow::Result<()> {
        let area = self.area.as_ref().ok_or_else(|| anyhow!("GIF encoder already finished"))?;
        self.painter.paint(area, frame)?;
        area.present()
            .with_context(|| format!("Failed to encode frame into {}", self.path.display()))?;
        self.frames_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        drop(self.area.take());
        log::info!("Animation saved as {} ({} frames)", self.path.display(), self.frames_written);
        Ok(())
    }
}

/// Writes every frame as `frame_NNNNN.png` into a directory.
pub struct PngSequenceSink {
    painter: LanePainter,
    dir: PathBuf,
    frames_written: usize,
}

impl PngSequenceSink {
    pub fn create(dir: &Path, painter: LanePainter) -> anyhow::Result<Self> {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create frame directory {}", dir.display()))?;
        Ok(Self {
            painter,
            dir: dir.to_path_buf(),
            frames_written: 0,
        })
    }

    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("frame_{:05}.png", index))
    }
}

impl FrameSink for PngSequenceSink {
    fn submit(&mut self, frame: &Frame) -> anyhow::Result<()> {
        let path = self.frame_path(frame.index);
        self.painter
            .render(frame)?
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        self.frames_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        log::info!("Wrote {} frame(s) to {}", self.frames_written, self.dir.display());
        Ok(())
    }
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{LaneLayout, Timeline, WorkRecord, run_animation};

    fn records() -> Vec<WorkRecord> {
        vec![WorkRecord {
            id: 1,
            vm_id: 0,
            duration: 1.0,
            start_time: 0.0,
            finish_time: 1.0,
        }]
    }

    #[test]
    fn gif_sink_writes_a_gif_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("run_animation.gif");
        let records = records();
        let timeline = Timeline::new(&records, LaneLayout::default(), 4.0, 0.5);
        let painter = LanePainter::new("SpaceShared", LaneLayout::default(), 1, timeline.plan().t_max, 320, 240);

        let mut sink = GifSink::create(&path, painter, 10).unwrap();
        let rendered = run_animation(&timeline, &mut sink).unwrap();
        assert_eq!(rendered, 6);

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"GIF89a"));
        assert_eq!(bytes.last(), Some(&0x3B));
    }

    #[test]
    fn png_sequence_writes_one_file_per_frame() {
        let dir = tempfile::tempdir().unwrap();
        let records = records();
        let timeline = Timeline::new(&records, LaneLayout::default(), 2.0, 1.0);
        let painter = LanePainter::new("SpaceShared", LaneLayout::default(), 1, timeline.plan().t_max, 320, 240);

        let mut sink = PngSequenceSink::create(&dir.path().join("frames"), painter).unwrap();
        run_animation(&timeline, &mut sink).unwrap();

        for index in 0..4 {
            assert!(sink.frame_path(index).exists());
        }
        assert!(!sink.frame_path(4).exists());
    }
}
