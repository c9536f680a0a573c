//! Frame iteration over the simulated time axis.
//!
//! The driver turns a record set into a finite, lazily computed sequence of
//! frames and feeds them, in order, to a [`FrameSink`]. It keeps no state
//! between frames other than the next index; each frame is computed from
//! scratch by the frame engine.

use anyhow::Context;

use crate::render::FrameSink;

use super::frame_engine::{LaneLayout, RecordState, frame_states};
use super::types::WorkRecord;

/// How often (in frames) progress is reported while rendering.
const PROGRESS_LOG_INTERVAL: usize = 100;

/// Time span and sampling of one animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationPlan {
    /// Frames per simulated second.
    pub frame_rate: f64,
    /// End of the animated span: latest finish time plus the margin.
    pub t_max: f64,
    pub frame_count: usize,
}

impl AnimationPlan {
    /// Plan the animation of `records`.
    ///
    /// `t_max = max(finish_time) + margin` and
    /// `frame_count = ceil(t_max * frame_rate)`. An empty record set animates
    /// the margin alone.
    ///
    /// When the margin is shorter than one frame interval the count is
    /// extended until the last frame falls strictly after the last finish, so
    /// the final frame always shows every record done.
    pub fn new(records: &[WorkRecord], frame_rate: f64, margin: f64) -> Self {
        let last_finish = records.iter().map(|r| r.finish_time).fold(0.0, f64::max);
        let t_max = last_finish + margin;
        let mut plan = Self {
            frame_rate,
            t_max,
            frame_count: (t_max * frame_rate).ceil().max(0.0) as usize,
        };

        if !records.is_empty() {
            while plan.frame_count == 0 || plan.time_of(plan.frame_count - 1) <= last_finish {
                plan.frame_count += 1;
            }
        }
        plan
    }

    /// Simulated time shown by frame `index`.
    pub fn time_of(&self, index: usize) -> f64 {
        index as f64 / self.frame_rate
    }
}

/// One computed frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub index: usize,
    /// Simulated time of this frame.
    pub time: f64,
    /// One entry per record, in log order.
    pub states: Vec<RecordState>,
}

impl Frame {
    /// State of a specific record in this frame.
    pub fn state_of(&self, record_id: u32) -> Option<&RecordState> {
        self.states.iter().find(|s| s.record_id == record_id)
    }
}

/// Record set bound to a layout and a plan; the source of frame sequences.
pub struct Timeline<'a> {
    records: &'a [WorkRecord],
    layout: LaneLayout,
    plan: AnimationPlan,
}

impl<'a> Timeline<'a> {
    pub fn new(records: &'a [WorkRecord], layout: LaneLayout, frame_rate: f64, margin: f64) -> Self {
        Self {
            records,
            layout,
            plan: AnimationPlan::new(records, frame_rate, margin),
        }
    }

    pub fn plan(&self) -> &AnimationPlan {
        &self.plan
    }

    pub fn records(&self) -> &'a [WorkRecord] {
        self.records
    }

    /// A fresh frame sequence starting at frame 0.
    pub fn frames(&self) -> Frames<'a> {
        Frames {
            records: self.records,
            layout: self.layout,
            plan: self.plan,
            next: 0,
        }
    }
}

/// Lazy iterator over the frames of a [`Timeline`].
pub struct Frames<'a> {
    records: &'a [WorkRecord],
    layout: LaneLayout,
    plan: AnimationPlan,
    next: usize,
}

impl Iterator for Frames<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if self.next >= self.plan.frame_count {
            return None;
        }
        let index = self.next;
        self.next += 1;

        let time = self.plan.time_of(index);
        Some(Frame {
            index,
            time,
            states: frame_states(self.records, time, &self.layout),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.plan.frame_count.saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Frames<'_> {}

/// Render every frame of `timeline` into `sink`, in order.
///
/// # Returns
///
/// The number of frames handed to the sink.
pub fn run_animation(timeline: &Timeline<'_>, sink: &mut dyn FrameSink) -> anyhow::Result<usize> {
    let plan = timeline.plan();
    log::info!(
        "Rendering {} frame(s) over {:.2}s of simulated time at {} frame(s)/s",
        plan.frame_count,
        plan.t_max,
        plan.frame_rate
    );

    let mut rendered = 0;
    for frame in timeline.frames() {
        sink.submit(&frame)
            .with_context(|| format!("Failed to render frame {}", frame.index))?;
        rendered += 1;
        if rendered % PROGRESS_LOG_INTERVAL == 0 {
            log::debug!("Rendered {}/{} frames", rendered, plan.frame_count);
        }
    }

    sink.finish().context("Failed to finalize animation")?;
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<WorkRecord> {
        vec![
            WorkRecord {
                id: 1,
                vm_id: 0,
                duration: 2.0,
                start_time: 0.0,
                finish_time: 2.0,
            },
            WorkRecord {
                id: 2,
                vm_id: 1,
                duration: 3.0,
                start_time: 1.0,
                finish_time: 4.0,
            },
        ]
    }

    /// Sink that keeps just enough to check ordering.
    #[derive(Default)]
    struct RecordingSink {
        indices: Vec<usize>,
        finished: bool,
    }

    impl FrameSink for RecordingSink {
        fn submit(&mut self, frame: &Frame) -> anyhow::Result<()> {
            self.indices.push(frame.index);
            Ok(())
        }

        fn finish(&mut self) -> anyhow::Result<()> {
            self.finished = true;
            Ok(())
        }
    }

    struct FailingSink;

    impl FrameSink for FailingSink {
        fn submit(&mut self, frame: &Frame) -> anyhow::Result<()> {
            if frame.index == 3 {
                anyhow::bail!("disk full");
            }
            Ok(())
        }

        fn finish(&mut self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn plan_uses_latest_finish_plus_margin() {
        let plan = AnimationPlan::new(&sample_records(), 10.0, 2.0);
        assert_eq!(plan.t_max, 6.0);
        assert_eq!(plan.frame_count, 60);
    }

    #[test]
    fn frame_count_rounds_up() {
        let plan = AnimationPlan::new(&sample_records(), 3.0, 0.5);
        // 4.5 * 3 = 13.5 -> 14 frames
        assert_eq!(plan.frame_count, 14);
    }

    #[test]
    fn short_margin_still_ends_on_a_done_frame() {
        let records = vec![WorkRecord {
            id: 1,
            vm_id: 0,
            duration: 2.0,
            start_time: 0.0,
            finish_time: 2.0,
        }];
        // ceil(2.5 * 1.0) = 3 frames would end at t = 2.0, still running.
        let timeline = Timeline::new(&records, LaneLayout::default(), 1.0, 0.5);
        assert_eq!(timeline.plan().frame_count, 4);

        let last = timeline.frames().last().unwrap();
        assert_eq!(last.time, 3.0);
        assert!(last.states[0].state.completed);
    }

    #[test]
    fn empty_plan_covers_the_margin() {
        let plan = AnimationPlan::new(&[], 10.0, 2.0);
        assert_eq!(plan.t_max, 2.0);
        assert_eq!(plan.frame_count, 20);
    }

    #[test]
    fn frame_times_are_index_over_rate() {
        let records = sample_records();
        let timeline = Timeline::new(&records, LaneLayout::default(), 10.0, 2.0);
        let frames: Vec<Frame> = timeline.frames().collect();
        assert_eq!(frames.len(), 60);
        assert_eq!(frames[0].time, 0.0);
        assert_eq!(frames[5].time, 0.5);
        for pair in frames.windows(2) {
            assert_eq!(pair[1].index, pair[0].index + 1);
            assert!(pair[1].time > pair[0].time);
        }
    }

    #[test]
    fn frame_at_half_second_matches_engine() {
        let records = sample_records();
        let timeline = Timeline::new(&records, LaneLayout::default(), 10.0, 2.0);
        let frame = timeline.frames().nth(5).unwrap();
        assert_eq!(frame.state_of(1).unwrap().state.progress_fraction, 0.25);
        assert_eq!(frame.state_of(2).unwrap().state.progress_fraction, 0.0);
        assert!(frame.state_of(3).is_none());
    }

    #[test]
    fn last_frame_shows_everything_done() {
        let records = sample_records();
        let timeline = Timeline::new(&records, LaneLayout::default(), 10.0, 2.0);
        let last = timeline.frames().last().unwrap();
        assert!(last.states.iter().all(|s| s.state.completed));
    }

    #[test]
    fn frames_are_restartable() {
        let records = sample_records();
        let timeline = Timeline::new(&records, LaneLayout::default(), 4.0, 1.0);
        let first: Vec<Frame> = timeline.frames().collect();
        let second: Vec<Frame> = timeline.frames().collect();
        assert_eq!(first, second);
        assert_eq!(timeline.frames().len(), timeline.plan().frame_count);
    }

    #[test]
    fn run_animation_feeds_sink_in_order() {
        let records = sample_records();
        let timeline = Timeline::new(&records, LaneLayout::default(), 10.0, 2.0);
        let mut sink = RecordingSink::default();
        let rendered = run_animation(&timeline, &mut sink).unwrap();
        assert_eq!(rendered, 60);
        assert_eq!(sink.indices, (0..60).collect::<Vec<_>>());
        assert!(sink.finished);
    }

    #[test]
    fn sink_failure_aborts_the_run() {
        let records = sample_records();
        let timeline = Timeline::new(&records, LaneLayout::default(), 10.0, 2.0);
        let err = run_animation(&timeline, &mut FailingSink).unwrap_err();
        assert!(err.to_string().contains("frame 3"));
    }
}
