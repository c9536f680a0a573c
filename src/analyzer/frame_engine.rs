//! Mapping of simulated time onto per-cloudlet visual state.
//!
//! Every function here is a pure function of its arguments. Records are never
//! mutated and nothing is cached between calls, so frames can be computed in
//! any order and recomputed with identical results.
//!
//! ## World Coordinates
//!
//! The animation world spans `x` in `0..10` and `y` in `-1..lanes + 1`.
//! A running cloudlet slides along its VM lane from `enter_x` to `exit_x`
//! as it progresses; a finished one rests at `exit_x`. Waiting cloudlets are
//! parked at an off-canvas sentinel.

use super::types::{RenderState, Status, WorkRecord};

/// Fixed geometry of the lane view in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneLayout {
    /// Sentinel `(x, y)` for waiting cloudlets, outside the visible world.
    pub waiting_position: (f64, f64),
    /// `x` of a cloudlet at progress 0.
    pub enter_x: f64,
    /// `x` of a cloudlet at progress 1 and after completion.
    pub exit_x: f64,
    pub box_width: f64,
    pub box_height: f64,
    /// Visible world `x` range.
    pub world_x: (f64, f64),
}

impl Default for LaneLayout {
    fn default() -> Self {
        Self {
            waiting_position: (-1.0, -1.0),
            enter_x: 2.0,
            exit_x: 6.0,
            box_width: 0.6,
            box_height: 0.4,
            world_x: (0.0, 10.0),
        }
    }
}

impl LaneLayout {
    /// Visible world `y` range for the given number of lanes.
    pub fn world_y(&self, lanes: u32) -> (f64, f64) {
        (-1.0, lanes as f64 + 1.0)
    }
}

/// State of one record in one frame, tagged with the record it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordState {
    pub record_id: u32,
    pub state: RenderState,
}

/// Execution phase of `record` at simulated time `t`.
///
/// Both `t == start_time` and `t == finish_time` count as running, so there is
/// no gap between phases.
pub fn status(record: &WorkRecord, t: f64) -> Status {
    if t < record.start_time {
        Status::Waiting
    } else if t <= record.finish_time {
        Status::Running
    } else {
        Status::Done
    }
}

/// Fraction of the execution completed at `t`, clamped to `[0, 1]`.
pub fn progress_fraction(record: &WorkRecord, t: f64) -> f64 {
    ((t - record.start_time) / record.duration).clamp(0.0, 1.0)
}

/// Visual state of `record` at simulated time `t`.
pub fn render_state(record: &WorkRecord, t: f64, layout: &LaneLayout) -> RenderState {
    let lane = record.vm_id as f64;
    match status(record, t) {
        Status::Waiting => RenderState {
            position_x: layout.waiting_position.0,
            lane_y: layout.waiting_position.1,
            progress_fraction: 0.0,
            completed: false,
        },
        Status::Running => {
            let progress = progress_fraction(record, t);
            RenderState {
                position_x: layout.enter_x + progress * (layout.exit_x - layout.enter_x),
                lane_y: lane,
                progress_fraction: progress,
                completed: false,
            }
        }
        Status::Done => RenderState {
            position_x: layout.exit_x,
            lane_y: lane,
            progress_fraction: 1.0,
            completed: true,
        },
    }
}

/// Visual state of every record at `t`, in record order.
pub fn frame_states(records: &[WorkRecord], t: f64, layout: &LaneLayout) -> Vec<RecordState> {
    records
        .iter()
        .map(|record| RecordState {
            record_id: record.id,
            state: render_state(record, t, layout),
        })
        .collect()
}
