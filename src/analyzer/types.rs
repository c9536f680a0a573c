//! Type definitions specific to the analyzer module.

/// Upper bound on the number of VM lanes.
///
/// Rows with a larger `vm_id` and larger header counts are not accepted.
pub const MAX_LANES: u32 = 1024;

/// Execution phase of a cloudlet at a given simulated time.
///
/// Never stored on a record; always derived from the record's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Not started yet (`t < start_time`).
    Waiting,
    /// Executing on its VM (`start_time <= t <= finish_time`).
    Running,
    /// Finished (`t > finish_time`).
    Done,
}

/// One successfully executed cloudlet read from the results section of a log.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkRecord {
    pub id: u32,
    pub vm_id: u32,
    /// Execution time in simulated seconds. Always positive.
    pub duration: f64,
    pub start_time: f64,
    pub finish_time: f64,
}

/// Visual state of one record for a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    /// Left edge of the cloudlet box in world units.
    pub position_x: f64,
    /// Bottom edge of the cloudlet box; the VM lane while running or done.
    pub lane_y: f64,
    /// Fraction of the execution completed, in `[0, 1]`.
    pub progress_fraction: f64,
    pub completed: bool,
}

/// Values from the `SIMULATION CONFIGURATION:` block at the top of a log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogHeader {
    pub strategy: Option<String>,
    pub vm_count: Option<u32>,
    pub cloudlet_count: Option<u32>,
}

/// Everything extracted from one execution log.
#[derive(Debug, Clone, Default)]
pub struct ExecutionLog {
    pub header: LogHeader,
    /// Accepted records in log order.
    pub records: Vec<WorkRecord>,
    /// Whether the results marker was seen at all.
    pub section_found: bool,
    /// Rows inside the results section that were not accepted.
    pub skipped_rows: usize,
}

impl ExecutionLog {
    /// Number of VM lanes to draw.
    ///
    /// The header value wins when present; otherwise the highest `vm_id` seen
    /// decides. Never less than one so an empty log still has a lane, and
    /// never more than [`MAX_LANES`].
    pub fn lane_count(&self) -> u32 {
        let from_records = self
            .records
            .iter()
            .map(|r| r.vm_id.saturating_add(1))
            .max()
            .unwrap_or(0);
        self.header.vm_count.unwrap_or(0).max(from_records).clamp(1, MAX_LANES)
    }

    /// Latest finish time over all records, `None` for an empty log.
    pub fn makespan(&self) -> Option<f64> {
        self.records.iter().map(|r| r.finish_time).reduce(f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u32, vm_id: u32, start: f64, finish: f64) -> WorkRecord {
        WorkRecord {
            id,
            vm_id,
            duration: finish - start,
            start_time: start,
            finish_time: finish,
        }
    }

    #[test]
    fn lane_count_prefers_larger_of_header_and_records() {
        let mut log = ExecutionLog {
            records: vec![record(0, 5, 0.0, 1.0)],
            ..Default::default()
        };
        assert_eq!(log.lane_count(), 6);

        log.header.vm_count = Some(8);
        assert_eq!(log.lane_count(), 8);
    }

    #[test]
    fn lane_count_is_bounded() {
        let mut log = ExecutionLog {
            records: vec![record(0, u32::MAX, 0.0, 1.0)],
            ..Default::default()
        };
        assert_eq!(log.lane_count(), MAX_LANES);

        log.records.clear();
        log.header.vm_count = Some(4_000_000_000);
        assert_eq!(log.lane_count(), MAX_LANES);
    }

    #[test]
    fn empty_log_has_one_lane_and_no_makespan() {
        let log = ExecutionLog::default();
        assert_eq!(log.lane_count(), 1);
        assert_eq!(log.makespan(), None);
    }

    #[test]
    fn makespan_is_latest_finish() {
        let log = ExecutionLog {
            records: vec![record(0, 0, 0.0, 4.5), record(1, 1, 1.0, 3.0)],
            ..Default::default()
        };
        assert_eq!(log.makespan(), Some(4.5));
    }
}
