//! Per-strategy performance summary written next to the animation.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use super::types::ExecutionLog;

/// Total execution time spent on one VM.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VmBusyTime {
    pub vm_id: u32,
    pub busy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub strategy: String,
    pub generated_at: String,
    pub record_count: usize,
    pub skipped_rows: usize,
    pub vm_count: u32,
    /// Latest finish time, 0 for an empty run.
    pub makespan: f64,
    /// Mean execution time of the accepted cloudlets, 0 for an empty run.
    pub avg_duration: f64,
    pub frame_count: usize,
    pub vm_busy_time: Vec<VmBusyTime>,
}

impl RunSummary {
    pub fn from_log(strategy: &str, log: &ExecutionLog, frame_count: usize) -> Self {
        let record_count = log.records.len();
        let total_duration: f64 = log.records.iter().map(|r| r.duration).sum();
        let avg_duration = if record_count > 0 {
            total_duration / record_count as f64
        } else {
            0.0
        };

        let vm_count = log.lane_count();
        let mut busy = vec![0.0; vm_count as usize];
        for record in &log.records {
            if let Some(slot) = busy.get_mut(record.vm_id as usize) {
                *slot += record.duration;
            }
        }

        Self {
            strategy: strategy.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            record_count,
            skipped_rows: log.skipped_rows,
            vm_count,
            makespan: log.makespan().unwrap_or(0.0),
            avg_duration,
            frame_count,
            vm_busy_time: busy
                .into_iter()
                .enumerate()
                .map(|(vm_id, busy)| VmBusyTime {
                    vm_id: vm_id as u32,
                    busy,
                })
                .collect(),
        }
    }

    /// Write the summary as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize run summary")?;
        fs::write(path, json).with_context(|| format!("Failed to write summary to {}", path.display()))?;
        log::info!(
            "{}: {} cloudlet(s), makespan {:.2}s, avg execution {:.2}s",
            self.strategy,
            self.record_count,
            self.makespan,
            self.avg_duration
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::types::{LogHeader, WorkRecord};

    fn sample_log() -> ExecutionLog {
        ExecutionLog {
            header: LogHeader {
                strategy: Some("TimeShared".into()),
                vm_count: Some(3),
                cloudlet_count: Some(3),
            },
            records: vec![
                WorkRecord {
                    id: 0,
                    vm_id: 0,
                    duration: 2.0,
                    start_time: 0.0,
                    finish_time: 2.0,
                },
                WorkRecord {
                    id: 1,
                    vm_id: 0,
                    duration: 1.0,
                    start_time: 2.0,
                    finish_time: 3.0,
                },
                WorkRecord {
                    id: 2,
                    vm_id: 1,
                    duration: 3.0,
                    start_time: 0.5,
                    finish_time: 3.5,
                },
            ],
            section_found: true,
            skipped_rows: 1,
        }
    }

    #[test]
    fn summary_aggregates_records() {
        let summary = RunSummary::from_log("TimeShared", &sample_log(), 55);
        assert_eq!(summary.record_count, 3);
        assert_eq!(summary.skipped_rows, 1);
        assert_eq!(summary.vm_count, 3);
        assert_eq!(summary.makespan, 3.5);
        assert_eq!(summary.avg_duration, 2.0);
        assert_eq!(summary.frame_count, 55);
        let busy: Vec<f64> = summary.vm_busy_time.iter().map(|b| b.busy).collect();
        assert_eq!(busy, vec![3.0, 3.0, 0.0]);
    }

    #[test]
    fn empty_run_has_zero_metrics() {
        let summary = RunSummary::from_log("SpaceShared", &ExecutionLog::default(), 0);
        assert_eq!(summary.makespan, 0.0);
        assert_eq!(summary.avg_duration, 0.0);
        assert_eq!(summary.vm_busy_time.len(), 1);
    }

    #[test]
    fn summary_is_written_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        RunSummary::from_log("TimeShared", &sample_log(), 55).write_json(&path).unwrap();

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["strategy"], "TimeShared");
        assert_eq!(value["record_count"], 3);
        assert_eq!(value["vm_busy_time"][1]["vm_id"], 1);
        assert!(value["generated_at"].as_str().unwrap().contains('T'));
    }
}
