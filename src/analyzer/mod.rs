//! Analyzer module for execution log parsing and timeline replay.
//!
//! Provides functionality for:
//! - Loading and parsing the results section of an execution log
//! - Computing per-cloudlet visual state for any simulated time
//! - Driving a renderer frame by frame over the simulated time axis
//! - Summarizing a run for the JSON report

pub mod driver;
pub mod frame_engine;
pub mod log_loader;
pub mod log_parser;
pub mod summary;
pub mod types;

pub use driver::{Frame, Timeline, run_animation};
pub use frame_engine::{LaneLayout, RecordState};
pub use log_loader::load_execution_log;
pub use summary::RunSummary;
pub use types::{ExecutionLog, MAX_LANES, RenderState, Status, WorkRecord};
