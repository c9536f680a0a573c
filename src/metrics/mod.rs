//! Runtime comparison between the Time-Shared and Space-Shared runs.
//!
//! Reads the comparison report, extracts the two runtime values and renders
//! them as a bar chart.

pub mod comparison;
pub mod report_parser;

pub use comparison::{ComparisonError, StrategyComparison, chart_runtimes};
pub use report_parser::{RuntimeMetrics, extract_runtimes};
