//! Comparison of the two scheduling strategies and the chart step.

use std::path::Path;

use crate::render::chart::{Bar, SALMON, SKY_BLUE, draw_bar_chart};

use super::report_parser::RuntimeMetrics;

pub const TIME_SHARED: &str = "Time-Shared";
pub const SPACE_SHARED: &str = "Space-Shared";

/// Error type for the comparison chart step.
#[derive(Debug)]
pub enum ComparisonError {
    /// One or both runtime values were absent from the report.
    MissingMetric(Vec<&'static str>),
    /// The chart could not be drawn or saved.
    ChartError(String),
}

impl std::fmt::Display for ComparisonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComparisonError::MissingMetric(labels) => write!(
                f,
                "Could not extract execution times from the report (missing: {})",
                labels.join(", ")
            ),
            ComparisonError::ChartError(msg) => write!(f, "Failed to render comparison chart: {}", msg),
        }
    }
}

impl std::error::Error for ComparisonError {}

/// Both runtimes of a complete report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyComparison {
    pub time_shared: f64,
    pub space_shared: f64,
}

impl StrategyComparison {
    /// Build a comparison, failing if either value is missing.
    pub fn from_metrics(metrics: &RuntimeMetrics) -> Result<Self, ComparisonError> {
        match (metrics.time_shared, metrics.space_shared) {
            (Some(time_shared), Some(space_shared)) => Ok(Self {
                time_shared,
                space_shared,
            }),
            _ => Err(ComparisonError::MissingMetric(metrics.missing_labels())),
        }
    }

    /// Strategy with the strictly smaller runtime; a tie goes to Space-Shared.
    pub fn faster(&self) -> &'static str {
        if self.time_shared < self.space_shared {
            TIME_SHARED
        } else {
            SPACE_SHARED
        }
    }

    pub fn bars(&self) -> Vec<Bar> {
        vec![
            Bar {
                label: TIME_SHARED.to_string(),
                value: self.time_shared,
                color: SKY_BLUE,
            },
            Bar {
                label: SPACE_SHARED.to_string(),
                value: self.space_shared,
                color: SALMON,
            },
        ]
    }
}

/// Render the runtime comparison chart.
///
/// No image is written unless both values are present.
pub fn chart_runtimes(
    metrics: &RuntimeMetrics,
    path: &Path,
    width: u32,
    height: u32,
) -> Result<StrategyComparison, ComparisonError> {
    let comparison = StrategyComparison::from_metrics(metrics)?;
    draw_bar_chart(&comparison.bars(), path, width, height)
        .map_err(|e| ComparisonError::ChartError(format!("{:#}", e)))?;
    Ok(comparison)
}
