//! Extraction of runtime values from a scheduling comparison report.
//!
//! The report is free text; only two labeled lines matter:
//!
//! ```text
//! - Time-Shared Runtime: 0.153s
//! - Space-Shared Runtime: 0.021s
//! ```

pub const TIME_SHARED_LABEL: &str = "Time-Shared Runtime:";
pub const SPACE_SHARED_LABEL: &str = "Space-Shared Runtime:";

/// Runtime values found in a report. A missing label leaves its value `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RuntimeMetrics {
    pub time_shared: Option<f64>,
    pub space_shared: Option<f64>,
}

impl RuntimeMetrics {
    /// Labels of the values that could not be found.
    pub fn missing_labels(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.time_shared.is_none() {
            missing.push(TIME_SHARED_LABEL);
        }
        if self.space_shared.is_none() {
            missing.push(SPACE_SHARED_LABEL);
        }
        missing
    }
}

/// Extract both runtime values from report text.
pub fn extract_runtimes(text: &str) -> RuntimeMetrics {
    RuntimeMetrics {
        time_shared: extract_labeled_seconds(text, TIME_SHARED_LABEL),
        space_shared: extract_labeled_seconds(text, SPACE_SHARED_LABEL),
    }
}

/// Find `<label> <number>s` anywhere in `text`.
///
/// Whitespace between the label and the number is optional. The number is made
/// of digits and dots and must be followed directly by `s`. The first
/// occurrence of the label that fits the pattern wins.
pub fn extract_labeled_seconds(text: &str, label: &str) -> Option<f64> {
    text.match_indices(label).find_map(|(pos, _)| {
        let rest = text[pos + label.len()..].trim_start();
        let end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if end == 0 || !rest[end..].starts_with('s') {
            return None;
        }
        rest[..end].parse::<f64>().ok().filter(|v| v.is_finite())
    })
}
