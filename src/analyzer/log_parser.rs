//! Parse execution log text and extract structured `WorkRecord` data.
//!
//! A log is made of free-form sections. Two of them matter here:
//! - `SIMULATION CONFIGURATION:`: optional header with strategy and VM count
//! - `CLOUDLET EXECUTION RESULTS:`: one row per cloudlet, ended by a blank line

use super::types::{ExecutionLog, LogHeader, MAX_LANES, WorkRecord};

/// Default marker line that opens the results section.
pub const RESULTS_MARKER: &str = "CLOUDLET EXECUTION RESULTS:";

/// Status token of rows that are kept.
const SUCCESS_STATUS: &str = "SUCCESS";

/// Rows are printed with two decimals, so finish and start + duration may
/// legitimately disagree by this much.
const CONSISTENCY_TOLERANCE: f64 = 0.01;

/// Parse the full text of an execution log.
///
/// # Parameters
///
/// * `text` - Whole log file contents
/// * `marker` - Substring identifying the results section header line
///
/// # Returns
///
/// The parsed log. A missing marker yields an empty record set with
/// `section_found == false`; it is not an error.
///
/// # Log Format
///
/// ```text
/// SIMULATION CONFIGURATION:
/// - Scheduling Strategy: SpaceShared
/// - Number of VMs: 4
/// - Number of Cloudlets: 10
///
/// CLOUDLET EXECUTION RESULTS:
/// Cloudlet   Status     VM ID      Time            Start Time      Finish Time
/// 0          SUCCESS    0          4.00            0.10            4.10
/// 1          FAILED     1          0.00            0.10            0.10
///
/// PERFORMANCE SUMMARY:
/// ```
pub fn parse_execution_log(text: &str, marker: &str) -> ExecutionLog {
    let mut log = ExecutionLog {
        header: parse_header(text),
        ..Default::default()
    };

    let mut lines = text.lines();
    if lines.by_ref().any(|line| line.contains(marker)) {
        log.section_found = true;
    } else {
        log::warn!("Results marker {:?} not found, no records to show", marker);
        return log;
    }

    for line in lines {
        if line.trim().is_empty() {
            break;
        }
        match parse_result_row(line) {
            Some(record) => {
                check_consistency(&record);
                log.records.push(record);
            }
            None => {
                log::debug!("Skipping results row: {}", line);
                log.skipped_rows += 1;
            }
        }
    }

    log
}

/// Convenience wrapper returning only the records, using the default marker.
pub fn parse_records(text: &str) -> Vec<WorkRecord> {
    parse_execution_log(text, RESULTS_MARKER).records
}

/// Parse one row of the results table.
///
/// Expected fields, separated by whitespace:
/// `<id> SUCCESS <vm_id> <duration> <start> <finish>`. Anything after the sixth
/// field is ignored.
///
/// # Returns
///
/// `Some(record)` for a well-formed successful row that satisfies
/// `finish >= start >= 0`, `duration > 0` and `vm_id < MAX_LANES`, `None`
/// otherwise.
pub fn parse_result_row(line: &str) -> Option<WorkRecord> {
    let mut fields = line.split_whitespace();

    let id = parse_integer(fields.next()?)?;
    if fields.next()? != SUCCESS_STATUS {
        return None;
    }
    let vm_id = parse_integer(fields.next()?)?;
    if vm_id >= MAX_LANES {
        return None;
    }
    let duration = parse_decimal(fields.next()?)?;
    let start_time = parse_decimal(fields.next()?)?;
    let finish_time = parse_decimal(fields.next()?)?;

    if duration <= 0.0 || start_time < 0.0 || finish_time < start_time {
        return None;
    }

    Some(WorkRecord {
        id,
        vm_id,
        duration,
        start_time,
        finish_time,
    })
}

/// Parse an unsigned integer made of ASCII digits only.
fn parse_integer(token: &str) -> Option<u32> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Parse `digits` or `digits.fraction`. Signs and exponents are rejected.
fn parse_decimal(token: &str) -> Option<f64> {
    let (whole, fraction) = match token.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (token, ""),
    };

    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let value: f64 = token.parse().ok()?;
    value.is_finite().then_some(value)
}

/// Warn when the logged finish time does not match start + duration.
///
/// The record is kept as read; the log is the ground truth.
fn check_consistency(record: &WorkRecord) {
    let expected = record.start_time + record.duration;
    if (record.finish_time - expected).abs() > CONSISTENCY_TOLERANCE {
        log::warn!(
            "Cloudlet {}: finish time {:.2} differs from start {:.2} + duration {:.2}",
            record.id,
            record.finish_time,
            record.start_time,
            record.duration
        );
    }
}

/// Extract the optional configuration header values.
fn parse_header(text: &str) -> LogHeader {
    LogHeader {
        strategy: extract_field_str(text, "Scheduling Strategy:").map(str::to_string),
        vm_count: extract_field_str(text, "Number of VMs:")
            .and_then(|v| v.parse().ok())
            .filter(|&count: &u32| {
                let accepted = count <= MAX_LANES;
                if !accepted {
                    log::warn!("Ignoring header VM count {}, above the limit of {}", count, MAX_LANES);
                }
                accepted
            }),
        cloudlet_count: extract_field_str(text, "Number of Cloudlets:").and_then(|v| v.parse().ok()),
    }
}

/// Value following `field_name` on the first line containing it, trimmed.
fn extract_field_str<'a>(text: &'a str, field_name: &str) -> Option<&'a str> {
    let line = text.lines().find(|line| line.contains(field_name))?;
    let pos = line.find(field_name)?;
    let value = line[pos + field_name.len()..].trim();
    (!value.is_empty()).then_some(value)
}
