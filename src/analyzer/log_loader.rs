//! File access for execution logs.
//!
//! The whole log is read into memory at once; logs are small and the parser
//! needs look-back for the configuration header.

use std::path::Path;

use crate::common::input::{InputError, read_input_file};

use super::log_parser::parse_execution_log;
use super::types::ExecutionLog;

/// Load and parse an execution log.
///
/// # Parameters
///
/// * `path` - Path to the log file
/// * `marker` - Results section marker
///
/// # Returns
///
/// `Ok(ExecutionLog)` when the file could be read (possibly with no records),
/// `Err` if the file is missing or unreadable.
pub fn load_execution_log(path: &Path, marker: &str) -> Result<ExecutionLog, InputError> {
    let text = read_input_file(path)?;
    let log = parse_execution_log(&text, marker);

    log::info!(
        "Loaded {} cloudlet record(s) from {} ({} row(s) skipped)",
        log.records.len(),
        path.display(),
        log.skipped_rows
    );

    Ok(log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::log_parser::RESULTS_MARKER;
    use std::io::Write;

    #[test]
    fn loads_records_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "CLOUDLET EXECUTION RESULTS:").unwrap();
        writeln!(file, "1 SUCCESS 0 2.0 0.0 2.0").unwrap();
        writeln!(file, "2 SUCCESS 1 3.0 1.0 4.0").unwrap();

        let log = load_execution_log(file.path(), RESULTS_MARKER).unwrap();
        assert_eq!(log.records.len(), 2);
        assert!(log.section_found);
    }

    #[test]
    fn missing_log_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_execution_log(&dir.path().join("missing.txt"), RESULTS_MARKER);
        assert!(matches!(result, Err(InputError::MissingFile(_))));
    }
}
