//! Reading of input text files shared by the log and report pipelines.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Error type for input file failures. Both variants are fatal for the run.
#[derive(Debug)]
pub enum InputError {
    /// The path does not exist.
    MissingFile(PathBuf),
    /// The file exists but could not be read (permissions, invalid UTF-8, ...).
    ReadError(PathBuf, String),
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::MissingFile(path) => write!(f, "File not found: {}", path.display()),
            InputError::ReadError(path, msg) => write!(f, "Failed to read {}: {}", path.display(), msg),
        }
    }
}

impl std::error::Error for InputError {}

/// Read a whole text file into memory.
///
/// # Parameters
///
/// * `path` - File to read
///
/// # Returns
///
/// The file contents, `InputError::MissingFile` if the path does not exist,
/// `InputError::ReadError` for any other failure.
pub fn read_input_file(path: &Path) -> Result<String, InputError> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => InputError::MissingFile(path.to_path_buf()),
        _ => InputError::ReadError(path.to_path_buf(), e.to_string()),
    })
}
