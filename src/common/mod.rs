//! Helpers shared by the log and report pipelines.

pub mod input;
