//! Replay of cloud scheduling simulation logs.
//!
//! Parses the cloudlet results of an execution log, reconstructs each
//! cloudlet's timeline and renders it as a frame-by-frame lane animation.
//! A second pipeline charts the runtimes of two scheduling strategies taken
//! from a comparison report.

pub mod analyzer;
pub mod common;
pub mod config;
pub mod metrics;
pub mod pipeline;
pub mod render;
