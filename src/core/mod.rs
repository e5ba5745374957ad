//! Core rate-estimation and reporting for the idle tracker.
//!
//! This module contains:
//! - Differential logs and the averaging strategies over them
//! - Magnitude and elapsed-time formatting
//! - Run-by-run progress reporting

pub mod format;
pub mod rate;
pub mod report;

// Re-export commonly used types
pub use format::{format_elapsed, format_magnitude};
pub use rate::{AveragingMode, RateEstimator, TickOutcome};
pub use report::ProgressTracker;
