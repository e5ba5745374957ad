//! Session diagnostics for the idle tracker.
//!
//! Tracks capture health and run counts across a tracking session so
//! persistent OCR trouble is visible without digging through report output.

pub mod log;

// Re-export commonly used types
pub use log::{
    create_shared_log, create_shared_log_with_persistence, SessionLog, SessionStats,
    SharedSessionLog,
};
