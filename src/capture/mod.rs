//! Screen-reading side of the tracker.
//!
//! The navigation, pixel clicking, and OCR machinery live outside this
//! crate; everything here talks to them through the [`CaptureSource`] trait,
//! so the engine runs unchanged against the real screen reader, a scripted
//! fake, or a simulated game.

pub mod reader;
pub mod sim;
pub mod types;

// Re-export commonly used types
pub use reader::{parse_reading, ReadError, SampleReader, RETRY_CAP};
pub use sim::{ScriptedCapture, SimulatedCapture};
pub use types::Metric;

/// One screen reading for a named metric.
///
/// Implementations navigate to the right menu, grab the region, and OCR it.
/// The returned text is raw: it may be empty, carry separators, or be
/// garbled, and is parsed (and retried) by [`SampleReader`].
pub trait CaptureSource: Send + Sync {
    fn capture(&self, metric: Metric) -> String;
}
