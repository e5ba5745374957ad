//! Idle Tracker - run-rate telemetry for idle-game automation.
//!
//! This library turns noisy, failure-prone screen readings into reliable
//! numeric samples and derives stable value-per-hour estimates across
//! repeated runs of an automated idle game.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Idle Tracker                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐        │
//! │  │SampleReader │──▶│    Rate     │──▶│  Progress   │        │
//! │  │(OCR + retry)│   │  Estimator  │   │  Tracker    │        │
//! │  └─────────────┘   └─────────────┘   └─────────────┘        │
//! │         │                                    │              │
//! │         ▼                                    ▼              │
//! │  ┌─────────────┐                     ┌─────────────┐        │
//! │  │   Session   │                     │    Sink     │        │
//! │  │     Log     │                     │ (reports)   │        │
//! │  └─────────────┘                     └─────────────┘        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The window discovery, pixel clicking, and OCR machinery are external
//! collaborators behind three small traits: [`CaptureSource`] produces raw
//! screen text per metric, [`Clock`] supplies monotonic seconds, and
//! [`Sink`] receives formatted report lines. All three are substitutable,
//! so retry and averaging behavior is testable without a screen or a
//! wall clock.
//!
//! # Example
//!
//! ```
//! use idle_tracker::{
//!     AveragingMode, ManualClock, MemorySink, Metric, ProgressTracker, RateEstimator,
//!     SampleReader, ScriptedCapture,
//! };
//! use idle_tracker::session::create_shared_log;
//! use std::sync::Arc;
//!
//! let capture = ScriptedCapture::new();
//! capture.push_value(Metric::Xp, 10_000);
//! capture.push_value(Metric::Pp, 100);
//!
//! let clock = ManualClock::new();
//! let sink = Arc::new(MemorySink::new());
//! let session = create_shared_log();
//!
//! let reader = SampleReader::new(Box::new(capture.clone()), sink.clone(), session.clone());
//! let estimator = RateEstimator::new(
//!     reader,
//!     Arc::new(clock.clone()),
//!     sink.clone(),
//!     3,
//!     AveragingMode::MovingAverage,
//! )
//! .expect("seed reads scripted");
//! let mut tracker = ProgressTracker::new(estimator, Arc::new(clock.clone()), sink, session);
//!
//! // One completed 3-minute run later:
//! clock.advance_secs(180.0);
//! capture.push_value(Metric::Xp, 11_000);
//! capture.push_value(Metric::Pp, 100);
//! tracker.advance();
//! assert_eq!(tracker.iteration(), 2);
//! ```

pub mod capture;
pub mod clock;
pub mod config;
pub mod core;
pub mod session;
pub mod sink;

// Re-export key types at crate root for convenience
pub use capture::{CaptureSource, Metric, ReadError, SampleReader, ScriptedCapture, SimulatedCapture};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, ConfigError};
pub use core::{
    format_elapsed, format_magnitude, AveragingMode, ProgressTracker, RateEstimator, TickOutcome,
};
pub use session::{SessionLog, SessionStats, SharedSessionLog};
pub use sink::{ChannelSink, ConsoleSink, MemorySink, Sink};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
