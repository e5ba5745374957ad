//! Sample acquisition with bounded retry over an unreliable capture path.
//!
//! Screen OCR misreads under animation and rendering jitter. A bounded retry
//! absorbs transient garbage without masking a persistently broken capture
//! path, which instead surfaces as [`ReadError::Exhausted`].

use crate::capture::types::Metric;
use crate::capture::CaptureSource;
use crate::session::SharedSessionLog;
use crate::sink::Sink;
use std::sync::Arc;

/// Consecutive failures tolerated before a read is abandoned.
///
/// A read starting from a clean counter makes at most `RETRY_CAP + 1`
/// capture attempts.
pub const RETRY_CAP: u32 = 3;

/// Errors from reading a metric off the screen.
#[derive(Debug)]
pub enum ReadError {
    /// Captured text contained no parseable number. Transient; consumed by
    /// the retry loop and only returned by [`parse_reading`].
    Garbled { metric: Metric, raw: String },
    /// Retry budget spent without a successful parse.
    Exhausted { metric: Metric, attempts: u32 },
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::Garbled { metric, raw } => {
                write!(f, "Could not parse {metric} reading {raw:?}")
            }
            ReadError::Exhausted { metric, attempts } => {
                write!(f, "Gave up reading {metric} after {attempts} failed attempts")
            }
        }
    }
}

impl std::error::Error for ReadError {}

/// Strip everything that is not an ASCII digit and parse what remains.
///
/// OCR output routinely carries thousands separators, stray letters, and
/// whitespace; `"1,234,567"` and `"Lv1 234"` both parse, an empty or
/// all-noise string does not.
pub fn parse_reading(metric: Metric, raw: &str) -> Result<u64, ReadError> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse::<u64>().map_err(|_| ReadError::Garbled {
        metric,
        raw: raw.to_string(),
    })
}

/// Per-metric capture state.
struct MetricState {
    metric: Metric,
    /// Consecutive parse failures. Reset only by a successful read, not by
    /// abandonment.
    failures: u32,
    /// Last successfully read cumulative value.
    last_known: u64,
}

/// Reads numeric metric values through a [`CaptureSource`], retrying a
/// bounded number of times when the captured text does not parse.
pub struct SampleReader {
    capture: Box<dyn CaptureSource>,
    sink: Arc<dyn Sink>,
    session: SharedSessionLog,
    states: Vec<MetricState>,
}

impl SampleReader {
    pub fn new(
        capture: Box<dyn CaptureSource>,
        sink: Arc<dyn Sink>,
        session: SharedSessionLog,
    ) -> Self {
        let states = Metric::ALL
            .iter()
            .map(|&metric| MetricState {
                metric,
                failures: 0,
                last_known: 0,
            })
            .collect();
        Self {
            capture,
            sink,
            session,
            states,
        }
    }

    /// Read the current cumulative value of a metric.
    ///
    /// Each failed parse increments the metric's consecutive-failure counter
    /// and, while the counter is within [`RETRY_CAP`], the whole
    /// capture-and-parse is retried immediately. Once the counter exceeds the
    /// cap the read is abandoned; the counter stays where it is and is only
    /// cleared by the next successful read.
    pub fn read(&mut self, metric: Metric) -> Result<u64, ReadError> {
        loop {
            let raw = self.capture.capture(metric);
            match parse_reading(metric, &raw) {
                Ok(value) => {
                    let state = self.state_mut(metric);
                    state.failures = 0;
                    state.last_known = value;
                    self.session.record_read_succeeded();
                    return Ok(value);
                }
                Err(_) => {
                    self.session.record_parse_failure();
                    let state = self.state_mut(metric);
                    state.failures += 1;
                    let attempts = state.failures;
                    if attempts > RETRY_CAP {
                        let err = ReadError::Exhausted { metric, attempts };
                        self.sink.emit(&err.to_string());
                        self.session.record_read_abandoned();
                        return Err(err);
                    }
                    self.sink
                        .emit(&format!("OCR couldn't detect {metric}, retrying."));
                }
            }
        }
    }

    /// Last successfully read cumulative value for a metric.
    pub fn last_known(&self, metric: Metric) -> u64 {
        self.state(metric).last_known
    }

    /// Current consecutive-failure count for a metric.
    pub fn failures(&self, metric: Metric) -> u32 {
        self.state(metric).failures
    }

    fn state(&self, metric: Metric) -> &MetricState {
        self.states
            .iter()
            .find(|s| s.metric == metric)
            .expect("every metric has a state")
    }

    fn state_mut(&mut self, metric: Metric) -> &mut MetricState {
        self.states
            .iter_mut()
            .find(|s| s.metric == metric)
            .expect("every metric has a state")
    }
}
