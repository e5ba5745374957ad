//! Deterministic capture sources.
//!
//! Real captures navigate the game window and run OCR; these stand-ins make
//! retry and averaging behavior reproducible. [`ScriptedCapture`] replays
//! queued responses for tests, [`SimulatedCapture`] plays a fake game whose
//! counters accrue with the clock.

use crate::capture::types::Metric;
use crate::capture::CaptureSource;
use crate::clock::Clock;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct ScriptedInner {
    queues: HashMap<Metric, VecDeque<String>>,
    fallback: String,
    attempts: HashMap<Metric, u64>,
}

/// Capture source that replays queued responses per metric.
///
/// When a metric's queue is empty the fallback text (empty by default, i.e.
/// unparseable) is returned. Clones share state, so a test can keep a handle
/// for scripting and inspection after moving one into the reader.
#[derive(Clone, Default)]
pub struct ScriptedCapture {
    inner: Arc<Mutex<ScriptedInner>>,
}

impl ScriptedCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw OCR response for a metric.
    pub fn push(&self, metric: Metric, text: impl Into<String>) {
        self.inner
            .lock()
            .expect("capture lock poisoned")
            .queues
            .entry(metric)
            .or_default()
            .push_back(text.into());
    }

    /// Queue a clean numeric response for a metric.
    pub fn push_value(&self, metric: Metric, value: u64) {
        self.push(metric, value.to_string());
    }

    /// Text returned once a metric's queue runs dry.
    pub fn set_fallback(&self, text: impl Into<String>) {
        self.inner.lock().expect("capture lock poisoned").fallback = text.into();
    }

    /// How many captures have been attempted for a metric.
    pub fn attempts(&self, metric: Metric) -> u64 {
        self.inner
            .lock()
            .expect("capture lock poisoned")
            .attempts
            .get(&metric)
            .copied()
            .unwrap_or(0)
    }
}

impl CaptureSource for ScriptedCapture {
    fn capture(&self, metric: Metric) -> String {
        let mut inner = self.inner.lock().expect("capture lock poisoned");
        *inner.attempts.entry(metric).or_insert(0) += 1;
        match inner.queues.get_mut(&metric).and_then(|q| q.pop_front()) {
            Some(text) => text,
            None => inner.fallback.clone(),
        }
    }
}

/// Capture source backed by a fake game whose counters grow linearly with
/// the clock. Optionally garbles every n-th capture to exercise the retry
/// path end to end.
pub struct SimulatedCapture {
    clock: Arc<dyn Clock>,
    xp_per_sec: f64,
    pp_per_sec: f64,
    garble_every: Option<u64>,
    calls: AtomicU64,
}

impl SimulatedCapture {
    pub fn new(clock: Arc<dyn Clock>, xp_per_sec: f64, pp_per_sec: f64) -> Self {
        Self {
            clock,
            xp_per_sec,
            pp_per_sec,
            garble_every: None,
            calls: AtomicU64::new(0),
        }
    }

    /// Return garbled text on every n-th capture.
    pub fn with_garble_every(mut self, n: u64) -> Self {
        self.garble_every = (n > 0).then_some(n);
        self
    }
}

impl CaptureSource for SimulatedCapture {
    fn capture(&self, metric: Metric) -> String {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(n) = self.garble_every {
            if call % n == 0 {
                return "~#?".to_string();
            }
        }

        let per_sec = match metric {
            Metric::Xp => self.xp_per_sec,
            Metric::Pp => self.pp_per_sec,
        };
        let value = (per_sec * self.clock.now()).floor() as u64;
        group_thousands(value)
    }
}

/// Render a value with thousands separators, the way the game draws it.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
