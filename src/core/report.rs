//! Run-by-run progress reporting.
//!
//! The tracker owns the estimator, numbers the runs, and renders the
//! two-column report the automation prints after every run:
//!
//! ```text
//! ------------------ 2 -------------------
//!         XP        |         PP
//! ----------------------------------------
//! This run:   1.5K  | This run:    12
//! Current:    11K   | Current:    203
//! Per hour:   20K   | Per hour:   240
//!
//!                 0:09:00
//! ```

use crate::capture::Metric;
use crate::clock::Clock;
use crate::core::format::{format_elapsed, format_magnitude};
use crate::core::rate::RateEstimator;
use crate::session::SharedSessionLog;
use crate::sink::Sink;
use std::sync::Arc;

/// Width of the report banner and separator rules.
const REPORT_WIDTH: usize = 40;

/// Orchestrates a sequence of numbered runs over a [`RateEstimator`].
///
/// The first run only has starting values to show; every later run shows
/// this-run deltas, current values, per-hour rates, and total elapsed time.
pub struct ProgressTracker {
    estimator: RateEstimator,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn Sink>,
    session: SharedSessionLog,
    start_time: f64,
    iteration: u64,
}

impl ProgressTracker {
    /// Create the tracker and emit the first-run banner with starting values.
    pub fn new(
        estimator: RateEstimator,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn Sink>,
        session: SharedSessionLog,
    ) -> Self {
        let start_time = clock.now();
        let tracker = Self {
            estimator,
            clock,
            sink,
            session,
            start_time,
            iteration: 1,
        };
        tracker.emit_banner();
        let starting: Vec<String> = Metric::ALL
            .iter()
            .map(|&m| format_magnitude(tracker.estimator.reader().last_known(m) as f64))
            .collect();
        tracker.sink.emit(&row("Starting: ", &starting));
        tracker
    }

    /// Advance by one completed run: tick the estimator, emit the report,
    /// and open the banner for the next run.
    pub fn advance(&mut self) {
        let outcomes = self.estimator.tick();
        self.iteration += 1;
        self.session.record_run_completed();

        let deltas: Vec<String> = outcomes
            .iter()
            .map(|o| format_magnitude(o.delta))
            .collect();
        self.sink.emit(&row("This run: ", &deltas));

        let currents: Vec<String> = Metric::ALL
            .iter()
            .map(|&m| format_magnitude(self.estimator.reader().last_known(m) as f64))
            .collect();
        self.sink.emit(&row("Current:  ", &currents));

        let rates: Vec<String> = outcomes
            .iter()
            .map(|o| format_magnitude(o.per_hour as f64))
            .collect();
        self.sink.emit(&row("Per hour: ", &rates));

        let elapsed = (self.clock.now() - self.start_time).round().max(0.0) as u64;
        self.sink.emit("");
        self.sink
            .emit(&format!("{:^REPORT_WIDTH$}", format_elapsed(elapsed)));
        self.sink.emit("");

        self.emit_banner();
    }

    /// Re-sync a metric's baseline after an exogenous spend; see
    /// [`RateEstimator::resync`].
    pub fn resync(&mut self, metric: Metric) {
        self.estimator.resync(metric);
    }

    /// Current run number, starting at 1.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn estimator(&self) -> &RateEstimator {
        &self.estimator
    }

    /// Mutable estimator access for out-of-band reads before a resync.
    pub fn estimator_mut(&mut self) -> &mut RateEstimator {
        &mut self.estimator
    }

    fn emit_banner(&self) {
        self.sink
            .emit(&format!("{:-^REPORT_WIDTH$}", format!(" {} ", self.iteration)));
        let mut captions = String::new();
        for (i, metric) in Metric::ALL.iter().enumerate() {
            if i > 0 {
                captions.push_str(&format!("{:^3}", "|"));
            }
            captions.push_str(&format!("{:^18}", metric.label()));
        }
        self.sink.emit(&captions);
        self.sink.emit(&"-".repeat(REPORT_WIDTH));
    }
}

/// One report row: a label and a centered cell per metric column.
fn row(label: &str, cells: &[String]) -> String {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            line.push_str(&format!("{:^3}", "|"));
        }
        line.push_str(label);
        line.push_str(&format!("{cell:^8}"));
    }
    line
}
