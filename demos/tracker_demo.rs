//! Demonstration of the idle tracker telemetry engine.
//!
//! This example shows how to:
//! 1. Wire a capture source, clock, and sink into the engine
//! 2. Advance the tracker once per completed run
//! 3. Re-sync a metric baseline after an exogenous spend
//! 4. Inspect the session log afterwards
//!
//! Run with: cargo run --example tracker_demo

use std::sync::Arc;

use idle_tracker::{
    capture::SimulatedCapture,
    core::{AveragingMode, ProgressTracker, RateEstimator},
    session::create_shared_log,
    sink::{ConsoleSink, Sink},
    ManualClock, Metric, SampleReader,
};

fn main() {
    println!("Idle Tracker - Telemetry Demo");
    println!("=============================");
    println!();

    // A fake game: 120 XP and 0.5 PP per second, with every 9th capture
    // garbled so the bounded retry is visible in the output.
    let clock = ManualClock::new();
    let capture =
        SimulatedCapture::new(Arc::new(clock.clone()), 120.0, 0.5).with_garble_every(9);

    let sink: Arc<dyn Sink> = Arc::new(ConsoleSink);
    let session = create_shared_log();
    let reader = SampleReader::new(Box::new(capture), sink.clone(), session.clone());

    // 3-minute runs with a 20-run moving window.
    let estimator = RateEstimator::new(
        reader,
        Arc::new(clock.clone()),
        sink.clone(),
        3,
        AveragingMode::MovingAverage,
    )
    .expect("simulated seed reads cannot exhaust");
    let mut tracker = ProgressTracker::new(estimator, Arc::new(clock.clone()), sink, session.clone());

    // Five completed runs.
    for _ in 0..5 {
        clock.advance_secs(180.0);
        tracker.advance();
    }

    // A purchase between runs: re-read XP, then re-sync the baseline so the
    // spend does not distort the next run's delta.
    let _ = tracker.estimator_mut().reader_mut().read(Metric::Xp);
    tracker.resync(Metric::Xp);

    clock.advance_secs(180.0);
    tracker.advance();

    println!();
    println!("{}", session.summary());
}
