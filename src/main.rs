//! Idle Tracker CLI
//!
//! Run-rate telemetry tracker for idle-game automation.

use clap::{Parser, Subcommand};
use idle_tracker::{
    capture::SimulatedCapture,
    config::Config,
    core::{AveragingMode, ProgressTracker, RateEstimator},
    session::create_shared_log_with_persistence,
    sink::{ConsoleSink, Sink},
    ManualClock, SampleReader, VERSION,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "idle-tracker")]
#[command(version = VERSION)]
#[command(about = "Run-rate telemetry tracker for idle-game automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Track a simulated game session (stand-in for the real automation loop)
    Simulate {
        /// Number of runs to complete
        #[arg(long, default_value = "10")]
        runs: u64,

        /// Minutes per run (also sizes the moving window: 60 / duration)
        #[arg(long)]
        duration: Option<u32>,

        /// Averaging mode (average or moving_average)
        #[arg(long)]
        mode: Option<AveragingMode>,

        /// XP accrued per simulated second
        #[arg(long, default_value = "120.0")]
        xp_per_sec: f64,

        /// PP accrued per simulated second
        #[arg(long, default_value = "0.5")]
        pp_per_sec: f64,

        /// Garble every n-th capture to exercise the retry path (0 = never)
        #[arg(long, default_value = "0")]
        garble_every: u64,
    },

    /// Pause the automation
    Pause,

    /// Resume the automation
    Resume,

    /// Show persisted session statistics
    Status,

    /// Show configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            runs,
            duration,
            mode,
            xp_per_sec,
            pp_per_sec,
            garble_every,
        } => {
            cmd_simulate(runs, duration, mode, xp_per_sec, pp_per_sec, garble_every);
        }
        Commands::Pause => {
            cmd_pause();
        }
        Commands::Resume => {
            cmd_resume();
        }
        Commands::Status => {
            cmd_status();
        }
        Commands::Config => {
            cmd_config();
        }
    }
}

fn cmd_simulate(
    runs: u64,
    duration: Option<u32>,
    mode: Option<AveragingMode>,
    xp_per_sec: f64,
    pp_per_sec: f64,
    garble_every: u64,
) {
    println!("Idle Tracker v{VERSION}");
    println!();

    let config = Config::load().unwrap_or_default();
    if let Err(e) = config.ensure_directories() {
        eprintln!("Warning: failed to create data directory: {e}");
    }
    let duration = duration.unwrap_or(config.run_duration_mins).max(1);
    let mode = mode.unwrap_or(config.mode);

    println!("Simulating {runs} runs...");
    println!("  Run duration: {duration} min");
    println!("  Averaging mode: {mode}");
    if garble_every > 0 {
        println!("  Garbling every {garble_every}th capture");
    }
    println!();

    let session = create_shared_log_with_persistence(config.data_path.join("session.json"));
    println!("Session ID: {}", session.session_id());
    println!();

    let clock = ManualClock::new();
    let mut capture = SimulatedCapture::new(Arc::new(clock.clone()), xp_per_sec, pp_per_sec);
    if garble_every > 0 {
        capture = capture.with_garble_every(garble_every);
    }

    let sink: Arc<dyn Sink> = Arc::new(ConsoleSink);
    let reader = SampleReader::new(Box::new(capture), sink.clone(), session.clone());
    let estimator = match RateEstimator::new(
        reader,
        Arc::new(clock.clone()),
        sink.clone(),
        duration,
        mode,
    ) {
        Ok(estimator) => estimator,
        Err(e) => {
            eprintln!("Error seeding tracker: {e}");
            std::process::exit(1);
        }
    };
    let mut tracker = ProgressTracker::new(estimator, Arc::new(clock.clone()), sink, session.clone());

    let running = Arc::new(AtomicBool::new(true));
    ctrlc_handler(running.clone());

    let mut completed = 0;
    while completed < runs {
        if !running.load(Ordering::SeqCst) {
            println!();
            println!("Interrupted.");
            break;
        }

        // Reload config each run so `idle-tracker pause` from another
        // process takes effect on a running session.
        if Config::load().map(|cfg| cfg.paused).unwrap_or(false) {
            println!();
            println!("Paused. Waiting for `idle-tracker resume`...");
            while running.load(Ordering::SeqCst)
                && Config::load().map(|cfg| cfg.paused).unwrap_or(false)
            {
                thread::sleep(Duration::from_millis(200));
            }
            if !running.load(Ordering::SeqCst) {
                continue;
            }
            println!("Resumed.");
        }

        clock.advance_secs(f64::from(duration) * 60.0);
        tracker.advance();
        completed += 1;
    }

    if let Err(e) = session.save() {
        eprintln!("Warning: session log was not written: {e}");
    }

    println!();
    println!("{}", session.summary());
}

fn cmd_pause() {
    let mut config = Config::load().unwrap_or_default();
    config.paused = true;
    if let Err(e) = config.save() {
        eprintln!("Error saving config: {e}");
        std::process::exit(1);
    }
    println!("Tracking paused. A running simulate loop will stop at the next run boundary.");
}

fn cmd_resume() {
    let mut config = Config::load().unwrap_or_default();
    config.paused = false;
    if let Err(e) = config.save() {
        eprintln!("Error saving config: {e}");
        std::process::exit(1);
    }
    println!("Tracking resumed.");
}

fn cmd_status() {
    let config = Config::load().unwrap_or_default();

    println!("Idle Tracker Status");
    println!("===================");
    println!();
    println!("Configuration:");
    println!("  Run duration: {} min", config.run_duration_mins);
    println!("  Averaging mode: {}", config.mode);
    println!("  Paused: {}", config.paused);
    println!();

    let stats_path = config.data_path.join("session.json");
    if stats_path.exists() {
        if let Ok(content) = std::fs::read_to_string(&stats_path) {
            if let Ok(stats) = serde_json::from_str::<serde_json::Value>(&content) {
                println!("Cumulative Statistics:");
                if let Some(ok) = stats.get("reads_succeeded") {
                    println!("  Successful reads: {ok}");
                }
                if let Some(failures) = stats.get("parse_failures") {
                    println!("  Parse failures: {failures}");
                }
                if let Some(abandoned) = stats.get("reads_abandoned") {
                    println!("  Reads abandoned: {abandoned}");
                }
                if let Some(runs) = stats.get("runs_completed") {
                    println!("  Runs completed: {runs}");
                }
            }
        }
    } else {
        println!("No session stats recorded yet. Run `idle-tracker simulate` first.");
    }
}

fn cmd_config() {
    let config = Config::load().unwrap_or_default();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|_| "Error".to_string())
    );
}

/// Set up Ctrl+C handler.
fn ctrlc_handler(running: Arc<AtomicBool>) {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");
}
