//! Presentation sinks for report and diagnostic lines.
//!
//! The engine never prints directly; every user-visible line goes through a
//! [`Sink`] so the same tracker can drive a console, a channel to a UI
//! thread, or an in-memory buffer in tests.

use crossbeam_channel::Sender;
use std::sync::{Arc, Mutex};

/// Fire-and-forget text sink. The engine does not depend on delivery
/// succeeding or being fast.
pub trait Sink: Send + Sync {
    fn emit(&self, line: &str);
}

/// Prints each line to stdout.
pub struct ConsoleSink;

impl Sink for ConsoleSink {
    fn emit(&self, line: &str) {
        println!("{line}");
    }
}

/// Forwards lines over a crossbeam channel, e.g. to keep a UI thread
/// responsive while a worker runs the automation.
pub struct ChannelSink {
    sender: Sender<String>,
}

impl ChannelSink {
    pub fn new(sender: Sender<String>) -> Self {
        Self { sender }
    }
}

impl Sink for ChannelSink {
    fn emit(&self, line: &str) {
        // A full or disconnected channel drops the line rather than blocking.
        let _ = self.sender.try_send(line.to_string());
    }
}

/// Collects emitted lines in memory for assertions.
#[derive(Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("sink lock poisoned").clone()
    }

    /// Whether any emitted line contains the given fragment.
    pub fn contains(&self, fragment: &str) -> bool {
        self.lines().iter().any(|line| line.contains(fragment))
    }
}

impl Sink for MemorySink {
    fn emit(&self, line: &str) {
        self.lines
            .lock()
            .expect("sink lock poisoned")
            .push(line.to_string());
    }
}
