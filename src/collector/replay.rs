//! Trace replay collector.
//!
//! Feeds a recorded input trace (JSON Lines, one event per line) into a
//! bounded channel, optionally paced to the trace's original timing, so the
//! evaluation side consumes replayed events exactly as it would consume live
//! ones. Host-input validation happens here, at the boundary: the scoring
//! core never sees malformed or out-of-order data.

use crate::collector::types::InputEvent;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Configuration for which event kinds the collector forwards.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub forward_keystrokes: bool,
    pub forward_pastes: bool,
    /// Replay with the trace's original inter-event delays
    pub paced: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            forward_keystrokes: true,
            forward_pastes: true,
            paced: false,
        }
    }
}

/// Errors that can occur while loading or replaying a trace.
#[derive(Debug)]
pub enum CollectorError {
    AlreadyStarted,
    Io(String),
}

impl std::fmt::Display for CollectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectorError::AlreadyStarted => write!(f, "Collector has already been started"),
            CollectorError::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for CollectorError {}

/// Result of parsing a JSON Lines trace.
#[derive(Debug, Default)]
pub struct ParsedTrace {
    /// Events in trace order, timestamps clamped to be non-decreasing
    pub events: Vec<InputEvent>,
    /// Lines that failed to parse and were dropped
    pub skipped_lines: usize,
    /// Events whose timestamp ran backwards and was clamped forward
    pub clamped_events: usize,
}

/// Parse a JSON Lines trace, dropping malformed lines and clamping
/// out-of-order timestamps forward.
pub fn parse_trace(content: &str) -> ParsedTrace {
    let mut parsed = ParsedTrace::default();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<InputEvent>(line) {
            Ok(event) => parsed.events.push(event),
            Err(_) => parsed.skipped_lines += 1,
        }
    }

    let mut last_ms = 0u64;
    for event in &mut parsed.events {
        if event.at_ms() < last_ms {
            parsed.clamped_events += 1;
            match event {
                InputEvent::Keystroke(e) => e.at_ms = last_ms,
                InputEvent::Paste(e) => e.at_ms = last_ms,
            }
        }
        last_ms = event.at_ms();
    }

    parsed
}

/// A collector that replays a recorded trace once.
pub struct ReplayCollector {
    config: CollectorConfig,
    events: Vec<InputEvent>,
    sender: Option<Sender<InputEvent>>,
    receiver: Receiver<InputEvent>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ReplayCollector {
    /// Create a collector over an in-memory event list.
    pub fn from_events(events: Vec<InputEvent>, config: CollectorConfig) -> Self {
        let (sender, receiver) = bounded(10_000);
        Self {
            config,
            events,
            sender: Some(sender),
            receiver,
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Load a JSON Lines trace from disk.
    ///
    /// Malformed lines are dropped and out-of-order timestamps clamped, with
    /// a warning on stderr for each kind.
    pub fn from_path(path: &Path, config: CollectorConfig) -> Result<Self, CollectorError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CollectorError::Io(e.to_string()))?;
        let parsed = parse_trace(&content);

        if parsed.skipped_lines > 0 {
            eprintln!(
                "Warning: skipped {} malformed line(s) in {path:?}",
                parsed.skipped_lines
            );
        }
        if parsed.clamped_events > 0 {
            eprintln!(
                "Warning: clamped {} out-of-order timestamp(s) in {path:?}",
                parsed.clamped_events
            );
        }

        Ok(Self::from_events(parsed.events, config))
    }

    /// Number of events queued for replay.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Start replaying on a background thread.
    ///
    /// The channel disconnects once the trace is exhausted, which is how
    /// consumers detect end of replay. A collector replays its trace once;
    /// a second `start` fails.
    pub fn start(&mut self) -> Result<(), CollectorError> {
        let sender = self.sender.take().ok_or(CollectorError::AlreadyStarted)?;
        self.running.store(true, Ordering::SeqCst);

        let events = std::mem::take(&mut self.events);
        let config = self.config.clone();
        let running = self.running.clone();

        self.handle = Some(thread::spawn(move || {
            replay_events(events, &config, &sender, &running);
            running.store(false, Ordering::SeqCst);
        }));

        Ok(())
    }

    /// Stop an in-progress replay and wait for the thread to finish.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Check if the replay thread is still feeding events.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Get the receiver for replayed events.
    pub fn receiver(&self) -> &Receiver<InputEvent> {
        &self.receiver
    }
}

fn replay_events(
    events: Vec<InputEvent>,
    config: &CollectorConfig,
    sender: &Sender<InputEvent>,
    running: &AtomicBool,
) {
    let mut last_ms = events.first().map(|e| e.at_ms()).unwrap_or(0);

    for event in events {
        if !running.load(Ordering::SeqCst) {
            break;
        }

        if config.paced {
            let mut wait = event.at_ms().saturating_sub(last_ms);
            // Sleep in short slices so stop() stays responsive.
            while wait > 0 && running.load(Ordering::SeqCst) {
                let slice = wait.min(100);
                thread::sleep(Duration::from_millis(slice));
                wait -= slice;
            }
            last_ms = event.at_ms();
        }

        let forward = match &event {
            InputEvent::Keystroke(_) => config.forward_keystrokes,
            InputEvent::Paste(_) => config.forward_pastes,
        };
        if !forward {
            continue;
        }

        // Bounded send with a timeout so stop() can always join this
        // thread, even when the consumer has gone away with a full queue.
        let mut pending = event;
        loop {
            if !running.load(Ordering::SeqCst) {
                return;
            }
            match sender.send_timeout(pending, Duration::from_millis(100)) {
                Ok(()) => break,
                Err(crossbeam_channel::SendTimeoutError::Timeout(ev)) => pending = ev,
                Err(crossbeam_channel::SendTimeoutError::Disconnected(_)) => return,
            }
        }
    }
}
