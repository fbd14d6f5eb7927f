//! Demonstration of typewitness trace replay and evaluation.
//!
//! This example shows how to:
//! 1. Build input-event traces
//! 2. Replay them through a collector
//! 3. Accumulate a typing session from the replayed events
//! 4. Compute features, score, and verdict
//! 5. Generate an exportable verdict report
//!
//! Run with: cargo run --example replay_demo

use std::time::Duration;

use typewitness::{
    collector::{CollectorConfig, InputEvent, KeystrokeEvent, PasteEvent, ReplayCollector},
    config::AnalyzerConfig,
    core::{ReportBuilder, TypingSession},
    transparency::TransparencyLog,
    DATA_HANDLING_DECLARATION,
};

/// An uneven, pause-heavy cadence with a couple of corrections - the shape
/// of a person drafting text.
fn human_trace() -> Vec<InputEvent> {
    let gaps = [
        180u64, 240, 410, 150, 900, 230, 310, 170, 520, 260, 1400, 210, 340, 190, 600,
    ];

    let mut events = Vec::new();
    let mut at_ms = 0u64;
    events.push(InputEvent::Keystroke(KeystrokeEvent::new("t", false, at_ms)));
    for (i, gap) in gaps.iter().enumerate() {
        at_ms += gap;
        let key = if i == 4 { "Backspace" } else { "e" };
        events.push(InputEvent::Keystroke(KeystrokeEvent::new(key, false, at_ms)));
    }
    events.push(InputEvent::Paste(PasteEvent::new(42, at_ms + 500)));
    events
}

/// A flat 45 ms cadence plus heavy pasting - the shape of scripted input.
fn bot_trace() -> Vec<InputEvent> {
    let mut events = Vec::new();
    let mut at_ms = 0u64;
    for _ in 0..60 {
        events.push(InputEvent::Keystroke(KeystrokeEvent::new("x", false, at_ms)));
        at_ms += 45;
    }
    for _ in 0..5 {
        events.push(InputEvent::Paste(PasteEvent::new(800, at_ms)));
        at_ms += 45;
    }
    events
}

fn evaluate(label: &str, events: Vec<InputEvent>, transparency_log: &TransparencyLog) {
    println!("=== {label} ===");
    println!("  Trace events: {}", events.len());

    let mut collector = ReplayCollector::from_events(events, CollectorConfig::default());
    if let Err(e) = collector.start() {
        eprintln!("Error starting replay: {e}");
        return;
    }

    // Drain the channel; it disconnects when the trace is exhausted.
    let mut session = TypingSession::new();
    let receiver = collector.receiver().clone();
    while let Ok(event) = receiver.recv_timeout(Duration::from_millis(500)) {
        match &event {
            InputEvent::Keystroke(_) => transparency_log.record_keystroke_event(),
            InputEvent::Paste(_) => transparency_log.record_paste_event(),
        }
        session.record_event(&event);
    }
    collector.stop();

    let config = AnalyzerConfig::default();
    let builder = ReportBuilder::new().with_session_id(label.to_string());
    let report = builder.build(&session, &config);
    transparency_log.record_session_analyzed();

    println!(
        "  Keystrokes: {} | pastes: {}",
        report.session.keystrokes, report.session.paste_events
    );
    println!(
        "  Mean interval: {:.1} ms | variability: {:.1} ms | paste activity: {}",
        report.features.mean_interval_ms,
        report.features.interval_variability,
        report.features.paste_activity
    );
    println!(
        "  Score: {} (fast typing +{}, low variability +{}, paste activity +{})",
        report.score.total,
        report.score.fast_typing,
        report.score.low_variability,
        report.score.high_paste_activity
    );
    println!("  Verdict: {}", report.verdict);
    println!();

    // Show a snippet of the exportable report
    let json = serde_json::to_string_pretty(&report).unwrap();
    println!("  Report (truncated):");
    for line in json.lines().take(12) {
        println!("    {line}");
    }
    println!("    ...");
    println!();
}

fn main() {
    println!("Typewitness - Replay Demo");
    println!("=========================");
    println!();

    // Display data-handling declaration
    println!("{DATA_HANDLING_DECLARATION}");
    println!();

    let transparency_log = TransparencyLog::new();

    evaluate("human-draft", human_trace(), &transparency_log);
    evaluate("scripted-input", bot_trace(), &transparency_log);

    // Final statistics
    println!("{}", transparency_log.summary());
    println!();
    println!("Demo complete!");
}
