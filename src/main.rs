//! Typewitness CLI
//!
//! Client-side typing provenance heuristic.

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use typewitness::{
    collector::{CollectorConfig, ReplayCollector},
    config::{Config, SourceConfig},
    core::{ReportBuilder, TypingSession, VerdictReport},
    transparency::create_shared_log_with_persistence,
    DATA_HANDLING_DECLARATION, VERSION,
};

#[derive(Parser)]
#[command(name = "typewitness")]
#[command(version = VERSION)]
#[command(about = "Client-side typing provenance heuristic", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded input trace and evaluate it
    Analyze {
        /// Path to the trace file (JSON Lines, one input event per line)
        input: PathBuf,

        /// Input sources to forward (keystrokes, pastes, or all)
        #[arg(long, default_value = "all")]
        sources: String,

        /// Replay with the trace's original inter-event timing
        #[arg(long)]
        paced: bool,

        /// Write the verdict report here instead of the export directory
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Session label embedded in the report
        #[arg(long)]
        session_id: Option<String>,
    },

    /// Show configuration and cumulative collection stats
    Status,

    /// Display data-handling declaration
    Privacy,

    /// Merge exported verdict reports
    Export {
        /// Output directory for the merged export
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Export format (json or jsonl)
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Show configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            sources,
            paced,
            output,
            session_id,
        } => {
            cmd_analyze(&input, &sources, paced, output, session_id);
        }
        Commands::Status => {
            cmd_status();
        }
        Commands::Privacy => {
            cmd_privacy();
        }
        Commands::Export { output, format } => {
            cmd_export(output, &format);
        }
        Commands::Config => {
            cmd_config();
        }
    }
}

fn cmd_analyze(
    input: &PathBuf,
    sources: &str,
    paced: bool,
    output: Option<PathBuf>,
    session_id: Option<String>,
) {
    println!("Typewitness v{VERSION}");
    println!();

    // Parse source configuration
    let source_config = SourceConfig::from_csv(sources);
    if !source_config.any_enabled() {
        eprintln!("Error: At least one source must be enabled (keystrokes or pastes)");
        std::process::exit(1);
    }

    // Load or create configuration
    let config = Config::load().unwrap_or_default();
    if let Err(e) = config.ensure_directories() {
        eprintln!("Warning: Could not create directories: {e}");
    }

    // Set up collection-stats log
    let transparency_log =
        create_shared_log_with_persistence(config.data_path.join("transparency.json"));

    // Load the trace
    let collector_config = CollectorConfig {
        forward_keystrokes: source_config.keystrokes,
        forward_pastes: source_config.pastes,
        paced,
    };
    let mut collector = match ReplayCollector::from_path(input, collector_config) {
        Ok(collector) => collector,
        Err(e) => {
            eprintln!("Error loading trace {input:?}: {e}");
            std::process::exit(1);
        }
    };

    let session_id =
        session_id.unwrap_or_else(|| format!("SESS-{}", Utc::now().timestamp_millis()));
    let builder = ReportBuilder::new().with_session_id(session_id.clone());

    println!("Analyzing trace {input:?}");
    println!("  Events: {}", collector.event_count());
    println!(
        "  Keystrokes: {}",
        if source_config.keystrokes {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!(
        "  Pastes: {}",
        if source_config.pastes {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!("  Paced replay: {}", if paced { "yes" } else { "no" });
    println!("  Session: {session_id}");
    println!("  Instance ID: {}", builder.instance_id());
    if paced {
        println!();
        println!("Press Ctrl+C to stop early and evaluate what was collected");
    }
    println!();

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc_handler(r);

    if let Err(e) = collector.start() {
        eprintln!("Error starting replay: {e}");
        std::process::exit(1);
    }

    // Main event loop: the channel disconnects when the trace is exhausted.
    let mut session = TypingSession::new();
    let receiver = collector.receiver().clone();
    let mut event_count = 0u64;

    while running.load(Ordering::SeqCst) {
        match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => {
                match &event {
                    typewitness::InputEvent::Keystroke(_) => {
                        transparency_log.record_keystroke_event()
                    }
                    typewitness::InputEvent::Paste(_) => transparency_log.record_paste_event(),
                }

                session.record_event(&event);
                event_count += 1;

                if paced && event_count % 200 == 0 {
                    println!("  Processed {event_count} events...");
                }
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    collector.stop();

    // Evaluate whatever was collected
    let report = builder.build(&session, &config.analyzer);
    transparency_log.record_session_analyzed();

    print_report(&report);

    // Export the report
    let export_path = output.unwrap_or_else(|| {
        config
            .export_path
            .join(format!("report_{}.json", Utc::now().format("%Y%m%d_%H%M%S")))
    });

    if let Some(parent) = export_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&export_path, json) {
                eprintln!("Error writing report: {e}");
            } else {
                println!("Exported report to {export_path:?}");
                transparency_log.record_report_exported();
            }
        }
        Err(e) => {
            eprintln!("Error serializing report: {e}");
        }
    }

    // Save collection stats
    if let Err(e) = transparency_log.save() {
        eprintln!("Warning: Could not save collection stats: {e}");
    }

    println!();
    println!("{}", transparency_log.summary());
}

fn print_report(report: &VerdictReport) {
    println!("=== Evaluation ===");
    println!(
        "  Keystrokes: {} ({} intervals)",
        report.session.keystrokes, report.session.intervals_recorded
    );
    println!(
        "  Paste events: {} ({} chars)",
        report.session.paste_events, report.session.pasted_chars
    );
    let keys = &report.session.key_events;
    println!(
        "  Edit keys: backspace {}, enter {}, delete {}, shift {}, ctrl+z {}",
        keys.backspace, keys.enter, keys.delete, keys.shift, keys.ctrl_z
    );
    println!();
    println!("  Features:");
    println!(
        "    Mean interval: {:.1} ms",
        report.features.mean_interval_ms
    );
    println!(
        "    Interval variability: {:.1} ms",
        report.features.interval_variability
    );
    println!("    Paste activity: {}", report.features.paste_activity);
    println!();
    println!("  Score:");
    println!("    Fast typing: +{}", report.score.fast_typing);
    println!("    Low variability: +{}", report.score.low_variability);
    println!(
        "    High paste activity: +{}",
        report.score.high_paste_activity
    );
    println!("    Total: {} / 100", report.score.total);
    println!();
    println!("  Verdict: {}", report.verdict);
    println!();
}

fn cmd_status() {
    let config = Config::load().unwrap_or_default();

    println!("Typewitness Status");
    println!("==================");
    println!();

    println!("Configuration:");
    println!(
        "  Paste event threshold: {}",
        config.analyzer.paste_event_threshold
    );
    println!(
        "  Typing speed threshold: {} ms",
        config.analyzer.typing_speed_threshold_ms
    );
    println!("  Flag threshold: {}", config.analyzer.flag_threshold);
    println!(
        "  Keystroke replay: {}",
        if config.sources.keystrokes {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!(
        "  Paste replay: {}",
        if config.sources.pastes {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!("  Export path: {:?}", config.export_path);
    println!();

    // Load and show collection stats if available
    let stats_path = config.data_path.join("transparency.json");
    if stats_path.exists() {
        if let Ok(content) = std::fs::read_to_string(&stats_path) {
            if let Ok(stats) = serde_json::from_str::<serde_json::Value>(&content) {
                println!("Cumulative Statistics:");
                if let Some(kb) = stats.get("keystroke_events") {
                    println!("  Keystroke events: {kb}");
                }
                if let Some(pastes) = stats.get("paste_events") {
                    println!("  Paste events: {pastes}");
                }
                if let Some(sessions) = stats.get("sessions_analyzed") {
                    println!("  Sessions analyzed: {sessions}");
                }
                if let Some(reports) = stats.get("reports_exported") {
                    println!("  Reports exported: {reports}");
                }
            }
        }
    } else {
        println!("No previous analysis data found.");
    }
}

fn cmd_privacy() {
    println!("{DATA_HANDLING_DECLARATION}");
}

fn cmd_export(output: Option<PathBuf>, format: &str) {
    let config = Config::load().unwrap_or_default();
    let export_dir = output.unwrap_or(config.export_path.clone());

    // Find all report files
    let report_files: Vec<PathBuf> = std::fs::read_dir(&export_dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.extension().map(|e| e == "json").unwrap_or(false))
                .collect()
        })
        .unwrap_or_default();

    if report_files.is_empty() {
        println!("No verdict reports found in {export_dir:?}");
        println!("Run 'typewitness analyze <trace>' to evaluate a trace.");
        return;
    }

    println!(
        "Found {} report file(s) in {:?}",
        report_files.len(),
        export_dir
    );

    // Combine all reports
    let mut all_reports: Vec<VerdictReport> = Vec::new();
    for file in &report_files {
        if let Ok(content) = std::fs::read_to_string(file) {
            if let Ok(report) = serde_json::from_str::<VerdictReport>(&content) {
                all_reports.push(report);
            }
        }
    }

    println!("Total reports: {}", all_reports.len());

    // Export based on format
    let output_path = export_dir.join(format!(
        "export_{}.{}",
        Utc::now().format("%Y%m%d_%H%M%S"),
        if format == "jsonl" { "jsonl" } else { "json" }
    ));

    let result = if format == "jsonl" {
        // JSON Lines format
        let lines: Vec<String> = all_reports
            .iter()
            .filter_map(|r| serde_json::to_string(r).ok())
            .collect();
        std::fs::write(&output_path, lines.join("\n"))
    } else {
        // Pretty JSON format
        match serde_json::to_string_pretty(&all_reports) {
            Ok(json) => std::fs::write(&output_path, json),
            Err(e) => {
                eprintln!("Error serializing: {e}");
                return;
            }
        }
    };

    match result {
        Ok(_) => println!("Exported to {output_path:?}"),
        Err(e) => eprintln!("Error writing export: {e}"),
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
