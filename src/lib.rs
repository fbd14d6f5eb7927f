//! Typewitness - client-side typing provenance heuristic.
//!
//! This library estimates, from keystroke timing and clipboard-paste
//! behavior during text composition, whether the text was likely typed by a
//! human or produced by automated assistance. It is a heuristic signal, not
//! a statistical claim: three fixed-weight rules over timing features, with
//! no model and no defense against deliberate evasion.
//!
//! # Data Handling
//!
//! - **No text content**: pasted text is reduced to its length before it
//!   reaches the session; composed text is never seen at all
//! - **Coarse key data**: key identifiers are folded into edit-key counts
//!   during recording; sessions and reports never carry them
//! - **No hidden state**: each composition context owns its session object;
//!   nothing is shared or persisted implicitly
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Typewitness                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐        │
//! │  │  Collector  │──▶│   Session   │──▶│  Features   │        │
//! │  │  (replay)   │   │ (accumulate)│   │ (on demand) │        │
//! │  └─────────────┘   └─────────────┘   └─────────────┘        │
//! │         │                                    │              │
//! │         ▼                                    ▼              │
//! │  ┌─────────────┐                     ┌─────────────┐        │
//! │  │Transparency │                     │   Score /   │        │
//! │  │    Log      │                     │   Verdict   │        │
//! │  └─────────────┘                     └─────────────┘        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use typewitness::config::AnalyzerConfig;
//! use typewitness::core::{classify, TypingSession, Verdict};
//!
//! let config = AnalyzerConfig::default();
//! let mut session = TypingSession::new();
//!
//! // The host adapts its input events into recording calls.
//! session.record_keystroke("a", false, 0);
//! session.record_keystroke("b", false, 450);
//! session.record_paste(120);
//!
//! // Evaluation is pull-based and can run at any point.
//! let verdict = classify(&session, &config);
//! assert_eq!(verdict, Verdict::HumanGenerated);
//! ```

pub mod collector;
pub mod config;
pub mod core;
pub mod transparency;

// Re-export key types at crate root for convenience
pub use collector::{CollectorConfig, CollectorError, InputEvent, ReplayCollector};
pub use config::{AnalyzerConfig, Config, SourceConfig};
pub use core::{
    bot_likelihood_score, classify, compute_features, ReportBuilder, ScoreBreakdown,
    SessionFeatures, TypingSession, Verdict, VerdictReport,
};
pub use transparency::{SharedTransparencyLog, TransparencyLog, TransparencyStats};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Data-handling declaration that can be displayed to users.
pub const DATA_HANDLING_DECLARATION: &str = r#"
╔══════════════════════════════════════════════════════════════════╗
║              TYPEWITNESS - DATA HANDLING DECLARATION             ║
╠══════════════════════════════════════════════════════════════════╣
║                                                                  ║
║  This tool estimates typing provenance from behavioral timing.   ║
║                                                                  ║
║  ✓ WHAT WE PROCESS:                                              ║
║    • Delays between keystrokes (timing only)                     ║
║    • Counts of edit keys (Backspace, Enter, Delete, Shift, ^Z)   ║
║    • How many characters each paste delivered (length only)      ║
║                                                                  ║
║  ✗ WHAT WE NEVER RETAIN:                                         ║
║    • The text being composed                                     ║
║    • Clipboard contents                                          ║
║    • Which letter or symbol keys were pressed                    ║
║                                                                  ║
║  All evaluation is local. The verdict is a heuristic estimate,   ║
║  not proof of authorship either way.                             ║
║                                                                  ║
║  You can view processing statistics anytime with:                ║
║    typewitness status                                            ║
║                                                                  ║
╚══════════════════════════════════════════════════════════════════╝
"#;
