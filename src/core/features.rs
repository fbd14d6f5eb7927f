//! Feature extraction from typing-session state.
//!
//! All features are derived from timing, counts, and lengths only - never
//! from composed text. Extraction is pull-based: nothing here mutates the
//! session, and every operation returns a neutral value on an empty session
//! instead of failing.

use crate::config::AnalyzerConfig;
use crate::core::session::TypingSession;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Paste-frequency classification relative to the configured threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PasteActivity {
    #[default]
    Normal,
    High,
}

impl std::fmt::Display for PasteActivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PasteActivity::Normal => write!(f, "Normal"),
            PasteActivity::High => write!(f, "High"),
        }
    }
}

/// Features extracted from one typing session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionFeatures {
    /// Arithmetic mean of inter-keystroke intervals in milliseconds
    pub mean_interval_ms: f64,
    /// Population standard deviation of the intervals in milliseconds
    pub interval_variability: f64,
    /// Paste-frequency classification
    pub paste_activity: PasteActivity,
}

/// Compute all features from a session.
pub fn compute_features(session: &TypingSession, config: &AnalyzerConfig) -> SessionFeatures {
    SessionFeatures {
        mean_interval_ms: mean_interval_ms(session),
        interval_variability: interval_variability(session),
        paste_activity: paste_activity(session, config),
    }
}

/// Arithmetic mean of the session's inter-keystroke intervals.
///
/// Returns 0.0 for a session with no intervals - "no data", not an error.
pub fn mean_interval_ms(session: &TypingSession) -> f64 {
    let intervals = session.intervals();
    if intervals.is_empty() {
        return 0.0;
    }
    intervals.iter().map(|&v| v as f64).mean()
}

/// Population standard deviation (n divisor) of the intervals around their
/// mean. Returns 0.0 for a session with no intervals.
pub fn interval_variability(session: &TypingSession) -> f64 {
    let intervals = session.intervals();
    if intervals.is_empty() {
        return 0.0;
    }
    intervals.iter().map(|&v| v as f64).population_std_dev()
}

/// Classify paste frequency: `High` when the number of paste actions
/// strictly exceeds the configured threshold.
pub fn paste_activity(session: &TypingSession, config: &AnalyzerConfig) -> PasteActivity {
    if session.paste_count() > config.paste_event_threshold {
        PasteActivity::High
    } else {
        PasteActivity::Normal
    }
}
