//! Bot-likelihood scoring and the final verdict.
//!
//! Three independent fixed-weight rules over the extracted features sum to a
//! score in [0, 100]; the verdict is a strict threshold on that score. The
//! rules are additive and the only reachable totals are 0, 30, 40, 60, 70,
//! and 100.

use crate::config::AnalyzerConfig;
use crate::core::features::{compute_features, PasteActivity, SessionFeatures};
use crate::core::session::TypingSession;
use serde::{Deserialize, Serialize};

/// Points added when the mean interval falls below the speed threshold.
const FAST_TYPING_POINTS: u8 = 40;

/// Points added when interval variability falls below the uniformity cutoff.
const LOW_VARIABILITY_POINTS: u8 = 30;

/// Points added when paste activity is classified High.
const HIGH_PASTE_POINTS: u8 = 30;

/// Interval std dev (ms) below which typing cadence reads as machine-uniform.
const VARIABILITY_CUTOFF_MS: f64 = 100.0;

/// Per-rule point contributions and their sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// 0 or 40
    pub fast_typing: u8,
    /// 0 or 30
    pub low_variability: u8,
    /// 0 or 30
    pub high_paste_activity: u8,
    /// Sum of the three contributions
    pub total: u8,
}

impl ScoreBreakdown {
    /// Threshold the total into the final verdict.
    pub fn verdict(&self, config: &AnalyzerConfig) -> Verdict {
        if self.total > config.flag_threshold {
            Verdict::AiGenerated
        } else {
            Verdict::HumanGenerated
        }
    }
}

/// Score already-extracted features.
///
/// The speed rule fires when the mean interval is *below* the threshold:
/// automated input streams keys with short, even gaps, while people pause.
pub fn score_features(features: &SessionFeatures, config: &AnalyzerConfig) -> ScoreBreakdown {
    let fast_typing = if features.mean_interval_ms < config.typing_speed_threshold_ms {
        FAST_TYPING_POINTS
    } else {
        0
    };

    let low_variability = if features.interval_variability < VARIABILITY_CUTOFF_MS {
        LOW_VARIABILITY_POINTS
    } else {
        0
    };

    let high_paste_activity = if features.paste_activity == PasteActivity::High {
        HIGH_PASTE_POINTS
    } else {
        0
    };

    ScoreBreakdown {
        fast_typing,
        low_variability,
        high_paste_activity,
        total: fast_typing + low_variability + high_paste_activity,
    }
}

/// Bot-likelihood score for a session, in [0, 100].
pub fn bot_likelihood_score(session: &TypingSession, config: &AnalyzerConfig) -> u8 {
    score_features(&compute_features(session, config), config).total
}

/// Final binary classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "AI-Generated")]
    AiGenerated,
    #[serde(rename = "Human-Generated")]
    HumanGenerated,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::AiGenerated => "AI-Generated",
            Verdict::HumanGenerated => "Human-Generated",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a session: AI-Generated iff the score strictly exceeds the flag
/// threshold.
pub fn classify(session: &TypingSession, config: &AnalyzerConfig) -> Verdict {
    if bot_likelihood_score(session, config) > config.flag_threshold {
        Verdict::AiGenerated
    } else {
        Verdict::HumanGenerated
    }
}
