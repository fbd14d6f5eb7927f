//! Verdict report building.
//!
//! A `VerdictReport` is the exportable record of one evaluation: session
//! summary, extracted features, per-rule score breakdown, and the verdict,
//! together with the thresholds that produced it. Reports carry timing,
//! counts, and lengths only - never composed text or clipboard contents.

use crate::config::AnalyzerConfig;
use crate::core::features::{compute_features, SessionFeatures};
use crate::core::score::{score_features, ScoreBreakdown, Verdict};
use crate::core::session::{KeyEventCounts, TypingSession};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// The current report format version.
pub const REPORT_VERSION: &str = "1.0";

/// The name of this producer.
pub const PRODUCER_NAME: &str = "typewitness";

/// Producer metadata embedded in every report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProducer {
    /// Name of the producing software
    pub name: String,
    /// Version of the producing software
    pub version: String,
    /// Unique instance identifier (UUID)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
}

/// Raw-count summary of the evaluated session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Keystrokes observed
    pub keystrokes: u64,
    /// Inter-keystroke intervals recorded (keystrokes minus one, or zero)
    pub intervals_recorded: usize,
    /// Paste actions observed
    pub paste_events: usize,
    /// Total characters delivered via paste
    pub pasted_chars: usize,
    /// Edit-key counts
    pub key_events: KeyEventCounts,
}

/// Exportable record of one evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerdictReport {
    /// Report schema version
    pub report_version: String,
    /// When the evaluation ran (RFC3339)
    pub computed_at_utc: String,
    /// Producer metadata
    pub producer: ReportProducer,
    /// Host-derived device identifier
    pub device_id: String,
    /// Timezone tag for the timestamps
    pub timezone: String,
    /// Session counts
    pub session: SessionSummary,
    /// Extracted features
    pub features: SessionFeatures,
    /// Per-rule score contributions
    pub score: ScoreBreakdown,
    /// Final classification
    pub verdict: Verdict,
    /// Thresholds the evaluation ran with
    pub thresholds: AnalyzerConfig,
    /// Additional metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<HashMap<String, serde_json::Value>>,
}

/// Builder for verdict reports.
pub struct ReportBuilder {
    instance_id: Uuid,
    device_id: String,
    session_id: Option<String>,
}

impl ReportBuilder {
    /// Create a new report builder with a unique instance ID.
    pub fn new() -> Self {
        // Device ID from hostname, same scheme as the session payloads
        // upstream consumers already understand.
        let host = hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        let instance_id = Uuid::new_v4();
        let device_id = format!("witness-{}-{}", host, &instance_id.to_string()[..8]);

        Self {
            instance_id,
            device_id,
            session_id: None,
        }
    }

    /// Set the session ID for generated reports.
    pub fn with_session_id(mut self, session_id: String) -> Self {
        self.session_id = Some(session_id);
        self
    }

    /// Get the instance ID.
    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    /// Get the device ID.
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Evaluate a session and build the report.
    pub fn build(&self, session: &TypingSession, config: &AnalyzerConfig) -> VerdictReport {
        let features = compute_features(session, config);
        let score = score_features(&features, config);
        let verdict = score.verdict(config);

        let mut meta = HashMap::new();
        if let Some(ref session_id) = self.session_id {
            meta.insert(
                "session_id".to_string(),
                serde_json::Value::String(session_id.clone()),
            );
        }
        meta.insert(
            "edit_key_total".to_string(),
            serde_json::Value::Number(serde_json::Number::from(session.key_events().total())),
        );

        VerdictReport {
            report_version: REPORT_VERSION.to_string(),
            computed_at_utc: Utc::now().to_rfc3339(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                instance_id: Some(self.instance_id.to_string()),
            },
            device_id: self.device_id.clone(),
            timezone: chrono_tz::Tz::UTC.to_string(),
            session: SessionSummary {
                keystrokes: session.keystroke_count(),
                intervals_recorded: session.intervals().len(),
                paste_events: session.paste_count(),
                pasted_chars: session.paste_events().iter().sum(),
                key_events: session.key_events(),
            },
            features,
            score,
            verdict,
            thresholds: *config,
            meta: Some(meta),
        }
    }

    /// Build and serialize a report to JSON.
    pub fn build_json(&self, session: &TypingSession, config: &AnalyzerConfig) -> String {
        let report = self.build(session, config);
        serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> TypingSession {
        let mut session = TypingSession::new();
        for ts in [0u64, 50, 100, 150, 200] {
            session.record_keystroke("a", false, ts);
        }
        session.record_keystroke("Backspace", false, 260);
        for _ in 0..5 {
            session.record_paste(300);
        }
        session
    }

    #[test]
    fn test_builder_instance_ids_are_unique() {
        let builder1 = ReportBuilder::new();
        let builder2 = ReportBuilder::new();
        assert_ne!(builder1.instance_id(), builder2.instance_id());
    }

    #[test]
    fn test_report_contents() {
        let builder = ReportBuilder::new();
        let config = AnalyzerConfig::default();
        let report = builder.build(&sample_session(), &config);

        assert_eq!(report.report_version, REPORT_VERSION);
        assert_eq!(report.producer.name, PRODUCER_NAME);
        assert_eq!(report.session.keystrokes, 6);
        assert_eq!(report.session.intervals_recorded, 5);
        assert_eq!(report.session.paste_events, 5);
        assert_eq!(report.session.pasted_chars, 1500);
        assert_eq!(report.session.key_events.backspace, 1);
        assert_eq!(report.score.total, 100);
        assert_eq!(report.verdict, Verdict::AiGenerated);
        assert_eq!(report.thresholds, config);
    }

    #[test]
    fn test_report_carries_session_id_in_meta() {
        let builder = ReportBuilder::new().with_session_id("SESS-42".to_string());
        let report = builder.build(&TypingSession::new(), &AnalyzerConfig::default());

        let meta = report.meta.as_ref().unwrap();
        assert_eq!(meta["session_id"], "SESS-42");
    }

    #[test]
    fn test_report_json_fields() {
        let builder = ReportBuilder::new();
        let json = builder.build_json(&sample_session(), &AnalyzerConfig::default());

        assert!(json.contains("report_version"));
        assert!(json.contains("computed_at_utc"));
        assert!(json.contains("producer"));
        assert!(json.contains("device_id"));
        assert!(json.contains("mean_interval_ms"));
        assert!(json.contains("fast_typing"));
        assert!(json.contains("\"AI-Generated\""));
    }

    #[test]
    fn test_report_round_trips_through_json() {
        let builder = ReportBuilder::new();
        let config = AnalyzerConfig::default();
        let report = builder.build(&sample_session(), &config);

        let json = serde_json::to_string(&report).unwrap();
        let back: VerdictReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.verdict, report.verdict);
        assert_eq!(back.score, report.score);
        assert_eq!(back.session.keystrokes, report.session.keystrokes);
    }
}
