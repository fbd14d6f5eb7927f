//! Integration tests for the typewitness scoring pipeline.

use std::time::Duration;
use typewitness::collector::{parse_trace, CollectorConfig, ReplayCollector};
use typewitness::config::AnalyzerConfig;
use typewitness::core::{
    bot_likelihood_score, classify, compute_features, PasteActivity, ReportBuilder, TypingSession,
    Verdict,
};

fn session_from_timestamps(timestamps: &[u64]) -> TypingSession {
    let mut session = TypingSession::new();
    for &ts in timestamps {
        session.record_keystroke("a", false, ts);
    }
    session
}

#[test]
fn interval_count_is_keystrokes_minus_one() {
    let mut session = TypingSession::new();
    assert_eq!(session.intervals().len(), 0);

    for n in 1..=50u64 {
        session.record_keystroke("a", false, n * 37);
        assert_eq!(session.intervals().len() as u64, n - 1);
    }
}

#[test]
fn empty_session_features_are_zero_not_nan() {
    let session = TypingSession::new();
    let features = compute_features(&session, &AnalyzerConfig::default());

    assert_eq!(features.mean_interval_ms, 0.0);
    assert_eq!(features.interval_variability, 0.0);
    assert_eq!(features.paste_activity, PasteActivity::Normal);
}

#[test]
fn paste_activity_boundary_at_default_threshold() {
    let config = AnalyzerConfig::default();

    for count in 0..=3 {
        let mut session = TypingSession::new();
        for _ in 0..count {
            session.record_paste(50);
        }
        let features = compute_features(&session, &config);
        assert_eq!(
            features.paste_activity,
            PasteActivity::Normal,
            "{count} pastes should be Normal"
        );
    }

    for count in 4..=8 {
        let mut session = TypingSession::new();
        for _ in 0..count {
            session.record_paste(50);
        }
        let features = compute_features(&session, &config);
        assert_eq!(
            features.paste_activity,
            PasteActivity::High,
            "{count} pastes should be High"
        );
    }
}

#[test]
fn score_is_always_a_sum_of_the_fixed_weights() {
    let config = AnalyzerConfig::default();
    let reachable = [0u8, 30, 40, 60, 70, 100];

    // Sweep cadences from very fast to very slow, uniform and uneven,
    // with paste counts on both sides of the threshold.
    let cadences: [&[u64]; 6] = [
        &[],
        &[0, 20, 40, 60],
        &[0, 100, 200, 300, 400],
        &[0, 350, 700, 1050],
        &[0, 150, 850, 1000, 1600],
        &[0, 40, 900, 960, 2000],
    ];

    for cadence in cadences {
        for pastes in [0usize, 2, 4, 7] {
            let mut session = session_from_timestamps(cadence);
            for _ in 0..pastes {
                session.record_paste(10);
            }
            let score = bot_likelihood_score(&session, &config);
            assert!(
                reachable.contains(&score),
                "unreachable score {score} for cadence {cadence:?} with {pastes} pastes"
            );
        }
    }
}

#[test]
fn verdict_requires_strictly_more_than_flag_threshold() {
    let config = AnalyzerConfig::default();

    // Uniform 50 ms cadence, no pastes: 40 + 30 = 70, exactly on the boundary.
    let session = session_from_timestamps(&[0, 50, 100, 150, 200]);
    assert_eq!(bot_likelihood_score(&session, &config), 70);
    assert_eq!(classify(&session, &config), Verdict::HumanGenerated);

    // Adding heavy pasting pushes past the boundary.
    let mut session = session_from_timestamps(&[0, 50, 100, 150, 200]);
    for _ in 0..4 {
        session.record_paste(500);
    }
    assert_eq!(bot_likelihood_score(&session, &config), 100);
    assert_eq!(classify(&session, &config), Verdict::AiGenerated);
}

#[test]
fn uniform_hundred_ms_cadence_scores_seventy() {
    let config = AnalyzerConfig::default();
    let session = session_from_timestamps(&[0, 100, 200, 300, 400]);

    let features = compute_features(&session, &config);
    assert_eq!(features.mean_interval_ms, 100.0);
    assert_eq!(features.interval_variability, 0.0);
    assert_eq!(bot_likelihood_score(&session, &config), 70);
    assert_eq!(classify(&session, &config), Verdict::HumanGenerated);
}

#[test]
fn uniform_hundred_ms_cadence_with_pastes_is_flagged() {
    let config = AnalyzerConfig::default();
    let mut session = session_from_timestamps(&[0, 100, 200, 300, 400]);
    for _ in 0..5 {
        session.record_paste(120);
    }

    assert_eq!(bot_likelihood_score(&session, &config), 100);
    assert_eq!(classify(&session, &config), Verdict::AiGenerated);
}

#[test]
fn fifty_ms_cadence_with_light_pasting_stays_human() {
    let config = AnalyzerConfig::default();
    let mut session = session_from_timestamps(&[0, 50, 100, 150]);
    session.record_paste(80);
    session.record_paste(80);

    assert_eq!(bot_likelihood_score(&session, &config), 70);
    assert_eq!(classify(&session, &config), Verdict::HumanGenerated);
}

#[test]
fn fifty_ms_cadence_with_heavy_pasting_is_flagged() {
    let config = AnalyzerConfig::default();
    let mut session = session_from_timestamps(&[0, 50, 100, 150]);
    for _ in 0..5 {
        session.record_paste(80);
    }

    assert_eq!(bot_likelihood_score(&session, &config), 100);
    assert_eq!(classify(&session, &config), Verdict::AiGenerated);
}

#[test]
fn variability_exactly_on_cutoff_does_not_score() {
    // Intervals 100 and 300: mean 200, population std dev exactly 100.
    let config = AnalyzerConfig::default();
    let session = session_from_timestamps(&[0, 100, 400]);

    let features = compute_features(&session, &config);
    assert_eq!(features.interval_variability, 100.0);
    assert_eq!(bot_likelihood_score(&session, &config), 40);
}

#[test]
fn replayed_trace_matches_direct_recording() {
    let content = r#"
{"type":"keystroke","at_ms":0,"key":"h"}
{"type":"keystroke","at_ms":50,"key":"i"}
{"type":"keystroke","at_ms":100,"key":"Backspace"}
{"type":"keystroke","at_ms":150,"key":"z","ctrl_held":true}
{"type":"paste","at_ms":400,"length":600}
{"type":"paste","at_ms":500,"length":600}
{"type":"paste","at_ms":600,"length":600}
{"type":"paste","at_ms":700,"length":600}
"#;
    let parsed = parse_trace(content);
    assert_eq!(parsed.skipped_lines, 0);

    // Replay through the collector.
    let mut collector =
        ReplayCollector::from_events(parsed.events.clone(), CollectorConfig::default());
    collector.start().unwrap();

    let mut replayed = TypingSession::new();
    let receiver = collector.receiver().clone();
    while let Ok(event) = receiver.recv_timeout(Duration::from_millis(500)) {
        replayed.record_event(&event);
    }
    collector.stop();

    // Record the same events directly.
    let mut direct = TypingSession::new();
    for event in &parsed.events {
        direct.record_event(event);
    }

    assert_eq!(replayed.intervals(), direct.intervals());
    assert_eq!(replayed.key_events(), direct.key_events());
    assert_eq!(replayed.paste_events(), direct.paste_events());

    // 4 keystrokes at a flat 50 ms cadence and 4 pastes: 40 + 30 + 30.
    let config = AnalyzerConfig::default();
    assert_eq!(bot_likelihood_score(&replayed, &config), 100);
    assert_eq!(classify(&replayed, &config), Verdict::AiGenerated);
    assert_eq!(replayed.key_events().backspace, 1);
    assert_eq!(replayed.key_events().ctrl_z, 1);
}

#[test]
fn report_serializes_exact_verdict_strings() {
    let config = AnalyzerConfig::default();
    let builder = ReportBuilder::new();

    let human = session_from_timestamps(&[0, 400, 1300, 1500, 2600]);
    let json = builder.build_json(&human, &config);
    assert!(json.contains("\"Human-Generated\""));

    let mut bot = session_from_timestamps(&[0, 30, 60, 90]);
    for _ in 0..6 {
        bot.record_paste(900);
    }
    let json = builder.build_json(&bot, &config);
    assert!(json.contains("\"AI-Generated\""));
}

#[test]
fn custom_thresholds_shift_the_boundaries() {
    let config = AnalyzerConfig {
        paste_event_threshold: 1,
        typing_speed_threshold_ms: 50.0,
        flag_threshold: 30,
    };

    // Mean 100 is not below the tightened speed threshold; uniformity still
    // fires; two pastes exceed the lowered paste threshold.
    let mut session = session_from_timestamps(&[0, 100, 200, 300]);
    session.record_paste(10);
    session.record_paste(10);

    assert_eq!(bot_likelihood_score(&session, &config), 60);
    assert_eq!(classify(&session, &config), Verdict::AiGenerated);
}

#[test]
fn sessions_accumulate_and_never_reset() {
    let config = AnalyzerConfig::default();
    let mut session = session_from_timestamps(&[0, 500, 1000]);
    assert_eq!(session.intervals().len(), 2);

    // Later activity extends the same record; earlier intervals remain.
    session.record_keystroke("a", false, 1500);
    session.record_paste(25);
    assert_eq!(session.intervals(), &[500, 500, 500]);
    assert_eq!(session.paste_count(), 1);

    // Evaluation is pull-based and repeatable without mutating state.
    let first = bot_likelihood_score(&session, &config);
    let second = bot_likelihood_score(&session, &config);
    assert_eq!(first, second);
    assert_eq!(session.intervals().len(), 3);
}
