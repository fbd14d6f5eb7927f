//! Input event types for the typewitness collector.
//!
//! Events carry timing, a key identifier, and paste lengths - never the
//! composed text or clipboard contents.

use serde::{Deserialize, Serialize};

/// A single keystroke observed during composition.
///
/// `at_ms` is milliseconds since the start of the trace; the host event
/// source is responsible for extracting it from a monotonic clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeystrokeEvent {
    /// Milliseconds since trace start
    pub at_ms: u64,
    /// Key identifier as reported by the host ("a", "Backspace", "Enter", ...)
    pub key: String,
    /// Whether a control modifier was held
    #[serde(default)]
    pub ctrl_held: bool,
}

impl KeystrokeEvent {
    pub fn new(key: impl Into<String>, ctrl_held: bool, at_ms: u64) -> Self {
        Self {
            at_ms,
            key: key.into(),
            ctrl_held,
        }
    }
}

/// A clipboard-paste action, reduced to the length of the pasted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasteEvent {
    /// Milliseconds since trace start
    pub at_ms: u64,
    /// Character length of the pasted text
    pub length: usize,
}

impl PasteEvent {
    pub fn new(length: usize, at_ms: u64) -> Self {
        Self { at_ms, length }
    }
}

/// Unified event type for the collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    Keystroke(KeystrokeEvent),
    Paste(PasteEvent),
}

impl InputEvent {
    pub fn at_ms(&self) -> u64 {
        match self {
            InputEvent::Keystroke(e) => e.at_ms,
            InputEvent::Paste(e) => e.at_ms,
        }
    }

    pub fn is_keystroke(&self) -> bool {
        matches!(self, InputEvent::Keystroke(_))
    }
}
