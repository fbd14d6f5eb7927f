//! Accumulating typing-session state.
//!
//! A `TypingSession` records inter-keystroke intervals, edit-key counts, and
//! paste lengths for one composition episode. It is append-only: nothing is
//! ever removed, and there is no reset. Hosts create a fresh session per
//! composition context instead.

use crate::collector::types::InputEvent;
use serde::{Deserialize, Serialize};

/// Counts of edit and modifier keys observed during a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEventCounts {
    pub backspace: u64,
    pub enter: u64,
    pub delete: u64,
    pub shift: u64,
    pub ctrl_z: u64,
}

impl KeyEventCounts {
    /// Total edit-key presses across all tracked categories.
    pub fn total(&self) -> u64 {
        self.backspace + self.enter + self.delete + self.shift + self.ctrl_z
    }
}

/// Accumulating record of one user's typing and paste behavior.
///
/// Recording operations are total: they accept whatever the event source
/// hands them and never fail. Validation of host input belongs at the
/// collector boundary, not here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypingSession {
    /// Elapsed milliseconds between consecutive keystrokes, in order.
    /// The first keystroke has no predecessor and records no interval.
    intervals: Vec<u64>,
    key_events: KeyEventCounts,
    /// Character length of each paste action, in order.
    paste_events: Vec<usize>,
    last_key_press_ms: Option<u64>,
    keystrokes: u64,
}

impl TypingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one keystroke.
    ///
    /// Appends `now_ms - last` to the interval sequence when a previous
    /// keystroke exists (saturating: an out-of-order timestamp records a
    /// zero interval rather than failing), then updates the last-press
    /// timestamp. Backspace, Enter, Delete, Shift, and Ctrl+Z increment
    /// their category counts; any other key affects timing only.
    pub fn record_keystroke(&mut self, key: &str, ctrl_held: bool, now_ms: u64) {
        if let Some(last) = self.last_key_press_ms {
            self.intervals.push(now_ms.saturating_sub(last));
        }
        self.last_key_press_ms = Some(now_ms);
        self.keystrokes += 1;

        match key {
            "Backspace" => self.key_events.backspace += 1,
            "Enter" => self.key_events.enter += 1,
            "Delete" => self.key_events.delete += 1,
            "Shift" => self.key_events.shift += 1,
            "z" if ctrl_held => self.key_events.ctrl_z += 1,
            _ => {}
        }
    }

    /// Record one paste action by the character length of the pasted text.
    pub fn record_paste(&mut self, length: usize) {
        self.paste_events.push(length);
    }

    /// Feed a collector event into the session.
    pub fn record_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::Keystroke(e) => self.record_keystroke(&e.key, e.ctrl_held, e.at_ms),
            InputEvent::Paste(e) => self.record_paste(e.length),
        }
    }

    /// Inter-keystroke intervals in chronological order.
    pub fn intervals(&self) -> &[u64] {
        &self.intervals
    }

    /// Edit-key counts.
    pub fn key_events(&self) -> KeyEventCounts {
        self.key_events
    }

    /// Paste lengths in chronological order.
    pub fn paste_events(&self) -> &[usize] {
        &self.paste_events
    }

    /// Number of paste actions recorded.
    pub fn paste_count(&self) -> usize {
        self.paste_events.len()
    }

    /// Number of keystrokes recorded.
    pub fn keystroke_count(&self) -> u64 {
        self.keystrokes
    }

    /// Check if the session has any events.
    pub fn is_empty(&self) -> bool {
        self.keystrokes == 0 && self.paste_events.is_empty()
    }
}
