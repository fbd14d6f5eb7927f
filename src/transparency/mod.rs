//! Transparency module for typewitness.
//!
//! Tracks and exposes what the analyzer processes, so users can always see
//! how much was collected and confirm what was not.

pub mod log;

// Re-export commonly used types
pub use log::{
    create_shared_log, create_shared_log_with_persistence, SharedTransparencyLog, TransparencyLog,
    TransparencyStats,
};
