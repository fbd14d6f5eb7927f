//! Configuration for typewitness.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Thresholds for the scoring pipeline.
///
/// Passed explicitly into evaluation so hosts and tests can exercise
/// boundary values directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Paste actions strictly above this count classify paste activity as High
    pub paste_event_threshold: usize,

    /// Mean inter-keystroke interval (ms) below this reads as bot-like speed
    pub typing_speed_threshold_ms: f64,

    /// Scores strictly above this flag the text as AI-generated
    pub flag_threshold: u8,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            paste_event_threshold: 3,
            typing_speed_threshold_ms: 300.0,
            flag_threshold: 70,
        }
    }
}

/// Main configuration for the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Scoring thresholds
    pub analyzer: AnalyzerConfig,

    /// Which input event kinds to forward during replay
    pub sources: SourceConfig,

    /// Path for exporting verdict reports
    pub export_path: PathBuf,

    /// Path for storing collection stats
    pub data_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("typewitness");

        Self {
            analyzer: AnalyzerConfig::default(),
            sources: SourceConfig::default(),
            export_path: data_dir.join("reports"),
            data_path: data_dir,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::IoError(e.to_string()))?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(&config_path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("typewitness")
            .join("config.json")
    }

    /// Ensure all required directories exist.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.export_path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        std::fs::create_dir_all(&self.data_path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }
}

/// Configuration for which input event kinds to forward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub keystrokes: bool,
    pub pastes: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            keystrokes: true,
            pastes: true,
        }
    }
}

impl SourceConfig {
    /// Parse source configuration from a comma-separated string.
    pub fn from_csv(s: &str) -> Self {
        let sources: Vec<String> = s.split(',').map(|s| s.trim().to_lowercase()).collect();

        Self {
            keystrokes: sources.iter().any(|s| s == "keystrokes" || s == "all"),
            pastes: sources.iter().any(|s| s == "pastes" || s == "all"),
        }
    }

    /// Check if at least one source is enabled.
    pub fn any_enabled(&self) -> bool {
        self.keystrokes || self.pastes
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyzer_defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.paste_event_threshold, 3);
        assert_eq!(config.typing_speed_threshold_ms, 300.0);
        assert_eq!(config.flag_threshold, 70);
    }

    #[test]
    fn test_source_config_parsing() {
        let config = SourceConfig::from_csv("keystrokes,pastes");
        assert!(config.keystrokes);
        assert!(config.pastes);

        let config = SourceConfig::from_csv("keystrokes");
        assert!(config.keystrokes);
        assert!(!config.pastes);

        let config = SourceConfig::from_csv("all");
        assert!(config.keystrokes);
        assert!(config.pastes);

        let config = SourceConfig::from_csv("none");
        assert!(!config.any_enabled());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.sources.keystrokes);
        assert!(config.sources.pastes);
        assert_eq!(config.analyzer, AnalyzerConfig::default());
    }

    #[test]
    fn test_analyzer_config_round_trips_through_json() {
        let config = AnalyzerConfig {
            paste_event_threshold: 1,
            typing_speed_threshold_ms: 150.0,
            flag_threshold: 50,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: AnalyzerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
