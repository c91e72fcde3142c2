//! Playback configuration.
//!
//! ```rust
//! use livetiming::config::PlaybackConfig;
//! use livetiming::types::UpdateRate;
//!
//! let config = PlaybackConfig::from_yaml_str("speed: 4.0\nupdate_rate: !Max 10\n")?;
//! assert_eq!(config.speed, 4.0);
//! assert!(config.honour_delays);
//! assert_eq!(config.update_rate, UpdateRate::Max(10));
//! # Ok::<(), livetiming::TimingError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::types::UpdateRate;
use crate::{Result, TimingError};

/// How a recording is played back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Playback speed multiplier. Recorded delays are divided by this value.
    pub speed: f64,
    /// Sleep for recorded delays. When off, messages are replayed back to back.
    pub honour_delays: bool,
    /// Advance the session clock once per second.
    pub tick_clock: bool,
    /// Rate of snapshots handed to subscribers.
    pub update_rate: UpdateRate,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self { speed: 1.0, honour_delays: true, tick_clock: true, update_rate: UpdateRate::Native }
    }
}

impl PlaybackConfig {
    /// Parses and validates a YAML document. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)
            .map_err(|e| TimingError::config(format!("invalid playback configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a YAML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| TimingError::file_error(path.to_path_buf(), e))?;
        debug!("Loaded playback configuration from {}", path.display());
        Self::from_yaml_str(&yaml)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(TimingError::config(format!(
                "speed must be a positive number, was {}",
                self.speed
            )));
        }
        Ok(())
    }

    /// Builder-style speed override.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Replays without pauses or clock ticks.
    pub fn immediate() -> Self {
        Self { honour_delays: false, tick_clock: false, ..Self::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_documents_use_defaults() {
        assert_eq!(PlaybackConfig::from_yaml_str("{}").expect("valid"), PlaybackConfig::default());
    }

    #[test]
    fn invalid_speeds_are_rejected() {
        for yaml in ["speed: 0", "speed: -2.0", "speed: .nan"] {
            let error = PlaybackConfig::from_yaml_str(yaml).expect_err(yaml);
            assert!(matches!(error, TimingError::Config { .. }), "{yaml}");
        }
        assert!(PlaybackConfig::default().with_speed(f64::INFINITY).validate().is_err());
    }

    #[test]
    fn malformed_documents_are_config_errors() {
        let error = PlaybackConfig::from_yaml_str("speed: [fast]").expect_err("not a number");
        assert!(error.to_string().contains("playback configuration"));
    }

    #[test]
    fn files_are_loaded() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "honour_delays: false\ntick_clock: false")?;
        let config = PlaybackConfig::load(file.path())?;
        anyhow::ensure!(config == PlaybackConfig::immediate(), "loaded {config:?}");
        Ok(())
    }

    #[test]
    fn missing_files_carry_their_path() {
        let error = PlaybackConfig::load("/no/such/playback.yaml").expect_err("missing");
        assert!(matches!(error, TimingError::File { .. }));
    }
}
