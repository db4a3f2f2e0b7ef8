//! ═══════════════════════════════════════════════════════════════════════════════
//! CONFIG — Simulation Settings and Thresholds
//! ═══════════════════════════════════════════════════════════════════════════════

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classifier::{ClassifierKind, MagnitudeConfig, SpectralConfig};
use crate::error::{ConfigError, SwarmResult};
use crate::flock::FlockConfig;
use crate::profile::ProfileTable;

/// Main simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwarmConfig {
    /// Flock geometry and population
    pub flock: FlockConfig,

    /// Simulation ticks per second
    pub frame_rate: f64,

    /// Nominal signal sample rate in Hz; also the buffer capacity, so a
    /// full window spans one second
    pub sample_rate: usize,

    /// Semantic stream type tag to discover
    pub stream_type: String,

    /// Channel extracted from each multi-channel frame
    pub stream_channel: usize,

    /// Seconds to wait for stream discovery before degrading
    pub resolve_timeout_secs: f64,

    /// Classification strategy
    pub classifier: ClassifierKind,

    /// Spectral strategy thresholds
    pub spectral: SpectralConfig,

    /// Magnitude strategy thresholds
    pub magnitude: MagnitudeConfig,

    /// State → steering profile table
    pub profiles: ProfileTable,

    /// RNG seed for agent placement (None for entropy)
    pub seed: Option<u64>,

    /// Print the per-tick dashboard
    pub verbose: bool,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            flock: FlockConfig::default(),
            frame_rate: 60.0,
            sample_rate: 256,
            stream_type: "EEG".to_string(),
            stream_channel: 0,
            resolve_timeout_secs: 2.0,
            classifier: ClassifierKind::Spectral,
            spectral: SpectralConfig::default(),
            magnitude: MagnitudeConfig::default(),
            profiles: ProfileTable::default(),
            seed: None,
            verbose: false,
        }
    }
}

impl SwarmConfig {
    /// Load from a JSON file, falling back to defaults when `path` is None
    pub fn load(path: Option<&Path>) -> SwarmResult<Self> {
        let config = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::FileNotFound(p.display().to_string()).into());
                }
                let contents = std::fs::read_to_string(p)?;
                serde_json::from_str(&contents)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Save to a JSON file (pretty-printed)
    pub fn save(&self, path: &Path) -> SwarmResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Reject settings the loop cannot run with
    pub fn validate(&self) -> SwarmResult<()> {
        if self.frame_rate <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "frame_rate".to_string(),
                message: "must be positive".to_string(),
            }
            .into());
        }
        if self.sample_rate == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sample_rate".to_string(),
                message: "must be positive".to_string(),
            }
            .into());
        }
        if self.flock.width <= 0.0 || self.flock.height <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "flock".to_string(),
                message: "world dimensions must be positive".to_string(),
            }
            .into());
        }
        if self.magnitude.lower_threshold >= self.magnitude.upper_threshold {
            return Err(ConfigError::InvalidValue {
                field: "magnitude".to_string(),
                message: "lower_threshold must be below upper_threshold".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
