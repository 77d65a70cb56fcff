//! Pipeline configuration
//!
//! Every tunable of the signal pipeline lives here with its physical meaning
//! and unit stated at the definition site. Values can be loaded from a JSON
//! file; missing fields fall back to the reference defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

fn default_adc_max() -> f32 {
    crate::DEFAULT_ADC_MAX
}

fn default_vref() -> f32 {
    crate::DEFAULT_VREF
}

fn default_sensitivity() -> f32 {
    1.0
}

fn default_flow_k() -> f32 {
    46.5
}

fn default_volume_scaler() -> f32 {
    1.7
}

fn default_alpha() -> f32 {
    0.1
}

fn default_deadzone() -> f32 {
    5.4
}

fn default_start_threshold() -> f32 {
    5.0
}

fn default_cutoff_threshold() -> f32 {
    2.0
}

fn default_stop_timeout_ms() -> u64 {
    1000
}

fn default_calibration_samples() -> usize {
    crate::DEFAULT_CALIBRATION_SAMPLES
}

fn default_display_refresh_ms() -> u64 {
    150
}

/// Errors from [`PipelineConfig::validate`]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("smoothing alpha must be in (0, 1], got {0}")]
    InvalidAlpha(f32),

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("cutoff threshold {cutoff} must be below start threshold {start}")]
    ThresholdOrder { cutoff: f32, start: f32 },

    #[error("calibration sample count must be nonzero")]
    EmptyCalibrationBatch,
}

/// Pipeline configuration with all sensor and segmentation tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Full-scale count of the analog-to-digital converter (1023 for 10-bit)
    #[serde(default = "default_adc_max")]
    pub adc_max: f32,
    /// ADC reference voltage in volts
    #[serde(default = "default_vref")]
    pub vref: f32,
    /// Sensor transfer slope in volts per kilopascal
    #[serde(default = "default_sensitivity")]
    pub sensitivity_v_per_kpa: f32,
    /// Empirical pressure-to-flow constant (L/min per sqrt(kPa))
    #[serde(default = "default_flow_k")]
    pub flow_k: f32,
    /// Empirical volume correction factor; requires field calibration
    /// against a reference spirometer, not derived from first principles
    #[serde(default = "default_volume_scaler")]
    pub volume_scaler: f32,
    /// Exponential smoothing coefficient (responsiveness vs. noise rejection)
    #[serde(default = "default_alpha")]
    pub alpha: f32,
    /// Forced-zero band around the calibrated baseline, in raw ADC counts
    #[serde(default = "default_deadzone")]
    pub deadzone: f32,
    /// Flow level that starts a breath, in L/min
    #[serde(default = "default_start_threshold")]
    pub start_threshold: f32,
    /// Flow level that arms the breath-end timer, in L/min
    #[serde(default = "default_cutoff_threshold")]
    pub cutoff_threshold: f32,
    /// Pause length that confirms a breath has ended, in milliseconds
    #[serde(default = "default_stop_timeout_ms")]
    pub stop_timeout_ms: u64,
    /// Number of still-air samples averaged into the baseline offset
    #[serde(default = "default_calibration_samples")]
    pub calibration_samples: usize,
    /// Live display refresh cadence in milliseconds (driver loop)
    #[serde(default = "default_display_refresh_ms")]
    pub display_refresh_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            adc_max: default_adc_max(),
            vref: default_vref(),
            sensitivity_v_per_kpa: default_sensitivity(),
            flow_k: default_flow_k(),
            volume_scaler: default_volume_scaler(),
            alpha: default_alpha(),
            deadzone: default_deadzone(),
            start_threshold: default_start_threshold(),
            cutoff_threshold: default_cutoff_threshold(),
            stop_timeout_ms: default_stop_timeout_ms(),
            calibration_samples: default_calibration_samples(),
            display_refresh_ms: default_display_refresh_ms(),
        }
    }
}

impl PipelineConfig {
    /// Load config from a JSON file, falling back to defaults on any error
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "Loaded config from disk");
                    config
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                tracing::info!(path = %path.display(), "No config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Save config to disk, creating parent directories if needed
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::info!(path = %path.display(), "Config saved to disk");
        Ok(())
    }

    /// Check internal consistency of the tunables
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(ConfigError::InvalidAlpha(self.alpha));
        }
        for (name, value) in [
            ("adc_max", self.adc_max),
            ("vref", self.vref),
            ("sensitivity_v_per_kpa", self.sensitivity_v_per_kpa),
            ("flow_k", self.flow_k),
            ("volume_scaler", self.volume_scaler),
            ("start_threshold", self.start_threshold),
            ("cutoff_threshold", self.cutoff_threshold),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if self.cutoff_threshold >= self.start_threshold {
            return Err(ConfigError::ThresholdOrder {
                cutoff: self.cutoff_threshold,
                start: self.start_threshold,
            });
        }
        if self.calibration_samples == 0 {
            return Err(ConfigError::EmptyCalibrationBatch);
        }
        Ok(())
    }

    /// Breath-end timeout as a [`std::time::Duration`]
    pub fn stop_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.stop_timeout_ms)
    }
}
