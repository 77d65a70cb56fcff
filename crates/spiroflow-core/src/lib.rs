//! Spiroflow Core - Breath signal pipeline, configuration, and statistics
//!
//! This library estimates respiratory airflow and tidal volume from a single
//! analog differential-pressure sensor. It covers baseline calibration,
//! signal conditioning, the pressure-to-flow conversion, breath segmentation,
//! and trapezoidal volume integration. Display rendering and input polling
//! are left to the application layer.

pub mod breath;
pub mod config;
pub mod stats;

pub use breath::calibration::Calibrator;
pub use breath::flow::FlowModel;
pub use breath::segmenter::{BreathSegmenter, BreathState, BreathTransition};
pub use breath::session::{BreathSession, BreathSummary, SessionPhase, Snapshot};
pub use config::PipelineConfig;
pub use stats::store::SessionStore;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Full-scale count of the reference 10-bit analog-to-digital converter
pub const DEFAULT_ADC_MAX: f32 = 1023.0;

/// Reference voltage of the analog front end (volts)
pub const DEFAULT_VREF: f32 = 5.0;

/// Number of still-air samples averaged into the baseline offset
pub const DEFAULT_CALIBRATION_SAMPLES: usize = 50;
