//! Breath signal pipeline
//!
//! This module contains the full sample-to-summary path:
//! - Baseline offset calibration ([`calibration`])
//! - Deadzone and exponential smoothing ([`conditioner`])
//! - Pressure-to-flow conversion ([`flow`])
//! - Breath start/stop segmentation ([`segmenter`])
//! - Trapezoidal tidal-volume integration ([`integrator`])
//! - Per-session orchestration ([`session`])
//! - Synthetic breath signal generation for testing ([`synth`])

pub mod calibration;
pub mod conditioner;
pub mod flow;
pub mod integrator;
pub mod segmenter;
pub mod session;
pub mod synth;
