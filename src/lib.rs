//! Spiroflow - Respiratory airflow and tidal volume monitor
//!
//! Re-exports the core pipeline for the binary and the integration tests,
//! plus the sample-trace loader for replay mode.

pub use spiroflow_core::{breath, config, stats};
pub use spiroflow_core::{
    BreathSegmenter, BreathSession, BreathState, BreathSummary, BreathTransition, Calibrator,
    FlowModel, PipelineConfig, SessionPhase, SessionStore, Snapshot, VERSION,
};

pub mod replay;
