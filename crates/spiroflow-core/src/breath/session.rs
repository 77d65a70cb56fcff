//! Breath session orchestration
//!
//! Drives one sample through the full pipeline per tick (condition -> flow
//! -> segment -> integrate) and owns the per-cycle state: peak flow,
//! accumulated volume, and the previous flow reading for trapezoidal
//! integration. Exposes a read-only snapshot for the display collaborator
//! and a finalized summary per completed breath.
//!
//! The post-breath wait for operator acknowledgment is an explicit phase,
//! not a blocking call: the session ignores samples while
//! [`SessionPhase::AwaitingAcknowledge`] and leaves the unblocking to the
//! input collaborator via [`BreathSession::acknowledge`].

use std::time::Duration;

use super::conditioner::SignalConditioner;
use super::flow::FlowModel;
use super::integrator::VolumeIntegrator;
use super::segmenter::{BreathSegmenter, BreathTransition};
use crate::config::PipelineConfig;

/// Session phase as seen by external collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for a breath to start
    Idle,
    /// A breath is in progress
    Breathing,
    /// A breath finished; sampling is paused until the operator acknowledges
    AwaitingAcknowledge,
}

/// Read-only live view handed to the display collaborator
#[derive(Debug, Clone, Copy)]
pub struct Snapshot {
    /// Instantaneous flow in L/min
    pub flow_rate: f32,
    /// Volume accumulated over the current breath, in litres
    pub volume: f32,
    /// Peak flow of the current breath, in L/min
    pub peak_flow: f32,
    /// Current session phase
    pub phase: SessionPhase,
}

/// Finalized per-breath summary, emitted exactly once per completed breath
#[derive(Debug, Clone, Copy)]
pub struct BreathSummary {
    /// Maximum instantaneous flow observed during the breath, L/min
    pub peak_flow: f32,
    /// Tidal volume of the breath, in litres
    pub volume: f32,
    /// Breath duration in seconds (onset to last activity)
    pub duration_secs: f32,
}

/// Per-session pipeline state and orchestration
///
/// # Example
/// ```
/// use std::time::Duration;
/// use spiroflow_core::breath::session::BreathSession;
/// use spiroflow_core::config::PipelineConfig;
///
/// let config = PipelineConfig::default();
/// let mut session = BreathSession::new(&config, 500.0);
/// let summary = session.tick(500.0, Duration::from_millis(0));
/// assert!(summary.is_none());
/// ```
#[derive(Debug)]
pub struct BreathSession {
    conditioner: SignalConditioner,
    flow_model: FlowModel,
    segmenter: BreathSegmenter,
    integrator: VolumeIntegrator,
    /// Flow level below which no volume accumulates
    cutoff_threshold: f32,
    /// Stop-confirmation timeout, subtracted from the reported duration
    stop_timeout: Duration,
    phase: SessionPhase,
    /// Peak flow of the current breath (monotonic within a breath)
    peak_flow: f32,
    /// Accumulated volume of the current breath, litres
    volume: f32,
    /// Flow at the previous tick, for trapezoidal integration
    previous_flow: f32,
    /// Flow at the current tick, for snapshots
    last_flow: f32,
    /// Monotonic time of the previous tick; None restores the clock baseline
    last_tick: Option<Duration>,
    /// Monotonic time at breath onset
    breath_start: Duration,
}

impl BreathSession {
    /// Create a session from a validated config and a calibrated offset
    pub fn new(config: &PipelineConfig, offset: f32) -> Self {
        Self {
            conditioner: SignalConditioner::new(offset, config.alpha, config.deadzone),
            flow_model: FlowModel::from_config(config),
            segmenter: BreathSegmenter::new(
                config.start_threshold,
                config.cutoff_threshold,
                config.stop_timeout(),
            ),
            integrator: VolumeIntegrator::new(config.volume_scaler),
            cutoff_threshold: config.cutoff_threshold,
            stop_timeout: config.stop_timeout(),
            phase: SessionPhase::Idle,
            peak_flow: 0.0,
            volume: 0.0,
            previous_flow: 0.0,
            last_flow: 0.0,
            last_tick: None,
            breath_start: Duration::ZERO,
        }
    }

    /// Process one raw sample
    ///
    /// # Arguments
    /// * `raw` - Raw sensor reading (ADC counts)
    /// * `now` - Monotonic elapsed time of this sample; `dt` is derived
    ///   from the delta to the previous tick, never from a fixed period
    ///
    /// # Returns
    /// The finalized summary when this sample confirms a breath end
    pub fn tick(&mut self, raw: f32, now: Duration) -> Option<BreathSummary> {
        // Sampling is deliberately paused while awaiting acknowledgment
        if self.phase == SessionPhase::AwaitingAcknowledge {
            return None;
        }

        let dt_secs = match self.last_tick {
            Some(prev) => now.saturating_sub(prev).as_secs_f32(),
            None => 0.0,
        };
        self.last_tick = Some(now);

        let filtered = self.conditioner.condition(raw);
        let flow = self.flow_model.flow_rate(filtered);
        self.last_flow = flow;

        let summary = match self.segmenter.step(flow, now) {
            Some(BreathTransition::Started) => {
                self.phase = SessionPhase::Breathing;
                self.breath_start = now;
                None
            }
            Some(BreathTransition::Ended) => Some(self.finalize(now)),
            None => None,
        };

        if self.phase == SessionPhase::Breathing {
            self.peak_flow = self.peak_flow.max(flow);
            if flow > self.cutoff_threshold {
                self.volume += self.integrator.delta_volume(flow, self.previous_flow, dt_secs);
            }
        }

        self.previous_flow = flow;
        summary
    }

    /// Freeze the summary and zero the per-breath state
    fn finalize(&mut self, now: Duration) -> BreathSummary {
        // The confirmation tick fires one timeout after the last activity
        let duration = now
            .saturating_sub(self.breath_start)
            .saturating_sub(self.stop_timeout);
        let summary = BreathSummary {
            peak_flow: self.peak_flow,
            volume: self.volume,
            duration_secs: duration.as_secs_f32(),
        };
        tracing::info!(
            peak_flow = summary.peak_flow,
            volume = summary.volume,
            duration_secs = summary.duration_secs,
            "breath_finalized"
        );

        self.phase = SessionPhase::AwaitingAcknowledge;
        self.peak_flow = 0.0;
        self.volume = 0.0;
        self.previous_flow = 0.0;
        self.last_flow = 0.0;
        self.conditioner.reset();
        summary
    }

    /// Read-only live view for the display collaborator
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            flow_rate: self.last_flow,
            volume: self.volume,
            peak_flow: self.peak_flow,
            phase: self.phase,
        }
    }

    /// Current session phase
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Operator acknowledgment after a finalized breath
    ///
    /// Leaves [`SessionPhase::AwaitingAcknowledge`] and restores the tick
    /// clock baseline so the pause does not count into the next `dt`.
    pub fn acknowledge(&mut self) {
        if self.phase != SessionPhase::AwaitingAcknowledge {
            return;
        }
        self.phase = SessionPhase::Idle;
        self.volume = 0.0;
        self.previous_flow = 0.0;
        self.conditioner.reset();
        self.last_tick = None;
        tracing::debug!("session_acknowledged");
    }

    /// Full state clear from any phase
    pub fn reset(&mut self) {
        self.segmenter.reset();
        self.conditioner.reset();
        self.phase = SessionPhase::Idle;
        self.peak_flow = 0.0;
        self.volume = 0.0;
        self.previous_flow = 0.0;
        self.last_flow = 0.0;
        self.last_tick = None;
        self.breath_start = Duration::ZERO;
    }
}
