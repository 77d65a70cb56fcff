//! Breath segmentation state machine
//!
//! Classifies the flow stream into breathing and idle periods using
//! hysteresis thresholds and a stop-confirmation timer. The start threshold
//! sits above the cutoff threshold so the machine cannot oscillate around a
//! single level, and the stop timer distinguishes a genuine pause between
//! breaths from a brief dip mid-breath.

use std::time::Duration;

/// Breathing activity as seen by the segmenter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreathState {
    /// No breath in progress
    Idle,
    /// A breath is in progress
    Breathing,
}

/// Transition emitted by a segmentation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreathTransition {
    /// Flow rose above the start threshold from idle
    Started,
    /// Flow stayed at or below the cutoff for the full timeout
    Ended,
}

/// Hysteresis-based breath start/stop detector
///
/// Timing comes entirely from the caller as monotonic elapsed time, so the
/// machine behaves identically under sampling-interval jitter.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use spiroflow_core::breath::segmenter::{BreathSegmenter, BreathState, BreathTransition};
///
/// let mut seg = BreathSegmenter::new(5.0, 2.0, Duration::from_millis(1000));
/// let t = seg.step(20.0, Duration::from_millis(0));
/// assert_eq!(t, Some(BreathTransition::Started));
/// assert_eq!(seg.state(), BreathState::Breathing);
/// ```
#[derive(Debug)]
pub struct BreathSegmenter {
    /// Current state
    state: BreathState,
    /// Flow level that starts a breath (L/min)
    start_threshold: f32,
    /// Flow level that arms the stop timer (L/min)
    cutoff_threshold: f32,
    /// Pause length that confirms a breath end
    timeout: Duration,
    /// Last instant flow exceeded the start threshold
    stop_timer: Duration,
}

impl BreathSegmenter {
    /// Create a segmenter in the idle state
    ///
    /// # Arguments
    /// * `start_threshold` - Flow that starts a breath, L/min
    /// * `cutoff_threshold` - Flow at/below which the stop timer runs, L/min
    /// * `timeout` - Pause that confirms the breath ended (reference 1000 ms)
    pub fn new(start_threshold: f32, cutoff_threshold: f32, timeout: Duration) -> Self {
        Self {
            state: BreathState::Idle,
            start_threshold,
            cutoff_threshold,
            timeout,
            stop_timer: Duration::ZERO,
        }
    }

    /// Advance the machine with one flow reading
    ///
    /// # Arguments
    /// * `flow` - Instantaneous flow in L/min
    /// * `now` - Monotonic elapsed time of this sample
    ///
    /// # Returns
    /// The transition taken at this step, if any
    pub fn step(&mut self, flow: f32, now: Duration) -> Option<BreathTransition> {
        match self.state {
            BreathState::Idle => {
                if flow > self.start_threshold {
                    self.state = BreathState::Breathing;
                    self.stop_timer = now;
                    tracing::debug!(flow = flow, at_ms = now.as_millis() as u64, "breath_started");
                    Some(BreathTransition::Started)
                } else {
                    None
                }
            }
            BreathState::Breathing => {
                if flow > self.start_threshold {
                    // Still a fresh peak: re-arm the stop timer
                    self.stop_timer = now;
                    None
                } else if flow > self.cutoff_threshold {
                    // Between cutoff and start: not a fresh peak, not yet a pause
                    None
                } else if now.saturating_sub(self.stop_timer) > self.timeout {
                    self.state = BreathState::Idle;
                    tracing::debug!(at_ms = now.as_millis() as u64, "breath_ended");
                    Some(BreathTransition::Ended)
                } else {
                    // Grace period: flow is down but the pause is not confirmed yet
                    None
                }
            }
        }
    }

    /// Current state
    pub fn state(&self) -> BreathState {
        self.state
    }

    /// Flow level that starts a breath
    pub fn start_threshold(&self) -> f32 {
        self.start_threshold
    }

    /// Flow level that arms the stop timer
    pub fn cutoff_threshold(&self) -> f32 {
        self.cutoff_threshold
    }

    /// Return to idle and clear the stop timer
    pub fn reset(&mut self) {
        self.state = BreathState::Idle;
        self.stop_timer = Duration::ZERO;
    }
}
