//! Signal conditioning: offset subtraction, deadzone, exponential smoothing
//!
//! Each raw sample is referenced to the calibrated baseline, forced to zero
//! inside a noise deadzone, and blended into a first-order exponential
//! filter. The deadzone guarantees that sensor noise near the baseline never
//! produces a nonzero flow, and that the breath-stop logic can rely on flow
//! reaching exactly zero.

/// Per-sample conditioner holding the filter state
///
/// The conditioned output is a continuous function of the input history;
/// the only discontinuity is the deliberate deadzone clamp. Once the
/// adjusted sample is clamped and the filter has decayed into the deadzone
/// band, the filter state itself snaps to exactly zero so downstream flow
/// reads exactly 0.0 rather than a decaying residue.
///
/// # Example
/// ```
/// use spiroflow_core::breath::conditioner::SignalConditioner;
///
/// let mut conditioner = SignalConditioner::new(500.0, 0.1, 5.4);
/// // Still air: raw equals the baseline, output is exactly zero
/// assert_eq!(conditioner.condition(500.0), 0.0);
/// // A real breath pushes the filter up
/// assert!(conditioner.condition(700.0) > 0.0);
/// ```
#[derive(Debug)]
pub struct SignalConditioner {
    /// Calibrated baseline offset in raw ADC counts
    offset: f32,
    /// Exponential smoothing coefficient in (0, 1]
    alpha: f32,
    /// Forced-zero band above the baseline, in raw ADC counts
    deadzone: f32,
    /// Current filter state (raw ADC counts above baseline)
    filtered: f32,
}

impl SignalConditioner {
    /// Create a conditioner for a calibrated baseline
    ///
    /// # Arguments
    /// * `offset` - Baseline offset from [`Calibrator`](super::calibration::Calibrator)
    /// * `alpha` - Smoothing coefficient (reference 0.1)
    /// * `deadzone` - Noise band in raw counts (reference 5.4)
    pub fn new(offset: f32, alpha: f32, deadzone: f32) -> Self {
        Self {
            offset,
            alpha,
            deadzone,
            filtered: 0.0,
        }
    }

    /// Condition one raw sample and return the updated filter state
    pub fn condition(&mut self, raw: f32) -> f32 {
        let mut adjusted = raw - self.offset;

        // Deadzone: below-baseline noise and small positive noise both
        // collapse to zero before smoothing
        if adjusted < self.deadzone {
            adjusted = 0.0;
        }

        self.filtered = self.filtered * (1.0 - self.alpha) + adjusted * self.alpha;

        // Once the input is inside the deadzone and the filter has decayed
        // into it too, snap to exactly zero; flow must reach 0.0, not an
        // asymptote
        if adjusted == 0.0 && self.filtered < self.deadzone {
            self.filtered = 0.0;
        }

        self.filtered
    }

    /// Current filter state without ingesting a sample
    pub fn filtered(&self) -> f32 {
        self.filtered
    }

    /// Calibrated baseline offset
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Zero the filter state (breath end or session reset)
    pub fn reset(&mut self) {
        self.filtered = 0.0;
    }
}
