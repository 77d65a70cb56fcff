//! Trapezoidal tidal-volume integration
//!
//! Accumulates volume over an active breath as the average of two
//! consecutive flow samples times elapsed time. Flow is per-minute and the
//! tick interval is in seconds, hence the /60 unit conversion. A tunable
//! correction scaler compensates for systematic bias in the physical model.

/// Trapezoidal volume integrator
///
/// Stateless apart from its scaler; the session owns the running total.
///
/// # Example
/// ```
/// use spiroflow_core::breath::integrator::VolumeIntegrator;
///
/// let integrator = VolumeIntegrator::new(1.0);
/// // 60 L/min held for one second moves one litre
/// let dv = integrator.delta_volume(60.0, 60.0, 1.0);
/// assert!((dv - 1.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct VolumeIntegrator {
    /// Empirical correction factor; a field-calibration parameter, not a
    /// verified physical law
    volume_scaler: f32,
}

impl VolumeIntegrator {
    /// Create an integrator with the given correction scaler
    pub fn new(volume_scaler: f32) -> Self {
        Self { volume_scaler }
    }

    /// Volume moved between two consecutive ticks, in litres
    ///
    /// # Arguments
    /// * `flow` - Current flow in L/min
    /// * `previous_flow` - Flow at the previous tick in L/min
    /// * `dt_secs` - Monotonic elapsed time between the ticks in seconds
    ///
    /// The result is never negative for non-negative inputs; irregular tick
    /// intervals are handled by construction (no fixed period assumed).
    pub fn delta_volume(&self, flow: f32, previous_flow: f32, dt_secs: f32) -> f32 {
        let avg_flow = (flow + previous_flow) / 2.0;
        (avg_flow / 60.0) * dt_secs.max(0.0) * self.volume_scaler
    }

    /// The configured correction scaler
    pub fn volume_scaler(&self) -> f32 {
        self.volume_scaler
    }
}
