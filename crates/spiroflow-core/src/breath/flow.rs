//! Pressure-to-flow conversion
//!
//! Converts a conditioned sample (raw ADC counts above baseline) into an
//! instantaneous flow rate via the differential-pressure square-root law:
//! counts -> volts -> pascals -> L/min. Flow through an orifice is
//! proportional to the square root of the pressure drop across it.

use crate::config::PipelineConfig;

/// Stateless pressure-to-flow converter
///
/// # Example
/// ```
/// use spiroflow_core::breath::flow::FlowModel;
/// use spiroflow_core::config::PipelineConfig;
///
/// let model = FlowModel::from_config(&PipelineConfig::default());
/// assert_eq!(model.flow_rate(0.0), 0.0);
/// assert!(model.flow_rate(100.0) > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct FlowModel {
    /// Full-scale ADC count
    adc_max: f32,
    /// ADC reference voltage (V)
    vref: f32,
    /// Sensor transfer slope (V/kPa)
    sensitivity_v_per_kpa: f32,
    /// Empirical flow constant (L/min per sqrt(kPa))
    flow_k: f32,
}

impl FlowModel {
    /// Create a flow model from explicit constants
    pub fn new(adc_max: f32, vref: f32, sensitivity_v_per_kpa: f32, flow_k: f32) -> Self {
        Self {
            adc_max,
            vref,
            sensitivity_v_per_kpa,
            flow_k,
        }
    }

    /// Create a flow model from the pipeline configuration
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            config.adc_max,
            config.vref,
            config.sensitivity_v_per_kpa,
            config.flow_k,
        )
    }

    /// Convert a conditioned sample into flow in L/min
    ///
    /// Non-positive pressure (below-baseline noise) maps to exactly zero
    /// flow; the square-root domain is guarded so no NaN or negative flow
    /// can escape this function.
    pub fn flow_rate(&self, filtered: f32) -> f32 {
        let voltage = filtered * (self.vref / self.adc_max);
        let pressure_pa = (voltage / self.sensitivity_v_per_kpa) * 1000.0;

        if pressure_pa > 0.0 {
            self.flow_k * (pressure_pa / 1000.0).sqrt()
        } else {
            0.0
        }
    }

    /// Pressure in pascals for a conditioned sample (diagnostic)
    pub fn pressure_pa(&self, filtered: f32) -> f32 {
        let voltage = filtered * (self.vref / self.adc_max);
        (voltage / self.sensitivity_v_per_kpa) * 1000.0
    }
}
