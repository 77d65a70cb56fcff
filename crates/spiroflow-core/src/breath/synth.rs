//! Synthetic breath signal generation
//!
//! Produces deterministic raw sensor readings for the simulate mode and the
//! end-to-end tests: a still-air lead-in for calibration, then a repeating
//! breathe/pause cycle where each breath is a half-sine effort bump above
//! the baseline, with low-level LCG noise on top.

use std::time::Duration;

/// Default still-air lead-in before the first breath (seconds)
const DEFAULT_LEAD_IN_SECS: f32 = 1.0;

/// Default sensor noise amplitude in raw counts (inside the deadzone)
const DEFAULT_NOISE_COUNTS: f32 = 1.5;

/// Deterministic raw-sample source shaped like a breathing operator
///
/// # Example
/// ```
/// use std::time::Duration;
/// use spiroflow_core::breath::synth::BreathSimulator;
///
/// let mut sim = BreathSimulator::new(500.0);
/// // Lead-in is still air around the baseline
/// let raw = sim.sample_at(Duration::from_millis(100));
/// assert!((raw - 500.0).abs() < 5.0);
/// ```
#[derive(Debug)]
pub struct BreathSimulator {
    /// Still-air baseline in raw counts
    baseline: f32,
    /// Peak effort above the baseline in raw counts
    amplitude: f32,
    /// Active breath length in seconds
    breath_secs: f32,
    /// Pause between breaths in seconds
    pause_secs: f32,
    /// Still-air lead-in before the first breath, for calibration
    lead_in_secs: f32,
    /// Noise amplitude in raw counts
    noise_counts: f32,
    /// PRNG state for noise generation
    noise_seed: u32,
}

impl BreathSimulator {
    /// Create a simulator around the given baseline
    ///
    /// Defaults: 200-count effort peak, 1.5 s breaths, 2 s pauses, 1 s
    /// still-air lead-in, 1.5-count noise (inside the reference deadzone).
    pub fn new(baseline: f32) -> Self {
        Self {
            baseline,
            amplitude: 200.0,
            breath_secs: 1.5,
            pause_secs: 2.0,
            lead_in_secs: DEFAULT_LEAD_IN_SECS,
            noise_counts: DEFAULT_NOISE_COUNTS,
            noise_seed: 0xDEADBEEF,
        }
    }

    /// Set the effort peak above baseline, in raw counts
    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude.max(0.0);
        self
    }

    /// Set the breathe/pause cycle lengths in seconds
    pub fn with_cycle(mut self, breath_secs: f32, pause_secs: f32) -> Self {
        self.breath_secs = breath_secs.max(0.1);
        self.pause_secs = pause_secs.max(0.1);
        self
    }

    /// Set the still-air lead-in length in seconds
    pub fn with_lead_in(mut self, lead_in_secs: f32) -> Self {
        self.lead_in_secs = lead_in_secs.max(0.0);
        self
    }

    /// Set the noise amplitude in raw counts (0 disables noise)
    pub fn with_noise(mut self, noise_counts: f32) -> Self {
        self.noise_counts = noise_counts.max(0.0);
        self
    }

    /// Raw sensor reading at elapsed time `t`
    pub fn sample_at(&mut self, t: Duration) -> f32 {
        let secs = t.as_secs_f32();
        let effort = self.effort_at(secs);
        let noise = self.next_noise() * self.noise_counts;
        self.baseline + effort + noise
    }

    /// Effort bump above baseline at elapsed second `secs`, noise-free
    fn effort_at(&self, secs: f32) -> f32 {
        if secs < self.lead_in_secs {
            return 0.0;
        }
        let cycle = self.breath_secs + self.pause_secs;
        let phase = (secs - self.lead_in_secs) % cycle;
        if phase < self.breath_secs {
            // Half-sine: zero at onset and release, peak mid-breath
            self.amplitude * (std::f32::consts::PI * phase / self.breath_secs).sin()
        } else {
            0.0
        }
    }

    /// Generate a noise sample in -1.0..1.0 using an LCG PRNG
    fn next_noise(&mut self) -> f32 {
        self.noise_seed = self.noise_seed.wrapping_mul(1103515245).wrapping_add(12345);
        let bits = (self.noise_seed >> 16) & 0x7FFF;
        (bits as f32 / 16384.0) - 1.0
    }

    /// Length of one breathe/pause cycle in seconds
    pub fn cycle_secs(&self) -> f32 {
        self.breath_secs + self.pause_secs
    }

    /// Still-air lead-in length in seconds
    pub fn lead_in_secs(&self) -> f32 {
        self.lead_in_secs
    }

    /// Still-air baseline in raw counts
    pub fn baseline(&self) -> f32 {
        self.baseline
    }

    /// Restore the noise generator to its initial state
    pub fn reset(&mut self) {
        self.noise_seed = 0xDEADBEEF;
    }
}
