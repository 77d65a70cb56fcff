//! Baseline offset calibration
//!
//! Computes the sensor's still-air baseline as the arithmetic mean of a
//! fixed-size batch of raw readings taken while no flow is present. The
//! caller decides how long to wait before sampling and how to instruct the
//! operator to stay still; this type only accumulates.

/// Fixed-batch baseline accumulator
///
/// Feed raw samples one at a time with [`ingest`](Calibrator::ingest); the
/// call that completes the batch returns the computed offset. Out-of-range
/// readings are averaged in without rejection - an accepted limitation of
/// the reference sensor, not an error this component reports.
///
/// # Example
/// ```
/// use spiroflow_core::breath::calibration::Calibrator;
///
/// let mut calibrator = Calibrator::new(3);
/// assert!(calibrator.ingest(499.0).is_none());
/// assert!(calibrator.ingest(500.0).is_none());
/// assert_eq!(calibrator.ingest(501.0), Some(500.0));
/// ```
#[derive(Debug)]
pub struct Calibrator {
    /// Number of samples that completes the batch
    target: usize,
    /// Running sum of ingested raw readings
    sum: f64,
    /// Number of samples ingested so far
    count: usize,
}

impl Calibrator {
    /// Create a calibrator that completes after `target_samples` readings
    pub fn new(target_samples: usize) -> Self {
        Self {
            target: target_samples.max(1),
            sum: 0.0,
            count: 0,
        }
    }

    /// Ingest one raw reading
    ///
    /// # Returns
    /// `Some(offset)` on the sample that completes the batch, `None` before
    /// that and on any sample after completion.
    pub fn ingest(&mut self, raw: f32) -> Option<f32> {
        if self.count >= self.target {
            return None;
        }

        self.sum += raw as f64;
        self.count += 1;

        if self.count == self.target {
            let offset = (self.sum / self.count as f64) as f32;
            tracing::info!(
                samples = self.count,
                offset = offset,
                "baseline_calibrated"
            );
            Some(offset)
        } else {
            None
        }
    }

    /// Number of samples ingested so far
    pub fn progress(&self) -> usize {
        self.count
    }

    /// Number of samples that completes the batch
    pub fn target(&self) -> usize {
        self.target
    }

    /// Whether the batch is complete
    pub fn is_complete(&self) -> bool {
        self.count >= self.target
    }

    /// The computed offset, available once the batch is complete
    pub fn offset(&self) -> Option<f32> {
        if self.is_complete() {
            Some((self.sum / self.count as f64) as f32)
        } else {
            None
        }
    }

    /// Discard all ingested samples and start over
    pub fn reset(&mut self) {
        self.sum = 0.0;
        self.count = 0;
    }
}
