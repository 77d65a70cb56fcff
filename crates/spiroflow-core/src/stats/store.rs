//! Time-series storage for session statistics
//!
//! Keeps a capped history of live flow readings for plotting plus a record
//! of every finalized breath, with running aggregates. Everything lives in
//! memory; nothing persists across runs.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

use crate::breath::session::BreathSummary;

/// Maximum number of live flow points to keep (10 minutes at ~10 Hz display cadence)
const MAX_FLOW_HISTORY_SIZE: usize = 6000;

/// Maximum number of breath records to keep
const MAX_BREATH_RECORDS: usize = 1000;

/// A single live flow measurement
#[derive(Debug, Clone)]
pub struct Measurement {
    /// Timestamp of the measurement
    pub timestamp: DateTime<Utc>,
    /// Flow in L/min
    pub value: f64,
}

/// A finalized breath with its timestamp
#[derive(Debug, Clone)]
pub struct BreathRecord {
    /// When the breath was finalized
    pub timestamp: DateTime<Utc>,
    /// Peak flow of the breath, L/min
    pub peak_flow: f32,
    /// Tidal volume of the breath, litres
    pub volume: f32,
    /// Breath duration in seconds
    pub duration_secs: f32,
}

/// Running aggregates over the finalized breaths
#[derive(Debug, Default, Clone)]
pub struct RunningStats {
    /// Number of finalized breaths
    pub breath_count: u64,
    /// Volume of the most recent breath (L)
    pub last_volume: f64,
    /// Minimum breath volume observed (L)
    pub min_volume: f64,
    /// Maximum breath volume observed (L)
    pub max_volume: f64,
    /// Average breath volume (L)
    pub avg_volume: f64,
    /// Highest peak flow observed across breaths (L/min)
    pub max_peak_flow: f64,
    /// Uptime in seconds since monitoring started
    pub uptime_seconds: u64,
}

/// Statistics store for one monitoring run
#[derive(Debug)]
pub struct SessionStore {
    /// Live flow readings, capped at full display resolution
    flow_history: VecDeque<Measurement>,
    /// Finalized breaths in order of completion
    breath_records: VecDeque<BreathRecord>,
    /// Running aggregates
    stats: RunningStats,
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            flow_history: VecDeque::with_capacity(MAX_FLOW_HISTORY_SIZE),
            breath_records: VecDeque::with_capacity(MAX_BREATH_RECORDS),
            stats: RunningStats {
                min_volume: f64::MAX,
                ..Default::default()
            },
        }
    }

    /// Record a live flow reading
    pub fn record_flow(&mut self, flow_lpm: f64) {
        if self.flow_history.len() >= MAX_FLOW_HISTORY_SIZE {
            self.flow_history.pop_front();
        }
        self.flow_history.push_back(Measurement {
            timestamp: Utc::now(),
            value: flow_lpm,
        });
    }

    /// Record a finalized breath and update the running aggregates
    pub fn record_breath(&mut self, summary: &BreathSummary) {
        if self.breath_records.len() >= MAX_BREATH_RECORDS {
            self.breath_records.pop_front();
        }
        self.breath_records.push_back(BreathRecord {
            timestamp: Utc::now(),
            peak_flow: summary.peak_flow,
            volume: summary.volume,
            duration_secs: summary.duration_secs,
        });

        let volume = summary.volume as f64;
        self.stats.breath_count += 1;
        self.stats.last_volume = volume;
        self.stats.min_volume = self.stats.min_volume.min(volume);
        self.stats.max_volume = self.stats.max_volume.max(volume);
        self.stats.max_peak_flow = self.stats.max_peak_flow.max(summary.peak_flow as f64);

        let sum: f64 = self.breath_records.iter().map(|r| r.volume as f64).sum();
        self.stats.avg_volume = sum / self.breath_records.len() as f64;
    }

    /// Live flow history
    pub fn flow_history(&self) -> &VecDeque<Measurement> {
        &self.flow_history
    }

    /// Finalized breaths in order of completion
    pub fn breath_records(&self) -> &VecDeque<BreathRecord> {
        &self.breath_records
    }

    /// Running aggregates
    pub fn stats(&self) -> &RunningStats {
        &self.stats
    }

    /// Set uptime seconds (called from the monitoring loop)
    pub fn set_uptime(&mut self, seconds: u64) {
        self.stats.uptime_seconds = seconds;
    }

    /// Flow values for plotting (last N points)
    ///
    /// # Returns
    /// Vector of (time_offset_seconds, flow_lpm) pairs, offsets negative
    /// into the past
    pub fn flow_plot_data(&self, count: usize) -> Vec<(f64, f64)> {
        let now = Utc::now();
        self.flow_history
            .iter()
            .rev()
            .take(count)
            .map(|m| {
                let time_offset = (now - m.timestamp).num_milliseconds() as f64 / 1000.0;
                (-time_offset, m.value)
            })
            .collect()
    }

    /// Clear all history and reset the aggregates
    pub fn clear(&mut self) {
        self.flow_history.clear();
        self.breath_records.clear();
        self.stats = RunningStats {
            min_volume: f64::MAX,
            ..Default::default()
        };
    }

    /// Reset aggregates without discarding the plot history
    pub fn reset_counters(&mut self) {
        self.stats.breath_count = 0;
        self.stats.last_volume = 0.0;
        self.stats.min_volume = f64::MAX;
        self.stats.max_volume = 0.0;
        self.stats.avg_volume = 0.0;
        self.stats.max_peak_flow = 0.0;
        self.stats.uptime_seconds = 0;
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(peak: f32, volume: f32) -> BreathSummary {
        BreathSummary {
            peak_flow: peak,
            volume,
            duration_secs: 1.2,
        }
    }

    #[test]
    fn test_store_creation() {
        let store = SessionStore::new();
        assert_eq!(store.flow_history().len(), 0);
        assert_eq!(store.stats().breath_count, 0);
    }

    #[test]
    fn test_record_breath_aggregates() {
        let mut store = SessionStore::new();

        store.record_breath(&summary(40.0, 0.5));
        assert_eq!(store.stats().breath_count, 1);
        assert_eq!(store.stats().last_volume, 0.5);

        store.record_breath(&summary(55.0, 0.7));
        let stats = store.stats();
        assert_eq!(stats.breath_count, 2);
        assert_eq!(stats.min_volume, 0.5);
        assert_eq!(stats.max_volume, 0.7);
        assert!((stats.avg_volume - 0.6).abs() < 1e-9);
        assert_eq!(stats.max_peak_flow, 55.0);
    }

    #[test]
    fn test_flow_history_limit() {
        let mut store = SessionStore::new();
        for i in 0..7000 {
            store.record_flow(i as f64);
        }
        assert_eq!(store.flow_history().len(), MAX_FLOW_HISTORY_SIZE);
    }

    #[test]
    fn test_plot_data_order_and_count() {
        let mut store = SessionStore::new();
        for i in 0..10 {
            store.record_flow(i as f64);
        }
        let data = store.flow_plot_data(5);
        assert_eq!(data.len(), 5);
        // Most recent reading first, offsets non-positive
        assert_eq!(data[0].1, 9.0);
        assert!(data.iter().all(|(t, _)| *t <= 0.0));
    }

    #[test]
    fn test_clear() {
        let mut store = SessionStore::new();
        store.record_flow(10.0);
        store.record_breath(&summary(40.0, 0.5));
        store.clear();
        assert_eq!(store.flow_history().len(), 0);
        assert_eq!(store.breath_records().len(), 0);
        assert_eq!(store.stats().breath_count, 0);
    }

    #[test]
    fn test_reset_counters_keeps_history() {
        let mut store = SessionStore::new();
        store.record_flow(10.0);
        store.record_breath(&summary(40.0, 0.5));
        store.reset_counters();
        assert_eq!(store.stats().breath_count, 0);
        assert_eq!(store.flow_history().len(), 1);
        assert_eq!(store.breath_records().len(), 1);
    }
}
