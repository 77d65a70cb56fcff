//! Sample-trace loader for replay mode
//!
//! Traces are plain CSV with one `elapsed_ms,raw` pair per line. Blank
//! lines and `#` comments are skipped. The trace is expected to open with
//! enough still-air samples to cover the calibration batch.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::time::Duration;

/// One timestamped raw sensor reading
#[derive(Debug, Clone, Copy)]
pub struct TraceSample {
    /// Monotonic elapsed time of the reading
    pub at: Duration,
    /// Raw sensor reading in ADC counts
    pub raw: f32,
}

/// Load a sample trace from a CSV file
pub fn load_trace(path: &Path) -> Result<Vec<TraceSample>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read trace {}", path.display()))?;
    let samples = parse_trace(&contents)?;
    tracing::info!(
        path = %path.display(),
        samples = samples.len(),
        "trace_loaded"
    );
    Ok(samples)
}

/// Parse trace contents; lines must be ordered by elapsed time
pub fn parse_trace(contents: &str) -> Result<Vec<TraceSample>> {
    let mut samples = Vec::new();
    let mut last_ms = 0u64;

    for (lineno, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (ms_str, raw_str) = line
            .split_once(',')
            .with_context(|| format!("line {}: expected `elapsed_ms,raw`", lineno + 1))?;
        let ms: u64 = ms_str
            .trim()
            .parse()
            .with_context(|| format!("line {}: bad elapsed_ms `{}`", lineno + 1, ms_str))?;
        let raw: f32 = raw_str
            .trim()
            .parse()
            .with_context(|| format!("line {}: bad raw value `{}`", lineno + 1, raw_str))?;

        if ms < last_ms {
            bail!("line {}: timestamps must not go backwards", lineno + 1);
        }
        last_ms = ms;

        samples.push(TraceSample {
            at: Duration::from_millis(ms),
            raw,
        });
    }

    if samples.is_empty() {
        bail!("trace contains no samples");
    }
    Ok(samples)
}
