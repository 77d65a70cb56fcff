//! Spiroflow - Respiratory airflow and tidal volume monitor
//!
//! Entry point for the command-line monitor. Drives the sample pipeline
//! from either a synthetic breathing source or a recorded sample trace.

use anyhow::Result;
use spiroflow::breath::synth::BreathSimulator;
use spiroflow::replay::{load_trace, TraceSample};
use spiroflow::{BreathSession, BreathSummary, Calibrator, PipelineConfig, SessionStore};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("spiroflow=info".parse().unwrap()),
        )
        .init();

    println!("╔════════════════════════════════════════════════════════════╗");
    println!(
        "║           Spiroflow v{} - Breath Flow Monitor            ║",
        spiroflow::VERSION
    );
    println!("╚════════════════════════════════════════════════════════════╝");
    println!();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    let mut replay_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut seconds: u64 = 20;
    let mut baseline: f32 = 500.0;
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--version" | "-v" => {
                println!("spiroflow {}", spiroflow::VERSION);
                return Ok(());
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--simulate" | "-s" => {
                // Default mode; accepted for symmetry with --replay
            }
            "--replay" | "-r" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --replay requires a trace file");
                    return Ok(());
                }
                replay_path = Some(PathBuf::from(&args[i + 1]));
                i += 2;
                continue;
            }
            "--config" | "-c" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    return Ok(());
                }
                config_path = Some(PathBuf::from(&args[i + 1]));
                i += 2;
                continue;
            }
            "--seconds" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --seconds requires a value");
                    return Ok(());
                }
                match args[i + 1].parse() {
                    Ok(n) => seconds = n,
                    Err(_) => {
                        eprintln!("Error: Invalid seconds: {}", args[i + 1]);
                        return Ok(());
                    }
                }
                i += 2;
                continue;
            }
            "--baseline" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --baseline requires a value");
                    return Ok(());
                }
                match args[i + 1].parse() {
                    Ok(b) => baseline = b,
                    Err(_) => {
                        eprintln!("Error: Invalid baseline: {}", args[i + 1]);
                        return Ok(());
                    }
                }
                i += 2;
                continue;
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                return Ok(());
            }
        }
        i += 1;
    }

    let config = match config_path {
        Some(ref path) => PipelineConfig::load(path),
        None => PipelineConfig::default(),
    };
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        return Ok(());
    }

    match replay_path {
        Some(path) => run_replay(&config, &path),
        None => run_simulate(&config, seconds, baseline),
    }
}

fn print_help() {
    println!("Usage: spiroflow [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -s, --simulate          Run against a synthetic breathing source (default)");
    println!("      --seconds N         Simulation length in seconds (default: 20)");
    println!("      --baseline N        Simulated sensor baseline in ADC counts (default: 500)");
    println!("  -r, --replay FILE       Replay a recorded trace (CSV: elapsed_ms,raw)");
    println!("  -c, --config FILE       Load pipeline tunables from a JSON file");
    println!("  -v, --version           Show version");
    println!("  -h, --help              Show this help");
    println!();
    println!("Examples:");
    println!("  spiroflow --simulate --seconds 30");
    println!("  spiroflow --replay session.csv -c spiroflow.json");
}

/// Live monitor against the synthetic breathing source
fn run_simulate(config: &PipelineConfig, seconds: u64, baseline: f32) -> Result<()> {
    println!("Simulating a breathing operator for {} s...", seconds);
    println!();

    let mut sim = BreathSimulator::new(baseline);
    let mut monitor = Monitor::new(config);

    // Set up Ctrl+C handler
    let running = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, std::sync::atomic::Ordering::SeqCst);
    })
    .ok();

    let epoch = Instant::now();
    let deadline = Duration::from_secs(seconds);
    while running.load(std::sync::atomic::Ordering::SeqCst) {
        let now = epoch.elapsed();
        if now >= deadline {
            break;
        }
        let raw = sim.sample_at(now);
        monitor.feed(raw, now);
        std::thread::sleep(Duration::from_millis(10));
    }

    println!();
    monitor.print_report();
    Ok(())
}

/// Replay a recorded trace at full speed using its own timestamps
fn run_replay(config: &PipelineConfig, path: &std::path::Path) -> Result<()> {
    let samples: Vec<TraceSample> = load_trace(path)?;
    println!(
        "Replaying {} samples from {}...",
        samples.len(),
        path.display()
    );
    println!();

    let mut monitor = Monitor::new(config);
    for sample in &samples {
        monitor.feed(sample.raw, sample.at);
    }

    println!();
    monitor.print_report();
    Ok(())
}

/// Monitor state: calibration, session, statistics, and display cadence
struct Monitor {
    config: PipelineConfig,
    calibrator: Calibrator,
    session: Option<BreathSession>,
    store: SessionStore,
    display_refresh: Duration,
    last_display: Option<Duration>,
    last_status: String,
}

impl Monitor {
    fn new(config: &PipelineConfig) -> Self {
        println!(
            "Calibrating baseline: keep the sensor still for {} samples...",
            config.calibration_samples
        );
        Self {
            config: config.clone(),
            calibrator: Calibrator::new(config.calibration_samples),
            session: None,
            store: SessionStore::new(),
            display_refresh: Duration::from_millis(config.display_refresh_ms),
            last_display: None,
            last_status: String::new(),
        }
    }

    /// Drive one raw sample through calibration or the session pipeline
    fn feed(&mut self, raw: f32, now: Duration) {
        let session = match self.session.as_mut() {
            Some(session) => session,
            None => {
                if let Some(offset) = self.calibrator.ingest(raw) {
                    println!("Baseline offset: {:.1} counts", offset);
                    println!();
                    println!("Status:");
                    println!("────────────────────────────────────────");
                    self.session = Some(BreathSession::new(&self.config, offset));
                }
                return;
            }
        };

        if let Some(summary) = session.tick(raw, now) {
            self.store.record_breath(&summary);
            print_summary(&summary, self.store.stats().breath_count);
            // The CLI has no physical button; acknowledge right away
            session.acknowledge();
        }

        // Display refresh at its own cadence, decoupled from sampling
        let due = match self.last_display {
            Some(last) => now.saturating_sub(last) >= self.display_refresh,
            None => true,
        };
        if due {
            self.last_display = Some(now);
            let snap = session.snapshot();
            self.store.record_flow(snap.flow_rate as f64);
            self.store.set_uptime(now.as_secs());

            let status_line = format!(
                "Flow: {:>6.1} L/min | Volume: {:>6.3} L | Peak: {:>6.1} L/min",
                snap.flow_rate, snap.volume, snap.peak_flow
            );
            // Only print if changed (reduce spam)
            if status_line != self.last_status {
                println!("{}", status_line);
                self.last_status = status_line;
            }
        }
    }

    fn print_report(&self) {
        let stats = self.store.stats();
        println!("Session report:");
        println!("────────────────────────────────────────");
        println!("  Breaths:      {}", stats.breath_count);
        if stats.breath_count > 0 {
            println!("  Avg volume:   {:>6.3} L", stats.avg_volume);
            println!("  Min volume:   {:>6.3} L", stats.min_volume);
            println!("  Max volume:   {:>6.3} L", stats.max_volume);
            println!("  Best peak:    {:>6.1} L/min", stats.max_peak_flow);
        }
        println!("  Uptime:       {} s", stats.uptime_seconds);
        info!(breaths = stats.breath_count, "session_complete");
    }
}

fn print_summary(summary: &BreathSummary, number: u64) {
    println!();
    println!("Breath #{} complete:", number);
    println!("  Peak flow:    {:>6.1} L/min", summary.peak_flow);
    println!("  Tidal volume: {:>6.3} L", summary.volume);
    println!("  Duration:     {:>6.2} s", summary.duration_secs);
    println!();
}
