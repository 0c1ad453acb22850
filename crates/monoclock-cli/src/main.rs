//! monoclock CLI entry point.
//!
//! Diagnostic front end for the clock service: probe which time sources
//! the host offers, display the running elapsed clock, and benchmark
//! sleep overshoot.

mod report;
mod rt;
mod signals;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use monoclock_common::config::AppConfig;
use monoclock_common::SleepStats;
use monoclock_core::{sleep_for, Clock};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::report::SourceReport;

/// monoclock command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "monoclock",
    about = "Monotonic clock diagnostics - probe sources, display the clock, benchmark sleep",
    version,
    long_about = None
)]
struct Args {
    /// Path to a configuration file (TOML).
    #[arg(long, short = 'c', value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, short = 'l', default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Probe available time sources and report the selection outcome.
    Probe {
        /// Emit the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the running elapsed clock until interrupted.
    Show {
        /// Print interval.
        #[arg(long, default_value = "1s", value_parser = humantime::parse_duration)]
        interval: Duration,

        /// Stop after this long (default: run until Ctrl+C).
        #[arg(long, value_parser = humantime::parse_duration)]
        duration: Option<Duration>,
    },

    /// Measure sleep overshoot and print a percentile table.
    Bench {
        /// Number of measured iterations (overrides config).
        #[arg(long)]
        iterations: Option<u32>,

        /// Requested duration of each sleep (overrides config).
        #[arg(long, value_parser = humantime::parse_duration)]
        interval: Option<Duration>,

        /// Elevate to SCHED_FIFO for the measured loop (overrides config).
        #[arg(long)]
        rt: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting monoclock");

    let config = load_config(&args)?;

    signals::install();

    match args.command {
        Command::Probe { json } => run_probe(&config, json),
        Command::Show { interval, duration } => run_show(&config, interval, duration),
        Command::Bench {
            iterations,
            interval,
            rt,
        } => run_bench(&config, iterations, interval, rt),
    }
}

/// Initialize logging with the specified log level.
fn init_logging(level: &str) {
    let filter = format!(
        "monoclock={},monoclock_core={},monoclock_common={}",
        level, level, level
    );

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&filter)),
        )
        .with_target(true)
        .init();
}

/// Load configuration from file or use defaults.
///
/// Resolution priority (first existing source wins):
/// 1. Command-line `--config` argument
/// 2. `MONOCLOCK_CONFIG` environment variable
/// 3. Built-in defaults
fn load_config(args: &Args) -> Result<AppConfig> {
    if let Some(config_path) = &args.config {
        info!(?config_path, "Loading config from command-line argument");
        return AppConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"));
    }

    if let Ok(env_path) = std::env::var("MONOCLOCK_CONFIG") {
        let config_path = PathBuf::from(&env_path);
        info!(?config_path, "Loading config from MONOCLOCK_CONFIG");
        return AppConfig::from_file(&config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"));
    }

    Ok(AppConfig::default())
}

/// Run the `probe` subcommand.
fn run_probe(config: &AppConfig, json: bool) -> Result<()> {
    let report = SourceReport::probe(config.clock.source);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        print!("{}", report.render_text());
    }

    Ok(())
}

/// Run the `show` subcommand.
fn run_show(config: &AppConfig, interval: Duration, duration: Option<Duration>) -> Result<()> {
    let clock =
        Clock::with_preference(config.clock.source).context("Failed to initialize clock")?;
    let started = Instant::now();

    loop {
        println!("{:12.6} s", clock.elapsed_secs());

        sleep_for(interval);

        if signals::shutdown_requested() {
            info!("Interrupted");
            break;
        }
        if let Some(limit) = duration {
            if started.elapsed() >= limit {
                break;
            }
        }
    }

    Ok(())
}

/// Run the `bench` subcommand.
fn run_bench(
    config: &AppConfig,
    iterations: Option<u32>,
    interval: Option<Duration>,
    rt: bool,
) -> Result<()> {
    let mut bench = config.bench.clone();
    if let Some(iterations) = iterations {
        bench.iterations = iterations;
    }
    if let Some(interval) = interval {
        bench.interval = interval;
    }
    if rt {
        bench.realtime.enabled = true;
    }

    let clock =
        Clock::with_preference(config.clock.source).context("Failed to initialize clock")?;
    info!(
        source = clock.source().name(),
        iterations = bench.iterations,
        interval_us = bench.interval.as_micros(),
        "Starting sleep benchmark"
    );

    let applied_priority = rt::elevate(&bench.realtime)
        .context("Failed to apply real-time priority")?;

    for _ in 0..bench.warmup {
        sleep_for(bench.interval);
    }

    let mut stats = SleepStats::new(bench.histogram_size);
    for _ in 0..bench.iterations {
        if signals::shutdown_requested() {
            warn!(
                completed = stats.total_sleeps(),
                "Benchmark interrupted before completing all iterations"
            );
            break;
        }

        let start = Instant::now();
        sleep_for(bench.interval);
        stats.record(bench.interval, start.elapsed());
    }

    print_bench_results(&bench.interval, &stats, &bench.percentiles, applied_priority);

    Ok(())
}

/// Print the benchmark summary and percentile table.
fn print_bench_results(
    interval: &Duration,
    stats: &SleepStats,
    percentiles: &[f64],
    applied_priority: Option<u8>,
) {
    println!("sleep overshoot for {} requests:", humantime::format_duration(*interval));
    println!("  iterations:    {}", stats.total_sleeps());
    println!(
        "  scheduling:    {}",
        match applied_priority {
            Some(p) => format!("SCHED_FIFO priority {p}"),
            None => "default".to_string(),
        }
    );
    if stats.early_return_count() > 0 {
        println!("  early returns: {}", stats.early_return_count());
    }

    match (stats.min(), stats.mean(), stats.max()) {
        (Some(min), Some(mean), Some(max)) => {
            println!("  min:           {:>12.1} us", min.as_secs_f64() * 1e6);
            println!("  mean:          {:>12.1} us", mean.as_secs_f64() * 1e6);
            println!("  max:           {:>12.1} us", max.as_secs_f64() * 1e6);
        }
        _ => {
            println!("  no samples collected");
            return;
        }
    }

    for (p, value) in stats.percentiles(percentiles) {
        println!("  p{p:<5}        {:>12.1} us", value.as_secs_f64() * 1e6);
    }
}
