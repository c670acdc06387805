//! netspread runner
//!
//! Loads a run config from JSON, builds the network and ticks it, logging
//! the infected population as it goes.
//!
//! Usage: `netspread [config.json]`
//!
//! Log verbosity follows `RUST_LOG` (default `info`; `debug` logs every tick).

use netspread::prelude::*;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info, warn};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match env::args().nth(1).map(PathBuf::from) {
        Some(path) => match NetworkConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load config, using defaults");
                NetworkConfig::default()
            }
        },
        None => {
            warn!("No config file specified, using defaults. Usage: netspread <config.json>");
            NetworkConfig::default()
        }
    };

    info!(name = %config.name, nodes = config.node_count, ticks = config.ticks, "Starting run");

    let mut network = match config.to_builder().build() {
        Ok(network) => network,
        Err(e) => {
            error!(error = %e, "Failed to build network");
            return ExitCode::FAILURE;
        }
    };

    let started = Instant::now();
    let mut totals = RunStats {
        peak_infected: network.infected_count(),
        min_infected: network.infected_count(),
        final_infected: network.infected_count(),
        ..RunStats::default()
    };

    let chunk = if config.log_every == 0 { config.ticks } else { config.log_every };
    while totals.ticks < config.ticks {
        let stats = network.run(chunk.min(config.ticks - totals.ticks));
        totals.ticks += stats.ticks;
        totals.reseed_ticks += stats.reseed_ticks;
        totals.peak_infected = totals.peak_infected.max(stats.peak_infected);
        totals.min_infected = totals.min_infected.min(stats.min_infected);
        totals.final_infected = stats.final_infected;

        if config.log_every > 0 {
            info!(
                tick = network.tick_count(),
                infected = stats.final_infected,
                fraction = stats.final_infected as f32 / network.len() as f32,
                "Population"
            );
        }
    }

    let elapsed = started.elapsed().as_secs_f64();
    info!(
        ticks = totals.ticks,
        reseed_ticks = totals.reseed_ticks,
        peak = totals.peak_infected,
        min = totals.min_infected,
        infected = totals.final_infected,
        ticks_per_sec = if elapsed > 0.0 { totals.ticks as f64 / elapsed } else { 0.0 },
        "Run complete"
    );

    ExitCode::SUCCESS
}
