//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initializes logging
//! - loads configuration from the environment and applies CLI overrides
//! - dispatches to the command handlers
//! - prints reports and writes optional exports

use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::{AwardsArgs, Cli, Command, RangeArgs, SeriesArgs};
use crate::config::AcquisitionConfig;
use crate::data::AcquisitionService;
use crate::domain::MetricRequest;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `laborstat` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = AcquisitionConfig::from_env()?;
    if let Some(policy) = cli.policy {
        config.policy = policy;
    }
    if let Some(seed) = cli.seed {
        config.synth_seed = seed;
    }

    match cli.command {
        Command::Status => handle_status(&config),
        Command::Series(args) => handle_series(&pipeline::build_service(&config)?, args),
        Command::Overview(args) => handle_overview(&pipeline::build_service(&config)?, args),
        Command::Awards(args) => handle_awards(&pipeline::build_service(&config)?, args),
    }
}

/// Install the global subscriber.
///
/// Logs go to stderr so tables on stdout stay clean. `RUST_LOG` controls the
/// filter (default `warn`); `LABORSTAT_LOG_FORMAT=json` switches to JSON lines.
pub fn init_tracing() {
    let log_format = std::env::var("LABORSTAT_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    // try_init: a second call (tests, embedding) keeps the first subscriber.
    let _ = if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false).with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init()
    };
}

fn handle_status(config: &AcquisitionConfig) -> Result<(), AppError> {
    println!("{}", crate::report::format_credential_report(&config.credential_report()));
    println!("Fallback policy: {:?}", config.policy);
    Ok(())
}

fn handle_series(service: &AcquisitionService, args: SeriesArgs) -> Result<(), AppError> {
    let RangeArgs { region, start, end } = args.range;
    let request = MetricRequest::new(args.metric, &region, start, end)?;
    let series = service.get_series(&request)?;

    if !args.summary {
        println!("{}", crate::report::format_series_table(&series));
    }
    print!("{}", crate::report::format_series_summary(&crate::report::summarize(&series)));

    if let Some(path) = &args.export {
        crate::io::export::write_series_csv(path, &series)?;
    }
    if let Some(path) = &args.json {
        crate::io::json::write_series_json(path, &series)?;
    }
    Ok(())
}

fn handle_overview(service: &AcquisitionService, args: RangeArgs) -> Result<(), AppError> {
    let out = pipeline::fetch_overview(service, &args.region, args.start, args.end)?;
    println!("{}", crate::report::format_dashboard(&out.summary));
    Ok(())
}

fn handle_awards(service: &AcquisitionService, args: AwardsArgs) -> Result<(), AppError> {
    let RangeArgs { region, start, end } = args.range;
    let awards = service.get_awards(&region, start, end)?;
    println!("{}", crate::report::format_awards(&awards, args.top));

    if let Some(path) = &args.json {
        crate::io::json::write_awards_json(path, &awards)?;
    }
    Ok(())
}
