mod cli;

use anyhow::Context;
use autorank::analyzer::compare_sources;
use autorank::config::{load_config, load_mapping};
use autorank::pipeline::collect_all;
use autorank::scraper::HttpTableSource;
use autorank::utils::{current_period, recent_periods};
use clap::Parser;
use cli::Cli;
use std::io::{self, Write};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries only the JSON output
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("panic: {:?}", panic_info);
    }));

    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    let mapping = load_mapping(&config.mapping_path)?;
    let source = HttpTableSource::new(Duration::from_secs(config.request_timeout_seconds))
        .context("failed to build HTTP client")?;

    let periods = recent_periods(current_period(), cli.months);
    info!(
        "Periods: {} months, providers selected: {:?}",
        periods.len(),
        cli.source
    );

    let providers = config.providers.iter().filter(|p| cli.source.includes(p.kind));
    let dataset = collect_all(providers, &source, &mapping, &periods)
        .await
        .context("provider table did not have the expected layout")?;
    info!("Normalized {} records", dataset.len());

    let mut out = io::stdout().lock();
    match cli.compare {
        Some(period) => {
            let report = compare_sources(&dataset, period, &cli.entities);
            serde_json::to_writer(&mut out, &report)?;
        }
        None => serde_json::to_writer(&mut out, &dataset)?,
    }
    writeln!(out)?;
    Ok(())
}
