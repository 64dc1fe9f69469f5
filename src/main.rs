use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use trendcast::config::{ForecastConfig, Overrides};
use trendcast::pipeline::run_job;
use trendcast::ForecastError;

/// Forecast weekly sales from a transaction log.
#[derive(Debug, Parser)]
#[command(name = "trendcast", version, about)]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input CSV of transactions
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output CSV for the forecast table
    #[arg(long)]
    output: Option<PathBuf>,

    /// Number of periods to forecast beyond history
    #[arg(long, allow_negative_numbers = true)]
    periods: Option<i64>,

    /// Aggregation cadence: D, W or W-MON..W-SUN
    #[arg(long)]
    cadence: Option<String>,

    /// Disable the weekly seasonal component
    #[arg(long)]
    no_weekly: bool,

    /// Disable the yearly seasonal component
    #[arg(long)]
    no_yearly: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "trendcast=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn run(cli: &Cli) -> Result<(), ForecastError> {
    let overrides = Overrides {
        input: cli.input.clone(),
        output: cli.output.clone(),
        future_periods: cli.periods,
        cadence: cli.cadence.clone(),
        disable_weekly: cli.no_weekly,
        disable_yearly: cli.no_yearly,
    };

    let job = ForecastConfig::load(cli.config.as_deref(), &overrides)?.validate()?;
    tracing::info!(
        input = %job.input.display(),
        output = %job.output.display(),
        periods = job.pipeline.future_periods,
        cadence = %job.pipeline.cadence,
        "configuration loaded"
    );

    let output = run_job(&job)?;
    let metrics = output.model.in_sample_metrics();
    tracing::info!(
        rows = output.table.len(),
        training_points = output.series.len(),
        mae = metrics.mae,
        rmse = metrics.rmse,
        "forecast complete"
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    if let Err(err) = run(&cli) {
        let stage = err.stage();
        tracing::error!(stage = %stage, error = %err, "forecast run failed");
        return Err(anyhow::Error::new(err).context(format!("{} stage failed", stage)));
    }
    Ok(())
}
