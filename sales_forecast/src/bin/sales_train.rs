use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use sales_forecast::config::ForecastConfig;
use sales_forecast::metrics::best_by_mae;
use sales_forecast::profile::profile_csv;
use sales_forecast::synthetic::{self, SyntheticConfig};
use sales_forecast::training::TrainingPipeline;
use sales_forecast::utils::{format_percent, format_thousands};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sales-train")]
#[command(version, about = "Train sales forecasts and write the dashboard state", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate, evaluate and forecast, then write the state snapshot
    Run {
        /// Transactions CSV, overrides [data].path
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Output state file, overrides [state].path
        #[arg(short, long)]
        state: Option<PathBuf>,
    },
    /// Write a seeded synthetic transactions CSV
    Generate {
        #[arg(short, long, default_value = "data/synthetic.csv")]
        output: PathBuf,

        #[arg(long, default_value_t = 48)]
        months: u32,

        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Print the column profile of a transactions CSV
    Profile {
        /// Transactions CSV, overrides [data].path
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    let config = ForecastConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    match cli.command {
        Commands::Run { data, state } => run(config, data, state)?,
        Commands::Generate {
            output,
            months,
            seed,
        } => {
            let synthetic_config = SyntheticConfig {
                months,
                seed,
                ..SyntheticConfig::default()
            };
            let transactions = synthetic::generate(&synthetic_config)?;
            synthetic::write_csv(&output, &transactions)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!(
                "Wrote {} transactions to {}",
                transactions.len(),
                output.display()
            );
        }
        Commands::Profile { data } => {
            let path = data.unwrap_or(config.data.path);
            let columns = profile_csv(&path)
                .with_context(|| format!("Failed to profile {}", path.display()))?;
            println!("{:<24} {:<10} {:>8} {:>9} {:>9}", "Column", "Type", "Missing", "Missing%", "Distinct");
            for c in columns {
                println!(
                    "{:<24} {:<10} {:>8} {:>8.2}% {:>9}",
                    c.name,
                    c.dtype,
                    c.missing,
                    c.missing_pct,
                    c.distinct.map_or_else(|| "-".to_string(), |d| d.to_string())
                );
            }
        }
    }

    Ok(())
}

fn run(mut config: ForecastConfig, data: Option<PathBuf>, state: Option<PathBuf>) -> Result<()> {
    if let Some(data) = data {
        config.data.path = data;
    }
    if let Some(state) = state {
        config.state.path = state;
    }

    let data_path = config.data.path.clone();
    let state_path = config.state.path.clone();
    info!("Training from {}", data_path.display());

    let forecast_state = TrainingPipeline::new(config)
        .run_from_path(&data_path)
        .with_context(|| format!("Training failed for {}", data_path.display()))?;

    let report = &forecast_state.load_report;
    println!(
        "Loaded {} of {} rows ({} skipped)",
        report.rows_loaded,
        report.rows_read,
        report.skipped()
    );

    for bundle in &forecast_state.series {
        let forecast_total = bundle
            .primary_forecast()
            .map(|f| format_thousands(f.total()))
            .unwrap_or_else(|| "n/a".to_string());
        let best = bundle
            .evaluation
            .as_ref()
            .and_then(|e| {
                let table = e.accuracy_table();
                best_by_mae(&table).map(|r| {
                    let mape = r.mape.map_or_else(|| "n/a".to_string(), format_percent);
                    format!("{} (MAE {:.2}, MAPE {})", r.model, r.mae, mape)
                })
            })
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "{:<32} next {} total {:>12}  best {}",
            bundle.key.display_name(),
            forecast_state.horizon,
            forecast_total,
            best
        );
    }

    forecast_state
        .save(&state_path)
        .with_context(|| format!("Failed to write {}", state_path.display()))?;
    println!("State written to {}", state_path.display());
    Ok(())
}
