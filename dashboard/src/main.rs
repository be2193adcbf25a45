use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use sales_forecast::config::ForecastConfig;
use sales_forecast::ForecastState;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sales-dashboard")]
#[command(version, about = "Serve the sales forecast dashboard", long_about = None)]
struct Cli {
    /// Log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the trained state and start the HTTP server
    Serve {
        /// Configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// State snapshot, overrides [state].path
        #[arg(short, long)]
        state: Option<PathBuf>,

        /// Overrides [dashboard].host
        #[arg(long)]
        host: Option<String>,

        /// Overrides [dashboard].port
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    match cli.command {
        Commands::Serve {
            config,
            state,
            host,
            port,
        } => {
            let config = ForecastConfig::load_or_default(config.as_deref())
                .context("Failed to load configuration")?;
            let state_path = state.unwrap_or(config.state.path);
            let host = host.unwrap_or(config.dashboard.host);
            let port = port.unwrap_or(config.dashboard.port);

            let snapshot = ForecastState::load(&state_path)
                .with_context(|| format!("Cannot start dashboard from {}", state_path.display()))?;
            info!(
                "Loaded state from {} ({} series, trained {})",
                state_path.display(),
                snapshot.series.len(),
                snapshot.created_at
            );

            dashboard::serve(snapshot, &host, port).await?;
        }
    }

    Ok(())
}
