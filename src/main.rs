mod business_logic;
mod cli;
mod errors;
mod models;
mod services;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::business_logic::config::{env_entries, AppConfig};
use crate::cli::{Cli, Command};
use crate::errors::AppError;
use crate::services::runner::Runner;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries only the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trailwatch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(&cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{:#}", err);
            match err.downcast_ref::<AppError>() {
                Some(AppError::StateCorrupt {
                    price: Some(price), ..
                }) => {
                    tracing::error!("Price fetched before the state was rejected: {}", price);
                    ExitCode::FAILURE
                }
                Some(app_error) => app_error.exit_code(),
                None => ExitCode::FAILURE,
            }
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<String> {
    let config = AppConfig::resolve(cli, &env_entries())?;
    let runner = Runner::from_config(&config)?;

    match cli.command {
        Some(Command::Status) => {
            let status = runner
                .status()
                .await
                .context("status check failed")?;
            Ok(status.render())
        }
        None => {
            let report = runner
                .run_once()
                .await
                .with_context(|| format!("run against {} failed", config.state_file.display()))?;
            if !report.alerts.is_empty() {
                tracing::info!("{} alert(s) fired", report.alerts.len());
            }
            if report.notify_failures > 0 {
                tracing::warn!("{} alert(s) could not be delivered", report.notify_failures);
            }
            Ok(report.summary_line())
        }
    }
}
