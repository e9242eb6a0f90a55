// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::Utc;
use clap::{Parser, Subcommand};
use polyscrape::config::settings::Settings;
use polyscrape::domain::use_cases::monitor_use_case::{MonitorOutcome, MonitorUseCase};
use polyscrape::domain::use_cases::scrape_use_case::ScrapeUseCase;
use polyscrape::engines::chromium_engine::ChromiumDriver;
use polyscrape::infrastructure::storage::JsonFileStore;
use polyscrape::utils::errors::{ConfigurationError, ScrapeError};
use polyscrape::utils::telemetry::{self, LogFormat};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

/// PolyRatings 教授目录抓取工具
#[derive(Parser)]
#[command(name = "polyscrape")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Extra configuration file, layered over config/ and under environment variables
    #[arg(short, long, global = true, env = "POLYSCRAPE_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the professor directory and write the result file (default)
    Scrape,

    /// Check freshness and completeness of the last written result
    Monitor {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// 主函数
///
/// 解析命令行、初始化日志并分派子命令
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    telemetry::init_telemetry(if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    });

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            let e = ConfigurationError::from(e);
            error!(error = %e, "Failed to load configuration");
            return ExitCode::from(2);
        }
    };

    let code = match cli.command.unwrap_or(Commands::Scrape) {
        Commands::Scrape => match scrape(&settings).await {
            Ok(()) => 0,
            Err(e) => {
                error!(error = %e, "Scrape run failed");
                e.exit_code()
            }
        },
        Commands::Monitor { json } => monitor(&settings, json).await,
    };

    ExitCode::from(code)
}

async fn scrape(settings: &Settings) -> Result<(), ScrapeError> {
    let store = Arc::new(JsonFileStore::new(&settings.output.path));
    let use_case = ScrapeUseCase::new(settings, store)?;
    info!(output = %settings.output.path.display(), "Configuration loaded");

    let driver = ChromiumDriver::launch(&settings.browser).await?;
    let outcome = use_case.execute(&driver).await;

    driver.shutdown().await;

    let summary = outcome?;
    if summary.is_partial() {
        warn!(
            total = summary.total_professors,
            "Result written from an incomplete scroll"
        );
    }
    Ok(())
}

async fn monitor(settings: &Settings, json: bool) -> u8 {
    let store = Arc::new(JsonFileStore::new(&settings.output.path));
    let outcome = MonitorUseCase::new(&settings.monitor, store).execute(Utc::now()).await;

    let report = match &outcome {
        MonitorOutcome::Report(report) => report,
        MonitorOutcome::NoData => {
            error!(path = %settings.output.path.display(), "Health check has no data");
            return outcome.exit_code();
        }
    };

    if json {
        match serde_json::to_string_pretty(report) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                error!(error = %e, "Failed to serialize health report");
                return 1;
            }
        }
    } else {
        println!("{}", report);
    }

    outcome.exit_code()
}
