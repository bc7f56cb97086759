use std::io;
use std::process;
use std::time::Duration;

use chrono::Local;
use clap::Parser;
use tracing::{error, info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use moex_rate_report::config::Config;
use moex_rate_report::fetcher::RateTableFetcher;
use moex_rate_report::notify::{EmailNotifier, SenderCredentials};
use moex_rate_report::report::report_file_name;
use moex_rate_report::services::{write_report, ReportError, ReportService};

#[derive(Parser)]
#[command(name = "moex-rate-report", version)]
#[command(about = "Build this month's USD/EUR to RUB rate report from MOEX and email it", long_about = None)]
struct Cli {}

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    Cli::parse();

    // Initialize tracing with environment filter support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,moex_rate_report=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    info!("Starting rate report with config: {:?}", config);

    let fetcher = RateTableFetcher::new(
        config.base_url.clone(),
        Duration::from_secs(config.http_timeout_secs),
    )?;
    let service = ReportService::new(fetcher, config.malformed_row_policy);

    let now = Local::now().naive_local();
    let rows = match service.collect_rows(now.date()).await {
        Ok(rows) => rows,
        Err(ReportError::Fetch(e)) => {
            error!("Fetch failed: {}", e);
            eprintln!("An unexpected connection error has occurred: {e}");
            process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    let path = config.output_dir.join(report_file_name(now));
    let report = write_report(&rows, &path)?;
    println!("{}", report.description);

    let credentials = SenderCredentials::resolve(&config, &mut io::stdin().lock(), &mut io::stdout())?;
    let notifier = EmailNotifier::new(config.smtp_host.clone(), config.smtp_port);
    notifier
        .send_report(&credentials, &report.path, &report.description, now.date())
        .await?;

    info!("Report run completed");
    Ok(())
}
