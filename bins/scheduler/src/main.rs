//! Recurring-item batch runner.
//!
//! Runs one scheduler pass over all due recurring invoices, expenses, and
//! income, prints the batch report as JSON, and exits. Intended to be
//! invoked from cron; an exit code of 1 signals that at least one row
//! failed and will be retried on the next run.

use std::process::ExitCode;

use chrono::Utc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ledgerline_db::{RecurringRepository, connect};
use ledgerline_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ledgerline=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database).await?;
    info!("Connected to database");

    let repo = RecurringRepository::new(db);
    let today = Utc::now().date_naive();
    let report = repo.process_all(today).await;

    info!(
        invoices = report.invoices,
        expenses = report.expenses,
        income = report.income,
        failures = report.failures.len(),
        "Recurring batch finished"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);

    if report.has_failures() {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
