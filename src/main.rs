use analytics::{SalesReportEngine, SalesSummary};
use anyhow::Context;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use configuration::{OutputFormat, ReportSettings};
use database::{connect, run_migrations, DbRepository, SalesSource};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

mod render;

/// The main entry point for the sales report application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => configuration::load_config_from(path),
        None => configuration::load_config(),
    }
    .context("Failed to load configuration")?;

    let _log_guard =
        configuration::init_tracing(&config.logging).context("Failed to initialize logging")?;

    let db_pool = connect(&config.database)
        .await
        .context("Failed to connect to the database")?;

    if config.database.run_migrations || matches!(cli.command, Commands::Migrate) {
        run_migrations(&db_pool)
            .await
            .context("Failed to run database migrations")?;
    }

    // Execute the appropriate command
    match cli.command {
        Commands::Report(args) => {
            let db_repo = DbRepository::new(db_pool);
            handle_report(args, &config.report, &db_repo).await?;
        }
        Commands::Migrate => println!("Migrations applied."),
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Aggregate sales statistics over the sales database.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (defaults to `config.toml`).
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the sales reports.
    Report(ReportArgs),
    /// Apply the database schema migrations.
    Migrate,
}

#[derive(Parser)]
struct ReportArgs {
    /// Size of the trailing window for the recent sales totals, in days.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    days: Option<u32>,

    /// Reference date for the window (format: YYYY-MM-DD). Defaults to now.
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Output format.
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

// ==============================================================================
// Report Command Logic
// ==============================================================================

/// Loads the sales, computes every report and prints the result.
async fn handle_report(
    args: ReportArgs,
    settings: &ReportSettings,
    source: &dyn SalesSource,
) -> anyhow::Result<()> {
    let window_days = args.days.unwrap_or(settings.window_days);
    let reference_date = reference_date(args.as_of);
    let format = args.format.unwrap_or(settings.format);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message("Loading sales...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let summary = build_summary(source, window_days, reference_date).await;
    spinner.finish_and_clear();
    let summary = summary?;

    let output = match format {
        OutputFormat::Table => render::render_table(&summary),
        OutputFormat::Json => render::render_json(&summary)?,
    };
    println!("{output}");

    Ok(())
}

/// Materializes the snapshot once and runs the engine over it.
async fn build_summary(
    source: &dyn SalesSource,
    window_days: u32,
    reference_date: DateTime<Utc>,
) -> anyhow::Result<SalesSummary> {
    let snapshot = source
        .fetch_snapshot()
        .await
        .context("Failed to load sales data")?;

    tracing::info!(window_days, %reference_date, "Computing sales reports.");
    let summary = SalesReportEngine::new()
        .summarize(&snapshot, window_days, reference_date)
        .context("Failed to compute the sales reports")?;

    Ok(summary)
}

/// Midnight UTC of the given day, or the current instant.
fn reference_date(as_of: Option<NaiveDate>) -> DateTime<Utc> {
    as_of
        .map(|day| day.and_time(NaiveTime::MIN).and_utc())
        .unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use core_types::{Brand, Product, Sale, SaleLineItem, SalesSnapshot, Store};
    use database::DbError;
    use rust_decimal_macros::dec;

    struct InMemorySource;

    #[async_trait]
    impl SalesSource for InMemorySource {
        async fn fetch_snapshot(&self) -> Result<SalesSnapshot, DbError> {
            let date = Utc.with_ymd_and_hms(2024, 2, 16, 15, 0, 0).unwrap();
            let snapshot = SalesSnapshot::new(
                vec![Store { id: 1, name: "Centro".to_string() }],
                vec![Brand { id: 1, name: "Acme".to_string() }],
                vec![Product {
                    id: 1,
                    name: "Widget".to_string(),
                    brand_id: 1,
                    unit_cost: dec!(3),
                }],
                vec![Sale {
                    id: 1,
                    store_id: 1,
                    date,
                    total_amount: dec!(12),
                    line_items: vec![SaleLineItem {
                        id: 1,
                        sale_id: 1,
                        product_id: 1,
                        quantity: 4,
                        unit_cost: dec!(3),
                    }],
                }],
            )?;
            Ok(snapshot)
        }
    }

    struct UnreachableSource;

    #[async_trait]
    impl SalesSource for UnreachableSource {
        async fn fetch_snapshot(&self) -> Result<SalesSnapshot, DbError> {
            Err(DbError::ConnectionConfigError("DATABASE_URL must be set.".to_string()))
        }
    }

    #[tokio::test]
    async fn summary_is_built_from_the_source_snapshot() {
        let reference = Utc.with_ymd_and_hms(2024, 2, 19, 0, 0, 0).unwrap();
        let summary = build_summary(&InMemorySource, 30, reference).await.unwrap();

        assert_eq!(summary.recent_sales.count, 1);
        assert_eq!(summary.recent_sales.amount, dec!(12));
        assert_eq!(summary.top_grossing_store.unwrap().name, "Centro");
        assert_eq!(summary.highest_margin_brand.unwrap().margin, dec!(12));
        assert_eq!(summary.best_sellers_by_store[0].product.as_ref().unwrap().quantity, 4);
    }

    #[tokio::test]
    async fn source_failures_propagate() {
        let err = build_summary(&UnreachableSource, 30, Utc::now()).await.unwrap_err();
        assert!(err.to_string().contains("Failed to load sales data"));
    }

    #[test]
    fn as_of_date_is_midnight_utc() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 19).unwrap();
        assert_eq!(
            reference_date(Some(day)),
            Utc.with_ymd_and_hms(2024, 2, 19, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn cli_parses_report_flags() {
        let cli = Cli::try_parse_from([
            "sales-report",
            "report",
            "--days",
            "7",
            "--as-of",
            "2024-02-19",
            "--format",
            "json",
        ])
        .unwrap();

        let Commands::Report(args) = cli.command else {
            panic!("expected the report command");
        };
        assert_eq!(args.days, Some(7));
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert_eq!(args.as_of, NaiveDate::from_ymd_opt(2024, 2, 19));
    }

    #[test]
    fn cli_rejects_a_zero_day_window() {
        assert!(Cli::try_parse_from(["sales-report", "report", "--days", "0"]).is_err());
    }
}
