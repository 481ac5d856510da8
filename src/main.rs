//! CLI entry point for the car sales report tool.
//!
//! Provides subcommands for producing the full report (document, CSV table and
//! composed email) and for printing the summary alone.

use anyhow::Result;
use car_sales_report::{
    aggregate::aggregate,
    config::{ReportConfig, ReportOverrides, resolve_format},
    loader::load_records,
    narrative::summarize,
    output::print_json,
    report,
};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "car_sales_report")]
#[command(about = "Summarize car sales records and prepare the monthly report", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the HTML report, CSV table and email message
    Report {
        /// JSON file with the sales records
        #[arg(short, long, default_value = "car_sales.json")]
        input: PathBuf,

        /// Directory to write the report files to
        #[arg(short = 'd', long, default_value = "out")]
        output_dir: PathBuf,

        /// Locale of the price strings (en_US, de_DE, C)
        #[arg(short, long)]
        locale: Option<String>,

        /// Email sender address
        #[arg(long)]
        sender: Option<String>,

        /// Email recipient address
        #[arg(long)]
        recipient: Option<String>,

        /// Document title and email subject
        #[arg(long)]
        title: Option<String>,
    },
    /// Log the three summary lines without writing any files
    Summary {
        /// JSON file with the sales records
        #[arg(short, long, default_value = "car_sales.json")]
        input: PathBuf,

        /// Locale of the price strings (en_US, de_DE, C)
        #[arg(short, long)]
        locale: Option<String>,

        /// Log the full aggregation result as JSON instead
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/car_sales_report.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("car_sales_report.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli.command) {
        error!(error = format!("{e:#}"), "Run failed, no report produced");
        return Err(e);
    }

    Ok(())
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Report {
            input,
            output_dir,
            locale,
            sender,
            recipient,
            title,
        } => {
            let config = ReportConfig::resolve(
                ReportOverrides {
                    sender,
                    recipient,
                    title,
                    locale,
                },
                output_dir,
            )?;
            let records = load_records(&input)?;
            let artifacts = report::run(&records, &config)?;

            info!(
                document = %artifacts.document.display(),
                table = %artifacts.table.display(),
                message = %artifacts.message.display(),
                "Report ready"
            );
        }
        Commands::Summary {
            input,
            locale,
            json,
        } => {
            let format = resolve_format(locale, &|key: &str| std::env::var(key).ok())?;
            let records = load_records(&input)?;
            let result = aggregate(&records, &format)?;

            if json {
                print_json(&result)?;
            } else {
                for line in summarize(&result, &format) {
                    info!("{line}");
                }
            }
        }
    }

    Ok(())
}
