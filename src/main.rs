use anyhow::Result;
use aws_inventory_report::{report, ReportConfig};
use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Imports inventory CSV files into an Excel workbook.
#[derive(Parser, Debug)]
#[command(name = "aws-inventory-report", version, about)]
struct Args {
    /// Directory to operate in; CSVs are read from <DIR>/data, the report goes to <DIR>/output
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    // ─── 2) resolve dirs + date once ─────────────────────────────────
    let args = Args::parse();
    let config = ReportConfig::new(&args.directory, Local::now().date_naive());
    info!(
        input = %config.input_dir.display(),
        output = %config.output_dir.display(),
        date = %config.date,
        "startup"
    );

    // ─── 3) load + render ────────────────────────────────────────────
    let summary = report::run(&config)?;
    info!(
        path = %summary.path.display(),
        sources = summary.sources,
        rows = summary.rows,
        "all done"
    );
    Ok(())
}
