// src/report.rs

use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

use crate::{config::ReportConfig, load, render};

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub path: PathBuf,
    pub sources: usize,
    pub rows: usize,
}

/// Load every inventory file under `config.input_dir` and write the dated report.
pub fn run(config: &ReportConfig) -> Result<ReportSummary> {
    let (sources, table) = load::load_dir(&config.input_dir)?;

    let path = config.output_path();
    render::write_report(&table, config.date, &path)?;
    info!(path = %path.display(), sources, rows = table.len(), "report complete");

    Ok(ReportSummary {
        path,
        sources,
        rows: table.len(),
    })
}
