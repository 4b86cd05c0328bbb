// src/config.rs

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

const INPUT_SUBDIR: &str = "data";
const OUTPUT_SUBDIR: &str = "output";
const REPORT_PREFIX: &str = "res-it_aws_resources";

/// Everything a run needs, resolved once up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub date: NaiveDate,
}

impl ReportConfig {
    /// Derive `<base>/data` and `<base>/output` from the base directory.
    pub fn new(base: impl AsRef<Path>, date: NaiveDate) -> Self {
        let base = base.as_ref();
        Self {
            input_dir: base.join(INPUT_SUBDIR),
            output_dir: base.join(OUTPUT_SUBDIR),
            date,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(report_file_name(self.date))
    }
}

/// `res-it_aws_resources_<YYYY-MM-DD>.xlsx`
pub fn report_file_name(date: NaiveDate) -> String {
    format!("{}_{}.xlsx", REPORT_PREFIX, date.format("%Y-%m-%d"))
}
