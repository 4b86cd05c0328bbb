// src/render.rs

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{
    Color, DocProperties, ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook,
};
use std::{fs, io::Write, path::Path};
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, info};

use crate::table::{Cell, CombinedTable, COLUMNS};

/// Extra width added to the longest value of each column.
pub const WIDTH_PADDING: f64 = 0.5;

const SHEET_NAME: &str = "Sheet1";
/// CSS `orange`.
const HEADER_FILL: u32 = 0xFFA500;

/// Width of each column: its longest rendered value (header included) plus padding.
pub fn column_widths(table: &CombinedTable) -> [f64; COLUMNS.len()] {
    let mut widths = [0.0; COLUMNS.len()];
    for (idx, header) in COLUMNS.iter().enumerate() {
        let longest = table
            .column(idx)
            .map(Cell::display_len)
            .chain(std::iter::once(header.chars().count()))
            .max()
            .unwrap_or(0);
        widths[idx] = longest as f64 + WIDTH_PADDING;
    }
    widths
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
        .set_background_color(Color::RGB(HEADER_FILL))
}

/// Lay `table` out as a single-sheet workbook, widths already applied.
///
/// `date` is stamped as the creation time so the same input on the same day
/// serialises to the same bytes.
pub fn build_workbook(table: &CombinedTable, date: NaiveDate) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let created = ExcelDateTime::from_ymd(date.year() as u16, date.month() as u8, date.day() as u8)
        .with_context(|| format!("Failed to stamp report date {}", date))?;
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let header = header_format();
    for (col, name) in COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &header)?;
    }

    for (idx, row) in table.rows().iter().enumerate() {
        let r = idx as u32 + 1;
        for (col, cell) in row.cells().into_iter().enumerate() {
            if let Cell::Text(s) = cell {
                sheet.write_string(r, col as u16, s)?;
            }
        }
    }

    for (col, width) in column_widths(table).into_iter().enumerate() {
        sheet.set_column_width(col as u16, width)?;
        debug!(column = COLUMNS[col], width, "column width");
    }

    Ok(workbook)
}

/// Create the temp file the report is assembled in.
///
/// The file gets the mode of the report it replaces, or 0644 for a fresh
/// one (still subject to the umask).
fn temp_report_file(dir: &Path, path: &Path) -> Result<NamedTempFile> {
    let existing = fs::metadata(path).ok().map(|m| m.permissions());

    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if existing.is_none() {
            builder.permissions(fs::Permissions::from_mode(0o644));
        }
    }
    let tmp = builder.tempfile_in(dir).with_context(|| {
        format!("Failed to create temp file in output directory {}", dir.display())
    })?;

    if let Some(perms) = existing {
        tmp.as_file()
            .set_permissions(perms)
            .with_context(|| format!("Failed to copy permissions of {}", path.display()))?;
    }
    Ok(tmp)
}

/// Write the report to `path` in one go.
///
/// The file is assembled next to `path` and renamed into place, so an
/// interrupted run leaves either the previous report or none at all.
#[tracing::instrument(level = "info", skip(table, path), fields(path = %path.as_ref().display(), rows = table.len()))]
pub fn write_report<P: AsRef<Path>>(table: &CombinedTable, date: NaiveDate, path: P) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut workbook = build_workbook(table, date)?;
    let bytes = workbook
        .save_to_buffer()
        .context("Failed to serialise workbook")?;

    let mut tmp = temp_report_file(dir, path)?;
    tmp.write_all(&bytes)
        .with_context(|| format!("Failed to write {}", tmp.path().display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("Failed to flush {}", tmp.path().display()))?;
    tmp.persist(path)
        .with_context(|| format!("Failed to move report into place at {}", path.display()))?;

    info!(bytes = bytes.len(), "wrote report");
    Ok(())
}
