// src/load.rs

use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use std::{
    fs::{self, File},
    io::{BufReader, Read},
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

use crate::table::{CombinedTable, Row, COLUMNS};

/// List every regular file in `input_dir`, sorted by file name.
///
/// Sub-directories and other non-file entries are skipped. No extension
/// filter is applied: anything sitting in the directory is treated as CSV.
pub fn discover_sources(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(input_dir)
        .with_context(|| format!("Failed to list input directory {}", input_dir.display()))?;

    let mut sources = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("Failed to read entry in {}", input_dir.display()))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .with_context(|| format!("Failed to stat {}", path.display()))?;
        // follow symlinks so a linked CSV still counts
        if file_type.is_file() || (file_type.is_symlink() && path.is_file()) {
            sources.push(path);
        } else {
            warn!(path = %path.display(), "skipping non-file entry");
        }
    }
    sources.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    debug!(count = sources.len(), "discovered sources");
    Ok(sources)
}

/// Parse one headerless CSV into rows.
///
/// Every non-blank record must have exactly `COLUMNS.len()` fields. A header
/// line, if present, is not detected and comes back as an ordinary row.
pub fn read_rows<R: Read>(name: &str, reader: R) -> Result<Vec<Row>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        // field count is checked below so the error can name the record
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result
            .with_context(|| format!("CSV parse error in {} at record {}", name, idx + 1))?;
        if record.len() != COLUMNS.len() {
            bail!(
                "{} record {} has {} fields, expected {} ({})",
                name,
                idx + 1,
                record.len(),
                COLUMNS.len(),
                COLUMNS.join(",")
            );
        }
        let row: Row = record
            .deserialize(None)
            .with_context(|| format!("Failed to decode {} record {}", name, idx + 1))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Concatenate `sources` in the order given.
pub fn load_table<I, R>(sources: I) -> Result<CombinedTable>
where
    I: IntoIterator<Item = (String, R)>,
    R: Read,
{
    let mut table = CombinedTable::new();
    for (name, reader) in sources {
        let rows = read_rows(&name, reader)?;
        debug!(source = %name, rows = rows.len(), "loaded");
        table.append(rows);
    }
    Ok(table)
}

/// Discover and load every file under `input_dir`.
#[tracing::instrument(level = "info", skip(input_dir), fields(dir = %input_dir.as_ref().display()))]
pub fn load_dir<P: AsRef<Path>>(input_dir: P) -> Result<(usize, CombinedTable)> {
    let paths = discover_sources(input_dir.as_ref())?;

    let mut sources = Vec::with_capacity(paths.len());
    for path in &paths {
        let file = File::open(path)
            .with_context(|| format!("Failed to open input file {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        sources.push((name, BufReader::new(file)));
    }

    let table = load_table(sources)?;
    info!(files = paths.len(), rows = table.len(), "combined inventory");
    Ok((paths.len(), table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;
    use std::io::Cursor;
    use tempfile::TempDir;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,aws_inventory_report=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    fn source(name: &str, body: &str) -> (String, Cursor<Vec<u8>>) {
        (name.to_string(), Cursor::new(body.as_bytes().to_vec()))
    }

    #[test]
    fn read_rows_keeps_file_order() -> Result<()> {
        let body = "us-east-1,ec2,i-1,Name,web\nus-east-1,ec2,i-2,Name,db\n";
        let rows = read_rows("a.csv", Cursor::new(body))?;
        assert_eq!(
            rows,
            vec![
                Row::new(["us-east-1", "ec2", "i-1", "Name", "web"]),
                Row::new(["us-east-1", "ec2", "i-2", "Name", "db"]),
            ]
        );
        Ok(())
    }

    #[test]
    fn header_line_is_imported_as_data() -> Result<()> {
        let body = "Region,Service,Resource,Key,Value\neu-west-1,s3,bucket-1,Name,logs\n";
        let rows = read_rows("with_header.csv", Cursor::new(body))?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].region, Cell::from("Region"));
        Ok(())
    }

    #[test]
    fn quoted_commas_and_empty_fields() -> Result<()> {
        let body = "us-east-1,ec2,i-1,Tags,\"a,b\"\nus-east-1,ec2,i-1,Owner,\n";
        let rows = read_rows("q.csv", Cursor::new(body))?;
        assert_eq!(rows[0].value, Cell::from("a,b"));
        assert_eq!(rows[1].value, Cell::Empty);
        Ok(())
    }

    #[test]
    fn wrong_field_count_is_an_error() {
        let body = "us-east-1,ec2,i-1,Name,web\nus-east-1,ec2,i-2,Name\n";
        let err = read_rows("short.csv", Cursor::new(body)).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("short.csv"), "{msg}");
        assert!(msg.contains("record 2"), "{msg}");
        assert!(msg.contains("has 4 fields"), "{msg}");
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let body: Vec<u8> = vec![b'a', b',', 0xff, 0xfe, b',', b'c', b',', b'd', b',', b'e', b'\n'];
        assert!(read_rows("bad.csv", Cursor::new(body)).is_err());
    }

    #[test]
    fn load_table_concatenates_in_source_order() -> Result<()> {
        init_test_logging();
        let table = load_table(vec![
            source("a.csv", "us-east-1,ec2,i-1,Name,web\n"),
            source("b.csv", "eu-west-1,s3,bucket-1,Name,logs\neu-west-1,s3,bucket-2,Name,www\n"),
            source("c.csv", ""),
        ])?;
        assert_eq!(table.len(), 3);
        let resources: Vec<&str> = table.column(2).map(Cell::as_str).collect();
        assert_eq!(resources, vec!["i-1", "bucket-1", "bucket-2"]);
        Ok(())
    }

    #[test]
    fn load_dir_sorts_files_and_skips_subdirs() -> Result<()> {
        init_test_logging();
        let tmp = TempDir::new()?;
        fs::write(tmp.path().join("b.csv"), "eu-west-1,s3,bucket-1,Name,logs\n")?;
        fs::write(tmp.path().join("a.csv"), "us-east-1,ec2,i-1,Name,web\n")?;
        fs::create_dir(tmp.path().join("nested"))?;

        let (files, table) = load_dir(tmp.path())?;
        assert_eq!(files, 2);
        assert_eq!(
            table.rows(),
            &[
                Row::new(["us-east-1", "ec2", "i-1", "Name", "web"]),
                Row::new(["eu-west-1", "s3", "bucket-1", "Name", "logs"]),
            ]
        );
        Ok(())
    }

    #[test]
    fn missing_input_dir_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_dir(tmp.path().join("data")).unwrap_err();
        assert!(err.to_string().contains("Failed to list input directory"));
    }
}
