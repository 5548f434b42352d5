//! Row source: reads the tabular library export into [`RawRow`]s.
//!
//! The export is a CSV file with a header row. Records with more or fewer
//! fields than the header are accepted (missing fields read as empty, extra
//! fields are ignored) and invalid UTF-8 is replaced rather than rejected.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::models::RawRow;

const UTF8_BOM: char = '\u{feff}';

/// Read every row of the export at `path`.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open library export {}", path.display()))?;
    read_rows_from(file)
        .with_context(|| format!("Failed to read library export {}", path.display()))
}

/// Read every row from any CSV reader.
pub fn read_rows_from<R: Read>(reader: R) -> Result<Vec<RawRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .byte_headers()
        .context("Failed to read header row")?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let header = String::from_utf8_lossy(h);
            if i == 0 {
                header.trim_start_matches(UTF8_BOM).to_string()
            } else {
                header.into_owned()
            }
        })
        .collect();
    log::debug!("Export columns: {:?}", headers);

    let mut rows = Vec::new();
    for (line, record) in rdr.byte_records().enumerate() {
        let record = record.with_context(|| format!("Malformed record {}", line + 1))?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.as_str(), String::from_utf8_lossy(value).into_owned()))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}
