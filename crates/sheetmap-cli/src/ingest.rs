//! Reading uploaded sheets from CSV.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use sheetmap_model::{CellValue, Record};
use tracing::debug;

/// One parsed sheet: header order plus rows keyed by header.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl Sheet {
    pub fn row_count(&self) -> usize {
        self.records.len()
    }
}

/// Reads a CSV file; the sheet is named after the file stem.
pub fn read_csv(path: &Path) -> Result<Sheet> {
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    parse_csv(&name, file).with_context(|| format!("read {}", path.display()))
}

/// Parses CSV text with a header row.
///
/// Empty cells become [`CellValue::Null`]; everything else is kept as raw
/// text so type inference and trim detection see the value as typed. Short
/// rows are padded with nulls.
pub fn parse_csv<R: Read>(name: &str, reader: R) -> Result<Sheet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .context("read header row")?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.iter().all(String::is_empty) {
        bail!("sheet '{name}' has no header row");
    }

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("parse row {}", index + 2))?;
        if row.len() > headers.len() {
            bail!(
                "row {} has {} cells but the header has {}",
                index + 2,
                row.len(),
                headers.len()
            );
        }
        let record: Record = headers
            .iter()
            .enumerate()
            .map(|(column, header)| {
                let value = match row.get(column) {
                    Some("") | None => CellValue::Null,
                    Some(text) => CellValue::from(text),
                };
                (header.clone(), value)
            })
            .collect();
        records.push(record);
    }

    debug!(sheet = name, headers = headers.len(), rows = records.len(), "parsed csv");
    Ok(Sheet {
        name: name.to_string(),
        headers,
        records,
    })
}
