//! Spreadsheet loading and cell conversion
//!
//! The whole workbook is materialized in memory: the first row of the first
//! worksheet supplies the column headers, every following row is a record.

use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, Reader, Xlsx, open_workbook};

/// In-memory copy of the source spreadsheet. Rows are padded/truncated to the
/// header width so every record lines up with the column list.
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Data>>,
}

impl Dataset {
    pub fn load(path: &Path) -> Result<Dataset> {
        let mut workbook: Xlsx<_> = open_workbook(path)
            .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .context("Excel file has no sheets")?
            .clone();

        let range = workbook
            .worksheet_range(&sheet_name)
            .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

        let mut rows = range.rows();
        let headers: Vec<String> = rows
            .next()
            .context("Spreadsheet has no header row")?
            .iter()
            .map(cell_text)
            .collect();

        let rows = rows
            .map(|row| {
                let mut row = row.to_vec();
                row.resize(headers.len(), Data::Empty);
                row
            })
            .collect();

        Ok(Dataset { headers, rows })
    }

    /// Source type of each column, taken from its first non-empty cell.
    /// Logged for debugging only; storage is TEXT regardless.
    pub fn column_types(&self) -> Vec<&'static str> {
        (0..self.headers.len())
            .map(|col| {
                self.rows
                    .iter()
                    .map(|row| &row[col])
                    .find(|cell| !matches!(cell, Data::Empty))
                    .map(cell_type_name)
                    .unwrap_or("empty")
            })
            .collect()
    }
}

/// Flatten a cell to the value handed to the database driver.
///
/// Empty and error cells become NULL rather than an empty string, datetimes
/// are rendered as `YYYY-MM-DD HH:MM:SS`, and whole-valued floats drop their
/// fractional part (Excel stores integers as floats).
pub fn convert_cell(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) if f.is_nan() => None,
        Data::Float(f) if f.fract() == 0.0 => Some((*f as i64).to_string()),
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(match dt.as_datetime() {
            Some(naive) => naive.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        }),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 => (*f as i64).to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn cell_type_name(cell: &Data) -> &'static str {
    match cell {
        Data::Empty => "empty",
        Data::String(_) => "text",
        Data::Int(_) | Data::Float(_) => "number",
        Data::Bool(_) => "bool",
        Data::DateTime(_) | Data::DateTimeIso(_) => "datetime",
        Data::DurationIso(_) => "duration",
        Data::Error(_) => "error",
    }
}
