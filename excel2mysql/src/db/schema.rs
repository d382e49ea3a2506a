//! Table creation from spreadsheet headers
//!
//! Every column is stored as nullable TEXT: Google-Form-style exports mix
//! blank, numeric, and date cells within one column, so per-column type
//! inference is not reliable. The trade-off is losing native numeric/date
//! querying.

use std::path::Path;

use anyhow::{Context, Result, bail};
use log::info;
use sqlx::MySqlConnection;

use crate::sheet::Dataset;

/// Make a header safe to use as a MySQL identifier: spaces, hyphens, and
/// periods become underscores, everything else is kept as-is.
pub fn sanitize_column(header: &str) -> String {
    header.replace([' ', '-', '.'], "_")
}

/// Sanitize all headers, preserving order. The one derivation per run is
/// shared by table creation and the insert statement so the two can never
/// disagree on column order or spelling.
pub fn derive_columns(headers: &[String]) -> Result<Vec<String>> {
    if headers.is_empty() {
        bail!("Spreadsheet has no header columns");
    }

    let mut columns = Vec::with_capacity(headers.len());
    for header in headers {
        let name = sanitize_column(header);
        if name.is_empty() {
            bail!("Spreadsheet has an empty header cell");
        }
        if columns.contains(&name) {
            bail!(
                "Header '{}' sanitizes to '{}', which collides with an earlier column",
                header,
                name
            );
        }
        columns.push(name);
    }
    Ok(columns)
}

pub fn create_table_sql(table: &str, columns: &[String]) -> String {
    let cols: Vec<String> = columns.iter().map(|col| format!("`{col}` TEXT")).collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {table} (id INT AUTO_INCREMENT PRIMARY KEY, {})",
        cols.join(", ")
    )
}

/// Load the spreadsheet and make sure a matching table exists. The CREATE
/// runs before any insert and takes effect immediately (MySQL DDL commits
/// implicitly), so a later insert failure cannot undo it.
pub async fn ensure_table(
    conn: &mut MySqlConnection,
    excel_file: &Path,
    table: &str,
) -> Result<(Dataset, Vec<String>)> {
    let dataset = Dataset::load(excel_file)?;
    info!(
        "Loaded {} rows x {} columns from {}",
        dataset.rows.len(),
        dataset.headers.len(),
        excel_file.display()
    );
    for (header, type_name) in dataset.headers.iter().zip(dataset.column_types()) {
        info!("Column '{header}': {type_name}");
    }

    let columns = derive_columns(&dataset.headers)?;

    sqlx::query(&create_table_sql(table, &columns))
        .execute(&mut *conn)
        .await
        .with_context(|| format!("Failed to create table {table}"))?;
    info!("Table {table} created or already exists");

    Ok((dataset, columns))
}
