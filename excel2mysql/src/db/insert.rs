//! Row conversion and batch insert

use anyhow::{Context, Result};
use log::info;
use sqlx::{Connection, MySqlConnection};

use crate::sheet::{Dataset, convert_cell};

/// One parameterized statement, reused for every row. Values are always
/// bound, never spliced into the SQL text.
pub fn insert_sql(table: &str, columns: &[String]) -> String {
    let cols: Vec<String> = columns.iter().map(|col| format!("`{col}`")).collect();
    let placeholders = vec!["?"; columns.len()].join(", ");
    format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders})",
        cols.join(", ")
    )
}

/// Insert every row of the dataset inside one transaction, committed after
/// the last row. A mid-batch failure drops the transaction and rolls back,
/// leaving no partially-inserted rows.
pub async fn insert_all(
    conn: &mut MySqlConnection,
    dataset: &Dataset,
    columns: &[String],
    table: &str,
) -> Result<u64> {
    let sql = insert_sql(table, columns);

    let mut tx = conn.begin().await.context("Failed to start transaction")?;

    let mut records = 0u64;
    for row in &dataset.rows {
        let mut query = sqlx::query(&sql);
        for cell in row {
            query = query.bind(convert_cell(cell));
        }
        query
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to insert row {}", records + 1))?;
        records += 1;
    }

    tx.commit().await.context("Failed to commit inserts")?;
    info!("Successfully inserted {records} records into {table}");

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_sql() {
        let columns = vec![
            "Full_Name".to_string(),
            "Score_1".to_string(),
            "Submitted_On".to_string(),
        ];
        assert_eq!(
            insert_sql("form_responses", &columns),
            "INSERT INTO form_responses (`Full_Name`, `Score_1`, `Submitted_On`) \
             VALUES (?, ?, ?)"
        );
    }

    #[test]
    fn test_insert_sql_single_column() {
        let columns = vec!["Name".to_string()];
        assert_eq!(
            insert_sql("t", &columns),
            "INSERT INTO t (`Name`) VALUES (?)"
        );
    }
}
