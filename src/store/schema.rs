use rusqlite::Connection;

use crate::error::StoreError;

pub const METRICS_TABLE: &str = "metrics";

pub const INSERT_SAMPLE_SQL: &str =
    "INSERT INTO metrics (name, labels, value, timestamp) VALUES (?1, ?2, ?3, ?4)";

const CREATE_SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS metrics (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        labels TEXT NOT NULL,
        value REAL,
        timestamp TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
    CREATE INDEX IF NOT EXISTS idx_metrics_name ON metrics(name);
    CREATE INDEX IF NOT EXISTS idx_metrics_timestamp ON metrics(timestamp);";

/// Column form of a sample value. SQLite has no NaN, so NaN is stored as
/// NULL; infinities are stored as REAL.
#[must_use]
pub fn value_to_column(value: f64) -> Option<f64> {
    (!value.is_nan()).then_some(value)
}

/// Inverse of [`value_to_column`]: NULL reads back as NaN.
#[must_use]
pub fn value_from_column(column: Option<f64>) -> f64 {
    column.unwrap_or(f64::NAN)
}

pub(super) fn create_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(CREATE_SCHEMA_SQL)
        .map_err(|err| StoreError::Schema { source: err })
}
