//! Transactional sample store on SQLite.
mod schema;
mod writer;


use std::time::Duration;

use tokio_rusqlite::Connection;

use crate::error::StoreError;
use crate::model::MetricSample;

pub use schema::{INSERT_SAMPLE_SQL, METRICS_TABLE, value_from_column, value_to_column};
use writer::{WriteDeadline, encode_rows, write_batch};

/// Connection settings of the sample store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// SQLite database path, or `:memory:`.
    pub url: String,
    /// Budget of one batch write, lock waits included.
    pub write_timeout: Duration,
}

/// Writer side of the `metrics` table. One batch per session, one writer.
#[derive(Debug)]
pub struct SampleStore {
    conn: Connection,
    write_timeout: Duration,
}

impl SampleStore {
    /// Opens the database named by `config.url`.
    ///
    /// # Errors
    ///
    /// Returns an error when the database cannot be opened or configured.
    pub async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let conn = Connection::open(&config.url)
            .await
            .map_err(|err| StoreError::Open {
                url: config.url.clone(),
                source: err,
            })?;
        Self::configure(conn, &config.url, config.write_timeout).await
    }

    /// Opens a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error when the database cannot be opened or configured.
    pub async fn open_in_memory(write_timeout: Duration) -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|err| StoreError::Open {
                url: ":memory:".to_owned(),
                source: err,
            })?;
        Self::configure(conn, ":memory:", write_timeout).await
    }

    async fn configure(
        conn: Connection,
        url: &str,
        write_timeout: Duration,
    ) -> Result<Self, StoreError> {
        conn.call(move |conn| {
            conn.busy_timeout(write_timeout)?;
            Ok(())
        })
        .await
        .map_err(|err| StoreError::Open {
            url: url.to_owned(),
            source: err,
        })?;
        Ok(Self {
            conn,
            write_timeout,
        })
    }

    /// Creates the `metrics` table and its indexes when missing.
    ///
    /// # Errors
    ///
    /// Returns an error when the DDL fails.
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        self.conn
            .call(|conn| Ok(schema::create_schema(conn)))
            .await
            .map_err(|err| StoreError::Connection { source: err })?
    }

    /// Writes the whole batch in one transaction and returns the row count.
    /// Either every sample is committed or none is.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EmptyBatch`] for an empty input without touching
    /// the database, and a staged persistence error (rolled back) otherwise.
    pub async fn ingest(&self, samples: &[MetricSample]) -> Result<usize, StoreError> {
        if samples.is_empty() {
            return Err(StoreError::EmptyBatch);
        }
        let rows = encode_rows(samples)?;
        let deadline = WriteDeadline::start(self.write_timeout);
        let written = self
            .conn
            .call(move |conn| Ok(write_batch(conn, &rows, &deadline)))
            .await
            .map_err(|err| StoreError::Connection { source: err })??;
        tracing::debug!("Committed {} samples to {}", written, METRICS_TABLE);
        Ok(written)
    }

    #[cfg(test)]
    pub(crate) async fn row_count(&self) -> Result<i64, StoreError> {
        self.conn
            .call(|conn| {
                let count =
                    conn.query_row("SELECT COUNT(*) FROM metrics", [], |row| row.get(0))?;
                Ok(count)
            })
            .await
            .map_err(|err| StoreError::Connection { source: err })
    }

    #[cfg(test)]
    pub(crate) async fn execute_batch(&self, sql: &'static str) -> Result<(), StoreError> {
        self.conn
            .call(move |conn| {
                conn.execute_batch(sql)?;
                Ok(())
            })
            .await
            .map_err(|err| StoreError::Connection { source: err })
    }

    #[cfg(test)]
    pub(crate) async fn rows(&self) -> Result<Vec<tests::StoredRow>, StoreError> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT name, labels, value, timestamp FROM metrics ORDER BY id",
                )?;
                let rows = stmt
                    .query_map([], |row| {
                        Ok(tests::StoredRow {
                            name: row.get(0)?,
                            labels: row.get(1)?,
                            value: value_from_column(row.get(2)?),
                            timestamp: row.get(3)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(|err| StoreError::Connection { source: err })
    }
}
