use std::time::{Duration, Instant};

use rusqlite::Connection;

use crate::error::{PersistenceStage, StoreError};
use crate::model::{MetricSample, format_timestamp};

use super::schema::{INSERT_SAMPLE_SQL, value_to_column};

/// A sample in its column form.
#[derive(Debug)]
pub(super) struct SampleRow {
    name: String,
    labels: String,
    value: Option<f64>,
    timestamp: String,
}

pub(super) fn encode_rows(samples: &[MetricSample]) -> Result<Vec<SampleRow>, StoreError> {
    samples
        .iter()
        .enumerate()
        .map(|(index, sample)| {
            let labels = sample
                .labels_json()
                .map_err(|err| StoreError::EncodeLabels { index, source: err })?;
            Ok(SampleRow {
                name: sample.name.clone(),
                labels,
                value: value_to_column(sample.value),
                timestamp: format_timestamp(&sample.timestamp),
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
pub(super) struct WriteDeadline {
    started: Instant,
    timeout: Duration,
}

impl WriteDeadline {
    pub(super) fn start(timeout: Duration) -> Self {
        Self {
            started: Instant::now(),
            timeout,
        }
    }

    fn check(&self, stage: PersistenceStage) -> Result<(), StoreError> {
        if self.started.elapsed() >= self.timeout {
            return Err(StoreError::DeadlineExceeded {
                stage,
                timeout: self.timeout,
            });
        }
        Ok(())
    }
}

/// Inserts every row inside one transaction. Any early return drops the
/// transaction guard, which rolls it back.
pub(super) fn write_batch(
    conn: &mut Connection,
    rows: &[SampleRow],
    deadline: &WriteDeadline,
) -> Result<usize, StoreError> {
    deadline.check(PersistenceStage::Begin)?;
    let tx = conn
        .transaction()
        .map_err(|err| persistence(PersistenceStage::Begin, err))?;
    {
        let mut stmt = tx
            .prepare(INSERT_SAMPLE_SQL)
            .map_err(|err| persistence(PersistenceStage::Prepare, err))?;
        for (index, row) in rows.iter().enumerate() {
            let stage = PersistenceStage::Insert { index };
            deadline.check(stage)?;
            stmt.execute(rusqlite::params![
                row.name,
                row.labels,
                row.value,
                row.timestamp
            ])
            .map_err(|err| persistence(stage, err))?;
        }
    }
    deadline.check(PersistenceStage::Commit)?;
    tx.commit()
        .map_err(|err| persistence(PersistenceStage::Commit, err))?;
    Ok(rows.len())
}

fn persistence(stage: PersistenceStage, source: rusqlite::Error) -> StoreError {
    StoreError::Persistence { stage, source }
}
