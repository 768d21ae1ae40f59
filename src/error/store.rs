use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Step of the batch write a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceStage {
    Begin,
    Prepare,
    Insert { index: usize },
    Commit,
}

impl fmt::Display for PersistenceStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceStage::Begin => f.write_str("transaction begin"),
            PersistenceStage::Prepare => f.write_str("statement prepare"),
            PersistenceStage::Insert { index } => write!(f, "insert of sample {}", index),
            PersistenceStage::Commit => f.write_str("commit"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Refusing to ingest an empty batch; the session collected no samples.")]
    EmptyBatch,
    #[error("Failed to open store '{url}': {source}")]
    Open {
        url: String,
        #[source]
        source: tokio_rusqlite::Error,
    },
    #[error("Store connection failed: {source}")]
    Connection {
        #[source]
        source: tokio_rusqlite::Error,
    },
    #[error("Failed to initialize store schema: {source}")]
    Schema {
        #[source]
        source: rusqlite::Error,
    },
    #[error("Failed to encode labels of sample {index}: {source}")]
    EncodeLabels {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Persistence failed at {stage}; batch rolled back: {source}")]
    Persistence {
        stage: PersistenceStage,
        #[source]
        source: rusqlite::Error,
    },
    #[error("Write deadline of {timeout:?} exceeded before {stage}; batch rolled back.")]
    DeadlineExceeded {
        stage: PersistenceStage,
        timeout: Duration,
    },
}

impl StoreError {
    /// Stage of the batch write that failed, if the failure happened inside it.
    #[must_use]
    pub const fn stage(&self) -> Option<PersistenceStage> {
        match self {
            StoreError::Persistence { stage, .. } | StoreError::DeadlineExceeded { stage, .. } => {
                Some(*stage)
            }
            StoreError::EmptyBatch
            | StoreError::Open { .. }
            | StoreError::Connection { .. }
            | StoreError::Schema { .. }
            | StoreError::EncodeLabels { .. } => None,
        }
    }
}
