//! Query API boundary: the [`QueryApi`] seam and its Prometheus HTTP client.
mod client;
mod types;

#[cfg(test)]
pub(crate) mod test_support;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::QueryError;

pub use client::PrometheusClient;
pub use types::{QueryData, SamplePair, VectorElement};
pub(crate) use types::parse_timestamp;

/// Decoded instant-query answer: the result plus any advisory warnings.
#[derive(Debug, Clone)]
pub struct InstantQueryResult {
    pub data: QueryData,
    pub warnings: Vec<String>,
}

#[async_trait]
pub trait QueryApi: Send + Sync {
    /// Evaluates `expression` at the instant `at`.
    ///
    /// # Errors
    ///
    /// Returns an error when the call fails or the answer cannot be decoded.
    async fn instant_query(
        &self,
        expression: &str,
        at: DateTime<Utc>,
    ) -> Result<InstantQueryResult, QueryError>;
}
