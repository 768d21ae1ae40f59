//! One collection run: load catalog, collect, ingest.
mod state;

#[cfg(test)]
mod tests;

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;

use crate::catalog::MetricCatalog;
use crate::collector::{CollectOptions, Collection, SkippedQuery, collect};
use crate::error::{AppError, AppResult, QueryError, SessionError};
use crate::query::QueryApi;
use crate::store::SampleStore;

pub use state::SessionState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub catalog_path: PathBuf,
    /// Deadline of the whole collection phase.
    pub collect_timeout: Duration,
    pub collect: CollectOptions,
}

#[derive(Debug)]
pub struct SessionReport {
    pub expressions: usize,
    pub collected: usize,
    pub persisted: usize,
    pub skipped: Vec<SkippedQuery>,
}

/// Drives a single session through its states. A session runs once; any
/// failure leaves it in [`SessionState::Failed`].
#[derive(Debug)]
pub struct SessionOrchestrator {
    options: SessionOptions,
    state: SessionState,
}

impl SessionOrchestrator {
    #[must_use]
    pub const fn new(options: SessionOptions) -> Self {
        Self {
            options,
            state: SessionState::Idle,
        }
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Runs load → collect → ingest against `api` and `store`.
    ///
    /// # Errors
    ///
    /// Returns the first error of any stage; later stages do not run and no
    /// samples are persisted unless ingestion itself committed.
    pub async fn run<A>(&mut self, api: &A, store: &SampleStore) -> AppResult<SessionReport>
    where
        A: QueryApi + ?Sized,
    {
        if self.state != SessionState::Idle {
            return Err(AppError::session(SessionError::AlreadyStarted {
                state: self.state.as_str(),
            }));
        }
        let outcome = self.drive(api, store).await;
        if let Err(err) = &outcome {
            tracing::error!("Session failed after reaching {}: {}", self.state.as_str(), err);
            self.transition(SessionState::Failed);
        }
        outcome
    }

    async fn drive<A>(&mut self, api: &A, store: &SampleStore) -> AppResult<SessionReport>
    where
        A: QueryApi + ?Sized,
    {
        let catalog = MetricCatalog::load(&self.options.catalog_path)?;
        tracing::info!(
            "Loaded {} metrics to track from {}",
            catalog.len(),
            self.options.catalog_path.display()
        );
        self.transition(SessionState::CatalogLoaded);

        let as_of = Utc::now();
        let timeout = self.options.collect_timeout;
        let Collection { samples, skipped } = tokio::time::timeout(
            timeout,
            collect(&catalog, api, self.options.collect, as_of),
        )
        .await
        .map_err(|_elapsed| QueryError::DeadlineExceeded { timeout })??;
        tracing::info!("Collected {} metric samples", samples.len());
        self.transition(SessionState::Collected);

        let persisted = store.ingest(&samples).await?;
        tracing::info!("Persisted {} samples", persisted);
        self.transition(SessionState::Ingested);

        let report = SessionReport {
            expressions: catalog.len(),
            collected: samples.len(),
            persisted,
            skipped,
        };
        drop(samples);
        self.transition(SessionState::Done);
        Ok(report)
    }

    fn transition(&mut self, next: SessionState) {
        tracing::debug!("Session {} -> {}", self.state.as_str(), next.as_str());
        self.state = next;
    }
}
