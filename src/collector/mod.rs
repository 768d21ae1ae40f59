//! Catalog-driven query loop: one instant query per expression, each vector
//! element normalized into a [`MetricSample`].
mod normalize;


use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::catalog::MetricCatalog;
use crate::error::QueryError;
use crate::model::MetricSample;
use crate::query::{QueryApi, QueryData};

pub(crate) use normalize::samples_from_vector;

/// Which instant every query of a pass is evaluated at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EvalInstant {
    /// One instant captured when collection starts, shared by every query.
    #[default]
    Session,
    /// A fresh `now` for each expression.
    PerQuery,
}

/// What a failing expression does to the rest of the pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// The first failure aborts the pass; nothing collected so far is kept.
    #[default]
    FailFast,
    /// Failing expressions are recorded and skipped; the others still count.
    Skip,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectOptions {
    pub eval_instant: EvalInstant,
    pub failure_policy: FailurePolicy,
}

/// Expression dropped under [`FailurePolicy::Skip`].
#[derive(Debug)]
pub struct SkippedQuery {
    pub expression: String,
    pub error: QueryError,
}

/// Session buffer plus the expressions skipped while filling it.
#[derive(Debug, Default)]
pub struct Collection {
    pub samples: Vec<MetricSample>,
    pub skipped: Vec<SkippedQuery>,
}

/// Queries every catalog expression in order and accumulates the samples.
///
/// # Errors
///
/// Under [`FailurePolicy::FailFast`] the first query error (transport, API,
/// non-vector or malformed result) is returned and the pass stops.
pub async fn collect<A>(
    catalog: &MetricCatalog,
    api: &A,
    options: CollectOptions,
    as_of: DateTime<Utc>,
) -> Result<Collection, QueryError>
where
    A: QueryApi + ?Sized,
{
    let mut collection = Collection::default();
    for expression in catalog {
        let at = match options.eval_instant {
            EvalInstant::Session => as_of,
            EvalInstant::PerQuery => Utc::now(),
        };
        tracing::info!("Querying: {}", expression);
        match query_samples(api, expression, at).await {
            Ok(samples) => {
                tracing::debug!("'{}' returned {} samples", expression, samples.len());
                collection.samples.extend(samples);
            }
            Err(err) => match options.failure_policy {
                FailurePolicy::FailFast => return Err(err),
                FailurePolicy::Skip => {
                    tracing::warn!("Skipping '{}': {}", expression, err);
                    collection.skipped.push(SkippedQuery {
                        expression: expression.clone(),
                        error: err,
                    });
                }
            },
        }
    }
    Ok(collection)
}

async fn query_samples<A>(
    api: &A,
    expression: &str,
    at: DateTime<Utc>,
) -> Result<Vec<MetricSample>, QueryError>
where
    A: QueryApi + ?Sized,
{
    let result = api.instant_query(expression, at).await?;
    for warning in &result.warnings {
        tracing::warn!("Prometheus warning for '{}': {}", expression, warning);
    }
    match result.data {
        QueryData::Vector(elements) => samples_from_vector(expression, elements),
        data @ (QueryData::Scalar(_) | QueryData::Matrix(_) | QueryData::String(_)) => {
            Err(QueryError::ResultShape {
                expression: expression.to_owned(),
                found: data.kind(),
            })
        }
    }
}
