use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::StatusCode;
use url::Url;

use crate::error::QueryError;

use super::types::ApiResponse;
use super::{InstantQueryResult, QueryApi};

const QUERY_PATH: &str = "api/v1/query";
const READY_PATH: &str = "-/ready";
const STATUS_SUCCESS: &str = "success";
const UNKNOWN_ERROR_TYPE: &str = "unknown";

pub(crate) const USER_AGENT: &str = concat!("promingest/", env!("CARGO_PKG_VERSION"));

/// Prometheus HTTP API v1 client.
#[derive(Debug, Clone)]
pub struct PrometheusClient {
    client: reqwest::Client,
    query_url: Url,
    ready_url: Url,
}

impl PrometheusClient {
    /// Builds a client for the Prometheus server at `base_url`. Every request
    /// is bounded by `request_timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is invalid or the HTTP client cannot be
    /// built.
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, QueryError> {
        let base = parse_base_url(base_url)?;
        let query_url = join_url(&base, base_url, QUERY_PATH)?;
        let ready_url = join_url(&base, base_url, READY_PATH)?;
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| QueryError::BuildClient { source: err })?;
        Ok(Self {
            client,
            query_url,
            ready_url,
        })
    }

    #[must_use]
    pub const fn query_url(&self) -> &Url {
        &self.query_url
    }

    /// Whether Prometheus answers its readiness endpoint with a success status.
    pub async fn ready(&self) -> bool {
        match self.client.get(self.ready_url.clone()).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                tracing::debug!("Prometheus readiness check failed: {}", err);
                false
            }
        }
    }
}

#[async_trait]
impl QueryApi for PrometheusClient {
    async fn instant_query(
        &self,
        expression: &str,
        at: DateTime<Utc>,
    ) -> Result<InstantQueryResult, QueryError> {
        let time = at.to_rfc3339_opts(SecondsFormat::Millis, true);
        let response = self
            .client
            .get(self.query_url.clone())
            .query(&[("query", expression), ("time", time.as_str())])
            .send()
            .await
            .map_err(|err| request_error(expression, err))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| request_error(expression, err))?;
        decode_query_response(expression, status, &body)
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, QueryError> {
    let mut base = Url::parse(base_url).map_err(|err| QueryError::InvalidBaseUrl {
        url: base_url.to_owned(),
        source: err,
    })?;
    // Url::join replaces the last segment unless the path ends with '/'.
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

fn join_url(base: &Url, base_url: &str, path: &str) -> Result<Url, QueryError> {
    base.join(path).map_err(|err| QueryError::InvalidBaseUrl {
        url: base_url.to_owned(),
        source: err,
    })
}

fn request_error(expression: &str, err: reqwest::Error) -> QueryError {
    if err.is_timeout() {
        QueryError::Timeout {
            expression: expression.to_owned(),
            source: err,
        }
    } else {
        QueryError::Transport {
            expression: expression.to_owned(),
            source: err,
        }
    }
}

pub(super) fn decode_query_response(
    expression: &str,
    status: StatusCode,
    body: &[u8],
) -> Result<InstantQueryResult, QueryError> {
    let parsed = match serde_json::from_slice::<ApiResponse>(body) {
        Ok(parsed) => parsed,
        Err(err) if status.is_success() => {
            return Err(QueryError::MalformedResult {
                expression: expression.to_owned(),
                reason: err.to_string(),
            });
        }
        Err(_decode) => {
            return Err(QueryError::HttpStatus {
                expression: expression.to_owned(),
                status: status.as_u16(),
            });
        }
    };

    if parsed.status != STATUS_SUCCESS {
        return Err(QueryError::Api {
            expression: expression.to_owned(),
            error_type: parsed
                .error_type
                .unwrap_or_else(|| UNKNOWN_ERROR_TYPE.to_owned()),
            message: parsed.error.unwrap_or_default(),
        });
    }
    if !status.is_success() {
        return Err(QueryError::HttpStatus {
            expression: expression.to_owned(),
            status: status.as_u16(),
        });
    }

    match parsed.data {
        Some(data) => Ok(InstantQueryResult {
            data,
            warnings: parsed.warnings,
        }),
        None => Err(QueryError::MalformedResult {
            expression: expression.to_owned(),
            reason: "response has no data".to_owned(),
        }),
    }
}
