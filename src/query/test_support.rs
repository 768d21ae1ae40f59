use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::QueryError;

use super::{InstantQueryResult, QueryApi, QueryData, SamplePair, VectorElement};

/// Canned answer of [`FakeQueryApi`] for one expression.
#[derive(Debug, Clone)]
pub(crate) enum FakeReply {
    Vector(Vec<VectorElement>),
    Warned(Vec<VectorElement>, Vec<String>),
    Scalar,
    Reject(&'static str),
    Stall(Duration),
}

#[derive(Debug, Default)]
pub(crate) struct FakeQueryApi {
    replies: HashMap<String, FakeReply>,
    calls: Mutex<Vec<(String, DateTime<Utc>)>>,
}

impl FakeQueryApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(mut self, expression: &str, reply: FakeReply) -> Self {
        self.replies.insert(expression.to_owned(), reply);
        self
    }

    pub(crate) fn calls(&self) -> Vec<(String, DateTime<Utc>)> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl QueryApi for FakeQueryApi {
    async fn instant_query(
        &self,
        expression: &str,
        at: DateTime<Utc>,
    ) -> Result<InstantQueryResult, QueryError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((expression.to_owned(), at));
        }
        let reply = self
            .replies
            .get(expression)
            .cloned()
            .unwrap_or(FakeReply::Reject("unknown expression"));
        match reply {
            FakeReply::Vector(elements) => Ok(InstantQueryResult {
                data: QueryData::Vector(elements),
                warnings: Vec::new(),
            }),
            FakeReply::Warned(elements, warnings) => Ok(InstantQueryResult {
                data: QueryData::Vector(elements),
                warnings,
            }),
            FakeReply::Scalar => Ok(InstantQueryResult {
                data: QueryData::Scalar(serde_json::json!([at.timestamp(), "1"])),
                warnings: Vec::new(),
            }),
            FakeReply::Reject(message) => Err(QueryError::Api {
                expression: expression.to_owned(),
                error_type: "bad_data".to_owned(),
                message: message.to_owned(),
            }),
            FakeReply::Stall(delay) => {
                tokio::time::sleep(delay).await;
                Ok(InstantQueryResult {
                    data: QueryData::Vector(Vec::new()),
                    warnings: Vec::new(),
                })
            }
        }
    }
}

/// Vector element with the given labels, value text and unix seconds.
pub(crate) fn element(labels: &[(&str, &str)], value: &str, secs: i64) -> VectorElement {
    let metric: BTreeMap<String, String> = labels
        .iter()
        .map(|(key, label)| ((*key).to_owned(), (*label).to_owned()))
        .collect();
    VectorElement {
        metric,
        value: Some(SamplePair(serde_json::Number::from(secs), value.to_owned())),
        histogram: None,
    }
}

/// Native histogram element with the given labels and no float value.
pub(crate) fn histogram_element(labels: &[(&str, &str)], secs: i64) -> VectorElement {
    VectorElement {
        metric: labels
            .iter()
            .map(|(key, label)| ((*key).to_owned(), (*label).to_owned()))
            .collect(),
        value: None,
        histogram: Some(serde_json::json!([secs, {"count": "3", "sum": "1.5"}])),
    }
}
