use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Fractional digits kept from a Prometheus timestamp (nanoseconds).
const NANOS_DIGITS: usize = 9;

/// Envelope of every `/api/v1` answer.
#[derive(Debug, Deserialize)]
pub(super) struct ApiResponse {
    pub(super) status: String,
    #[serde(default)]
    pub(super) data: Option<QueryData>,
    #[serde(default, rename = "errorType")]
    pub(super) error_type: Option<String>,
    #[serde(default)]
    pub(super) error: Option<String>,
    #[serde(default)]
    pub(super) warnings: Vec<String>,
}

/// Result of an instant query, tagged by `resultType`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "resultType", content = "result", rename_all = "lowercase")]
pub enum QueryData {
    Vector(Vec<VectorElement>),
    Scalar(serde_json::Value),
    Matrix(serde_json::Value),
    String(serde_json::Value),
}

impl QueryData {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            QueryData::Vector(_) => "vector",
            QueryData::Scalar(_) => "scalar",
            QueryData::Matrix(_) => "matrix",
            QueryData::String(_) => "string",
        }
    }
}

/// One series of a vector result. Float series carry `value`; native
/// histogram series carry `histogram` instead.
#[derive(Debug, Clone, Deserialize)]
pub struct VectorElement {
    #[serde(default)]
    pub metric: BTreeMap<String, String>,
    #[serde(default)]
    pub value: Option<SamplePair>,
    #[serde(default)]
    pub histogram: Option<serde_json::Value>,
}

/// `[<unix seconds>, "<value>"]` as sent by Prometheus.
#[derive(Debug, Clone, Deserialize)]
pub struct SamplePair(pub serde_json::Number, pub String);

/// Converts a Prometheus unix timestamp (seconds with an optional decimal
/// fraction). The number is held as `f64`; the fraction is read from its
/// shortest decimal text, which is exact for millisecond timestamps.
pub(crate) fn parse_timestamp(raw: &serde_json::Number) -> Option<DateTime<Utc>> {
    if let Some(secs) = raw.as_i64() {
        return DateTime::from_timestamp(secs, 0);
    }
    let text = raw.to_string();
    // Pre-epoch fractions would need borrow handling; Prometheus never sends them.
    if text.starts_with('-') {
        return None;
    }
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "0"));
    let secs = whole.parse::<i64>().ok()?;
    if fraction.is_empty() || !fraction.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    let digits: String = fraction.chars().take(NANOS_DIGITS).collect();
    let nanos = format!("{:0<width$}", digits, width = NANOS_DIGITS)
        .parse::<u32>()
        .ok()?;
    DateTime::from_timestamp(secs, nanos)
}
