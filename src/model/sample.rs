use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};

/// Reserved label carrying the metric name.
pub const NAME_LABEL: &str = "__name__";

/// One observed data point.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    pub value: f64,
    /// When Prometheus evaluated the sample, not when it was collected.
    pub timestamp: DateTime<Utc>,
}

impl MetricSample {
    /// Builds a sample from a full label set. The name is taken from
    /// [`NAME_LABEL`] and is empty when the label is absent, as it is for
    /// aggregated expressions.
    #[must_use]
    pub fn from_labels(
        labels: BTreeMap<String, String>,
        value: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let name = labels.get(NAME_LABEL).cloned().unwrap_or_default();
        Self {
            name,
            labels,
            value,
            timestamp,
        }
    }

    /// Labels as a JSON object with keys in sorted order.
    ///
    /// # Errors
    ///
    /// Returns an error when serialization fails.
    pub fn labels_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.labels)
    }
}

/// Parses a label object written by [`MetricSample::labels_json`].
///
/// # Errors
///
/// Returns an error when the text is not a JSON object of strings.
pub fn labels_from_json(text: &str) -> Result<BTreeMap<String, String>, serde_json::Error> {
    serde_json::from_str(text)
}

/// Storage form of a sample timestamp: RFC 3339, millisecond precision, UTC.
#[must_use]
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
