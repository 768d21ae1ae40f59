use crate::error::QueryError;
use crate::model::MetricSample;
use crate::query::{SamplePair, VectorElement, parse_timestamp};

/// One sample per float element, in emission order. Native histogram series
/// are skipped with a warning. A single bad element fails the whole
/// expression.
pub(crate) fn samples_from_vector(
    expression: &str,
    elements: Vec<VectorElement>,
) -> Result<Vec<MetricSample>, QueryError> {
    elements
        .into_iter()
        .filter_map(|element| sample_from_element(expression, element).transpose())
        .collect()
}

fn sample_from_element(
    expression: &str,
    element: VectorElement,
) -> Result<Option<MetricSample>, QueryError> {
    let VectorElement {
        metric,
        value,
        histogram,
    } = element;
    let Some(SamplePair(raw_timestamp, raw_value)) = value else {
        if histogram.is_some() {
            tracing::warn!(
                "Skipping native histogram series of '{}': {:?}",
                expression,
                metric
            );
            return Ok(None);
        }
        return Err(QueryError::MalformedResult {
            expression: expression.to_owned(),
            reason: "vector element has neither value nor histogram".to_owned(),
        });
    };
    let timestamp = parse_timestamp(&raw_timestamp).ok_or_else(|| QueryError::MalformedResult {
        expression: expression.to_owned(),
        reason: format!("invalid sample timestamp '{}'", raw_timestamp),
    })?;
    let value = raw_value
        .parse::<f64>()
        .map_err(|err| QueryError::MalformedResult {
            expression: expression.to_owned(),
            reason: format!("invalid sample value '{}': {}", raw_value, err),
        })?;
    Ok(Some(MetricSample::from_labels(metric, value, timestamp)))
}
