//! Normalized sample representation shared by the collector and the store.
mod sample;

pub use sample::{MetricSample, NAME_LABEL, format_timestamp, labels_from_json};
