use std::time::Duration;

use serde::Deserialize;

use crate::collector::{EvalInstant, FailurePolicy};
use crate::error::ConfigError;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub catalog: Option<String>,
    pub prometheus_url: Option<String>,
    pub collect_timeout: Option<DurationValue>,
    pub request_timeout: Option<DurationValue>,
    pub eval_instant: Option<EvalInstant>,
    pub on_query_error: Option<FailurePolicy>,
    pub once: Option<bool>,
    pub database: Option<DatabaseConfig>,
    pub supervisor: Option<SupervisorConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub write_timeout: Option<DurationValue>,
    pub init_schema: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SupervisorConfig {
    pub enabled: Option<bool>,
    pub node_exporter_bin: Option<String>,
    pub prometheus_bin: Option<String>,
    pub prometheus_config: Option<String>,
    pub startup_timeout: Option<DurationValue>,
}

/// Integer seconds or a string with a unit suffix.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ConfigError> {
        match self {
            DurationValue::Seconds(secs) => {
                if *secs == 0 {
                    Err(ConfigError::DurationZero)
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            DurationValue::Text(text) => super::parse_duration_value(text),
        }
    }
}
