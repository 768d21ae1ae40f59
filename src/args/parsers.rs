use std::time::Duration;

use crate::config::parse_duration_value;
use crate::error::{AppError, AppResult};

/// Clap value parser for durations with `ms`, `s`, `m` or `h` suffixes.
pub(crate) fn parse_duration_arg(s: &str) -> AppResult<Duration> {
    parse_duration_value(s).map_err(AppError::config)
}

pub(crate) fn parse_non_empty(s: &str) -> AppResult<String> {
    let value = s.trim();
    if value.is_empty() {
        return Err(AppError::config(crate::error::ConfigError::EmptyValue {
            field: "argument",
        }));
    }
    Ok(value.to_owned())
}
