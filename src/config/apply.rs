use std::path::PathBuf;
use std::time::Duration;

use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::AgentArgs;
use crate::error::{AppError, AppResult, ConfigError};

use super::types::{ConfigFile, DatabaseConfig, DurationValue, SupervisorConfig};

/// Applies configuration values to CLI arguments. Values given on the command
/// line or through an environment variable win over the config file.
///
/// # Errors
///
/// Returns an error when a config value is empty or an invalid duration.
pub fn apply_config(
    args: &mut AgentArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_explicit(matches, "catalog")
        && let Some(catalog) = config.catalog.as_deref()
    {
        args.catalog = PathBuf::from(non_empty(catalog, "catalog")?);
    }

    if !is_explicit(matches, "prometheus_url")
        && let Some(url) = config.prometheus_url.as_deref()
    {
        args.prometheus_url = non_empty(url, "prometheus_url")?;
    }

    if !is_explicit(matches, "collect_timeout")
        && let Some(timeout) = config.collect_timeout.as_ref()
    {
        args.collect_timeout = duration(timeout, "collect_timeout")?;
    }

    if !is_explicit(matches, "request_timeout")
        && let Some(timeout) = config.request_timeout.as_ref()
    {
        args.request_timeout = duration(timeout, "request_timeout")?;
    }

    if !is_explicit(matches, "eval_instant")
        && let Some(eval_instant) = config.eval_instant
    {
        args.eval_instant = eval_instant;
    }

    if !is_explicit(matches, "on_query_error")
        && let Some(policy) = config.on_query_error
    {
        args.on_query_error = policy;
    }

    if !is_explicit(matches, "once")
        && let Some(once) = config.once
    {
        args.once = once;
    }

    if let Some(database) = config.database.as_ref() {
        apply_database(args, matches, database)?;
    }

    if let Some(supervisor) = config.supervisor.as_ref() {
        apply_supervisor(args, matches, supervisor)?;
    }

    Ok(())
}

fn apply_database(
    args: &mut AgentArgs,
    matches: &ArgMatches,
    database: &DatabaseConfig,
) -> AppResult<()> {
    if !is_explicit(matches, "db_url")
        && let Some(url) = database.url.as_deref()
    {
        args.db_url = non_empty(url, "database.url")?;
    }

    if !is_explicit(matches, "write_timeout")
        && let Some(timeout) = database.write_timeout.as_ref()
    {
        args.write_timeout = duration(timeout, "database.write_timeout")?;
    }

    if !is_explicit(matches, "init_schema")
        && let Some(init_schema) = database.init_schema
    {
        args.init_schema = init_schema;
    }

    Ok(())
}

fn apply_supervisor(
    args: &mut AgentArgs,
    matches: &ArgMatches,
    supervisor: &SupervisorConfig,
) -> AppResult<()> {
    if !is_explicit(matches, "supervise")
        && let Some(enabled) = supervisor.enabled
    {
        args.supervise = enabled;
    }

    if !is_explicit(matches, "node_exporter_bin")
        && let Some(bin) = supervisor.node_exporter_bin.as_deref()
    {
        args.node_exporter_bin = PathBuf::from(non_empty(bin, "supervisor.node_exporter_bin")?);
    }

    if !is_explicit(matches, "prometheus_bin")
        && let Some(bin) = supervisor.prometheus_bin.as_deref()
    {
        args.prometheus_bin = PathBuf::from(non_empty(bin, "supervisor.prometheus_bin")?);
    }

    if !is_explicit(matches, "prometheus_config")
        && let Some(path) = supervisor.prometheus_config.as_deref()
    {
        args.prometheus_config = PathBuf::from(non_empty(path, "supervisor.prometheus_config")?);
    }

    if !is_explicit(matches, "startup_timeout")
        && let Some(timeout) = supervisor.startup_timeout.as_ref()
    {
        args.startup_timeout = duration(timeout, "supervisor.startup_timeout")?;
    }

    Ok(())
}

fn is_explicit(matches: &ArgMatches, name: &str) -> bool {
    overrides_config(matches.value_source(name))
}

/// Precedence is command line, then environment, then config file, then
/// built-in defaults.
pub(crate) const fn overrides_config(source: Option<ValueSource>) -> bool {
    matches!(
        source,
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

fn non_empty(value: &str, field: &'static str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::config(ConfigError::EmptyValue { field }));
    }
    Ok(value.to_owned())
}

fn duration(value: &DurationValue, field: &'static str) -> AppResult<Duration> {
    value.to_duration().map_err(|err| {
        AppError::config(ConfigError::InvalidField {
            field,
            source: Box::new(err),
        })
    })
}
