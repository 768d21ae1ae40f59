use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::collector::{EvalInstant, FailurePolicy};

use super::defaults::{
    DEFAULT_CATALOG_PATH, DEFAULT_COLLECT_TIMEOUT, DEFAULT_DB_URL, DEFAULT_NODE_EXPORTER_BIN,
    DEFAULT_PROMETHEUS_BIN, DEFAULT_PROMETHEUS_CONFIG, DEFAULT_PROMETHEUS_URL,
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_STARTUP_TIMEOUT, DEFAULT_WRITE_TIMEOUT,
};
use super::parsers::{parse_duration_arg, parse_non_empty};

#[derive(Debug, Subcommand, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create the metrics table and exit
    InitDb,
}

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Telemetry collection agent - queries Prometheus for a catalog of expressions and stores every sample in SQLite within one transaction."
)]
pub struct AgentArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to config file (TOML or JSON)
    #[arg(long = "config", short = 'c')]
    pub config: Option<String>,

    /// File listing one PromQL expression per line
    #[arg(long = "catalog", default_value = DEFAULT_CATALOG_PATH)]
    pub catalog: PathBuf,

    /// Base URL of the Prometheus server
    #[arg(
        long = "prometheus-url",
        short = 'p',
        env = "PROMINGEST_PROMETHEUS_URL",
        default_value = DEFAULT_PROMETHEUS_URL,
        value_parser = parse_non_empty
    )]
    pub prometheus_url: String,

    /// SQLite database path (`:memory:` for a throwaway store)
    #[arg(
        long = "db-url",
        env = "PROMINGEST_DB_URL",
        default_value = DEFAULT_DB_URL,
        value_parser = parse_non_empty
    )]
    pub db_url: String,

    /// Create the metrics table before collecting
    #[arg(long = "init-schema")]
    pub init_schema: bool,

    /// Deadline for the whole collection phase (supports ms/s/m/h)
    #[arg(long = "collect-timeout", default_value = DEFAULT_COLLECT_TIMEOUT, value_parser = parse_duration_arg)]
    pub collect_timeout: Duration,

    /// Per-request HTTP timeout (supports ms/s/m/h)
    #[arg(long = "request-timeout", default_value = DEFAULT_REQUEST_TIMEOUT, value_parser = parse_duration_arg)]
    pub request_timeout: Duration,

    /// Deadline for the ingestion transaction (supports ms/s/m/h)
    #[arg(long = "write-timeout", default_value = DEFAULT_WRITE_TIMEOUT, value_parser = parse_duration_arg)]
    pub write_timeout: Duration,

    /// Evaluation instant shared by the session or taken per query
    #[arg(long = "eval-instant", value_enum, default_value_t = EvalInstant::Session)]
    pub eval_instant: EvalInstant,

    /// Abort on the first failed query or skip it and continue
    #[arg(long = "on-query-error", value_enum, default_value_t = FailurePolicy::FailFast)]
    pub on_query_error: FailurePolicy,

    /// Spawn node exporter and Prometheus before collecting
    #[arg(long = "supervise")]
    pub supervise: bool,

    /// Node exporter binary used with --supervise
    #[arg(long = "node-exporter-bin", default_value = DEFAULT_NODE_EXPORTER_BIN)]
    pub node_exporter_bin: PathBuf,

    /// Prometheus binary used with --supervise
    #[arg(long = "prometheus-bin", default_value = DEFAULT_PROMETHEUS_BIN)]
    pub prometheus_bin: PathBuf,

    /// Prometheus configuration passed as --config.file
    #[arg(long = "prometheus-config", default_value = DEFAULT_PROMETHEUS_CONFIG)]
    pub prometheus_config: PathBuf,

    /// How long to wait for Prometheus readiness (supports ms/s/m/h)
    #[arg(long = "startup-timeout", default_value = DEFAULT_STARTUP_TIMEOUT, value_parser = parse_duration_arg)]
    pub startup_timeout: Duration,

    /// Exit after ingestion instead of waiting for Ctrl+C
    #[arg(long = "once")]
    pub once: bool,

    /// Enable debug logging
    #[arg(long = "verbose", short = 'v')]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,
}
