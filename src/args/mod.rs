//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;


pub use cli::{AgentArgs, Command};
pub use defaults::{
    DEFAULT_CATALOG_PATH, DEFAULT_DB_URL, DEFAULT_NODE_EXPORTER_BIN, DEFAULT_PROMETHEUS_BIN,
    DEFAULT_PROMETHEUS_CONFIG, DEFAULT_PROMETHEUS_URL,
};
