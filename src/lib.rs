//! Core library for the `promingest` telemetry agent.
//!
//! A session loads a catalog of PromQL expressions, evaluates each one as an
//! instant query against the Prometheus HTTP API, normalizes the returned
//! vector samples and stores the whole batch in SQLite in one transaction.
//! The binary adds CLI and config handling, optional supervision of the local
//! exporter stack and signal-driven shutdown.
pub mod args;
pub mod catalog;
pub mod collector;
pub mod config;
pub mod error;
pub mod model;
pub mod query;
pub mod session;
pub mod store;
pub mod supervisor;

mod entry;
mod shutdown;
mod system;

pub use entry::run;
