mod app;
mod catalog;
mod config;
mod query;
mod session;
mod store;
mod supervisor;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use catalog::CatalogError;
pub use config::ConfigError;
pub use query::QueryError;
pub use session::SessionError;
pub use store::{PersistenceStage, StoreError};
pub use supervisor::SupervisorError;
