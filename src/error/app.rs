use thiserror::Error;

use super::{
    CatalogError, ConfigError, QueryError, SessionError, StoreError, SupervisorError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Query error: {0}")]
    Query(#[from] QueryError),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
    #[error("Supervisor error: {0}")]
    Supervisor(#[from] SupervisorError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    pub fn session<E>(error: E) -> Self
    where
        E: Into<SessionError>,
    {
        error.into().into()
    }
}
