use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("Failed to start {name} ('{program}'): {source}")]
    Spawn {
        name: String,
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to poll {name}: {source}")]
    Poll {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{name} exited during startup ({status}).")]
    ExitedEarly { name: String, status: String },
    #[error("Prometheus did not report ready within {timeout:?}.")]
    NotReady { timeout: Duration },
}
