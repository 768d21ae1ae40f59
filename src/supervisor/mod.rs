//! Optional supervision of the local node exporter and Prometheus binaries.
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::{Child, Command};

use crate::error::SupervisorError;
use crate::query::PrometheusClient;


/// Interval between readiness checks.
pub const READY_POLL_INTERVAL: Duration = Duration::from_millis(500);
/// Grace period between SIGINT and a hard kill.
pub const STOP_GRACE_PERIOD: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    pub name: String,
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl ProcessSpec {
    #[must_use]
    pub fn new(name: &str, program: PathBuf) -> Self {
        Self {
            name: name.to_owned(),
            program,
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: String) -> Self {
        self.args.push(arg);
        self
    }
}

/// Something that reports whether the supervised stack can serve queries.
#[async_trait]
pub trait ReadinessCheck: Send + Sync {
    async fn ready(&self) -> bool;
}

#[async_trait]
impl ReadinessCheck for PrometheusClient {
    async fn ready(&self) -> bool {
        PrometheusClient::ready(self).await
    }
}

#[derive(Debug)]
struct ManagedChild {
    name: String,
    child: Child,
}

/// Owns the spawned children. Dropping it kills every child still running.
#[derive(Debug)]
pub struct Supervisor {
    children: Vec<ManagedChild>,
}

impl Supervisor {
    /// Spawns every process in order.
    ///
    /// # Errors
    ///
    /// Returns [`SupervisorError::Spawn`] for the first process that fails to
    /// start; children spawned before it are killed.
    pub fn start(specs: &[ProcessSpec]) -> Result<Self, SupervisorError> {
        let mut children = Vec::with_capacity(specs.len());
        for spec in specs {
            let child = Command::new(&spec.program)
                .args(&spec.args)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .kill_on_drop(true)
                .spawn()
                .map_err(|source| SupervisorError::Spawn {
                    name: spec.name.clone(),
                    program: spec.program.clone(),
                    source,
                })?;
            tracing::info!(
                "Started {} ({}) pid={}",
                spec.name,
                spec.program.display(),
                child.id().unwrap_or_default()
            );
            children.push(ManagedChild {
                name: spec.name.clone(),
                child,
            });
        }
        Ok(Self { children })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Polls `check` until it reports ready or `timeout` elapses.
    ///
    /// # Errors
    ///
    /// Returns [`SupervisorError::ExitedEarly`] when a child exits while
    /// waiting, [`SupervisorError::Poll`] when its status cannot be read and
    /// [`SupervisorError::NotReady`] on timeout.
    pub async fn wait_ready<P>(&mut self, check: &P, timeout: Duration) -> Result<(), SupervisorError>
    where
        P: ReadinessCheck + ?Sized,
    {
        let wait = async {
            loop {
                self.check_running()?;
                if check.ready().await {
                    return Ok::<(), SupervisorError>(());
                }
                tokio::time::sleep(READY_POLL_INTERVAL).await;
            }
        };
        tokio::time::timeout(timeout, wait)
            .await
            .map_err(|_elapsed| SupervisorError::NotReady { timeout })?
    }

    fn check_running(&mut self) -> Result<(), SupervisorError> {
        for managed in &mut self.children {
            let status = managed
                .child
                .try_wait()
                .map_err(|source| SupervisorError::Poll {
                    name: managed.name.clone(),
                    source,
                })?;
            if let Some(status) = status {
                return Err(SupervisorError::ExitedEarly {
                    name: managed.name.clone(),
                    status: status.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Interrupts every child in reverse start order, killing those that do
    /// not exit within [`STOP_GRACE_PERIOD`].
    pub async fn shutdown(self) {
        self.shutdown_with_grace(STOP_GRACE_PERIOD).await;
    }

    pub(crate) async fn shutdown_with_grace(mut self, grace: Duration) {
        while let Some(mut managed) = self.children.pop() {
            interrupt(&managed.child);
            match tokio::time::timeout(grace, managed.child.wait()).await {
                Ok(Ok(status)) => tracing::info!("{} exited: {}", managed.name, status),
                Ok(Err(err)) => tracing::warn!("Failed to wait for {}: {}", managed.name, err),
                Err(_elapsed) => {
                    tracing::warn!(
                        "{} did not stop within {}ms; killing",
                        managed.name,
                        grace.as_millis()
                    );
                    if let Err(err) = managed.child.kill().await {
                        tracing::warn!("Failed to kill {}: {}", managed.name, err);
                    }
                }
            }
        }
    }
}

#[cfg(unix)]
fn interrupt(child: &Child) {
    let Some(pid) = child.id().and_then(|id| libc::pid_t::try_from(id).ok()) else {
        return;
    };
    // Safety: `pid` belongs to a child we spawned and have not yet reaped.
    let rc = unsafe { libc::kill(pid, libc::SIGINT) };
    if rc != 0 {
        tracing::warn!(
            "Failed to interrupt pid {}: {}",
            pid,
            std::io::Error::last_os_error()
        );
    }
}

#[cfg(not(unix))]
fn interrupt(_child: &Child) {}
