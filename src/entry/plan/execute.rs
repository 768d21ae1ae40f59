use crate::error::AppResult;
use crate::query::PrometheusClient;
use crate::session::{SessionOrchestrator, SessionReport};
use crate::store::{SampleStore, StoreConfig};
use crate::supervisor::Supervisor;
use crate::system::banner::Console;
use crate::system::shutdown_handlers::{setup_signal_shutdown_handler, shutdown_channel};

use super::types::{AgentPlan, RunPlan, SupervisionPlan};

pub(crate) async fn execute_plan(plan: RunPlan) -> AppResult<()> {
    match plan {
        RunPlan::InitDb { store, no_color } => init_db(&store, Console::new(no_color)).await,
        RunPlan::Agent(agent) => run_agent(agent).await,
    }
}

async fn init_db(config: &StoreConfig, console: Console) -> AppResult<()> {
    let store = SampleStore::open(config).await?;
    store.init_schema().await?;
    console.ok(&format!("Schema ready in {}", config.url));
    Ok(())
}

async fn run_agent(plan: AgentPlan) -> AppResult<()> {
    let console = Console::new(plan.no_color);
    console.banner();

    let client = PrometheusClient::new(&plan.prometheus_url, plan.request_timeout)?;

    let supervisor = match plan.supervision.as_ref() {
        Some(supervision) => Some(start_supervision(console, &client, supervision).await?),
        None => None,
    };

    let report = match collect_and_store(console, &client, &plan).await {
        Ok(report) => report,
        Err(err) => {
            if let Some(supervisor) = supervisor {
                supervisor.shutdown().await;
            }
            return Err(err);
        }
    };
    if !report.skipped.is_empty() {
        console.note(&format!("Skipped {} failed expressions", report.skipped.len()));
    }
    console.persisted(report.persisted);

    if !plan.once {
        console.note("\n⌨  Press Ctrl+C to stop...");
        wait_for_shutdown().await;
        console.stage("Graceful Shutdown...");
    }
    if let Some(supervisor) = supervisor {
        supervisor.shutdown().await;
    }
    Ok(())
}

async fn start_supervision(
    console: Console,
    client: &PrometheusClient,
    supervision: &SupervisionPlan,
) -> AppResult<Supervisor> {
    console.stage("Starting Prometheus Servers...");
    let mut supervisor = Supervisor::start(&supervision.processes)?;
    for process in &supervision.processes {
        console.ok(&format!("{} started", process.name));
    }

    console.note(&format!(
        "\n⏳ Waiting up to {}s for servers to initialize...",
        supervision.startup_timeout.as_secs()
    ));
    if let Err(err) = supervisor
        .wait_ready(client, supervision.startup_timeout)
        .await
    {
        supervisor.shutdown().await;
        return Err(err.into());
    }
    console.ok("Servers ready");
    Ok(supervisor)
}

async fn collect_and_store(
    console: Console,
    client: &PrometheusClient,
    plan: &AgentPlan,
) -> AppResult<SessionReport> {
    let store = SampleStore::open(&plan.store).await?;
    console.ok(&format!("Connected to SQLite at {}", plan.store.url));
    if plan.init_schema {
        store.init_schema().await?;
        console.ok("Schema ready");
    }

    console.stage("Collecting Metrics...");
    let mut session = SessionOrchestrator::new(plan.session.clone());
    let report = session.run(client, &store).await?;
    console.ok(&format!(
        "Collected {} samples from {} expressions",
        report.collected, report.expressions
    ));
    Ok(report)
}

async fn wait_for_shutdown() {
    let (shutdown_tx, mut shutdown_rx) = shutdown_channel();
    let handle = setup_signal_shutdown_handler(&shutdown_tx);
    if let Err(err) = shutdown_rx.recv().await {
        tracing::warn!("Shutdown channel closed: {}", err);
    }
    if let Err(err) = handle.await {
        tracing::warn!("Signal handler task failed: {}", err);
    }
}
