use std::future::Future;
use std::path::Path;
use std::time::Duration;

use super::*;
use crate::collector::FailurePolicy;
use crate::error::{CatalogError, StoreError};
use crate::query::test_support::{FakeQueryApi, FakeReply, element};

const WRITE_TIMEOUT: Duration = Duration::from_secs(5);
const COLLECT_TIMEOUT: Duration = Duration::from_secs(10);

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("runtime build failed: {}", err))?;
    runtime.block_on(future)
}

fn write_catalog(dir: &Path, content: &str) -> Result<PathBuf, String> {
    let path = dir.join("tracked-metrics.txt");
    std::fs::write(&path, content).map_err(|err| format!("write failed: {}", err))?;
    Ok(path)
}

fn options(catalog_path: PathBuf) -> SessionOptions {
    SessionOptions {
        catalog_path,
        collect_timeout: COLLECT_TIMEOUT,
        collect: CollectOptions::default(),
    }
}

async fn ready_store() -> Result<SampleStore, String> {
    let store = SampleStore::open_in_memory(WRITE_TIMEOUT)
        .await
        .map_err(|err| format!("open failed: {}", err))?;
    store
        .init_schema()
        .await
        .map_err(|err| format!("schema failed: {}", err))?;
    Ok(store)
}

async fn stored_rows(store: &SampleStore) -> Result<i64, String> {
    store
        .row_count()
        .await
        .map_err(|err| format!("count failed: {}", err))
}

#[test]
fn session_persists_single_up_sample() -> Result<(), String> {
    run_async_test(async {
        let dir = tempfile::tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let catalog = write_catalog(dir.path(), "up\n")?;
        let api = FakeQueryApi::new().reply(
            "up",
            FakeReply::Vector(vec![element(
                &[("__name__", "up"), ("instance", "localhost:9100")],
                "1",
                1_700_000_000,
            )]),
        );
        let store = ready_store().await?;
        let mut session = SessionOrchestrator::new(options(catalog));

        let report = session
            .run(&api, &store)
            .await
            .map_err(|err| format!("session failed: {}", err))?;

        if report.expressions != 1 || report.collected != 1 || report.persisted != 1 {
            return Err(format!("Unexpected report: {:?}", report));
        }
        if session.state() != SessionState::Done {
            return Err(format!("Unexpected state: {:?}", session.state()));
        }
        let rows = store
            .rows()
            .await
            .map_err(|err| format!("read failed: {}", err))?;
        let [row] = rows.as_slice() else {
            return Err(format!("Expected one row, got {}", rows.len()));
        };
        if row.name != "up" || row.value.to_bits() != 1.0_f64.to_bits() {
            return Err(format!("Unexpected row: {:?}", row));
        }
        if row.labels != r#"{"__name__":"up","instance":"localhost:9100"}"# {
            return Err(format!("Unexpected labels: {}", row.labels));
        }
        if row.timestamp != "2023-11-14T22:13:20.000Z" {
            return Err(format!("Unexpected timestamp: {}", row.timestamp));
        }
        Ok(())
    })
}

#[test]
fn session_aborts_on_scalar_before_ingest() -> Result<(), String> {
    run_async_test(async {
        let dir = tempfile::tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let catalog = write_catalog(dir.path(), "up\nbad_expr\n")?;
        let api = FakeQueryApi::new()
            .reply(
                "up",
                FakeReply::Vector(vec![element(&[("__name__", "up")], "1", 1)]),
            )
            .reply("bad_expr", FakeReply::Scalar);
        let store = ready_store().await?;
        let mut session = SessionOrchestrator::new(options(catalog));

        match session.run(&api, &store).await {
            Err(AppError::Query(QueryError::ResultShape { expression, .. }))
                if expression == "bad_expr" => {}
            Err(err) => return Err(format!("Unexpected error: {}", err)),
            Ok(report) => return Err(format!("Expected failure, got {:?}", report)),
        }
        if session.state() != SessionState::Failed {
            return Err(format!("Unexpected state: {:?}", session.state()));
        }
        if stored_rows(&store).await? != 0 {
            return Err("Expected zero rows".to_owned());
        }
        Ok(())
    })
}

#[test]
fn session_aborts_when_collection_deadline_expires() -> Result<(), String> {
    run_async_test(async {
        let dir = tempfile::tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let catalog = write_catalog(dir.path(), "up\nslow\n")?;
        let api = FakeQueryApi::new()
            .reply(
                "up",
                FakeReply::Vector(vec![element(&[("__name__", "up")], "1", 1)]),
            )
            .reply("slow", FakeReply::Stall(Duration::from_secs(30)));
        let store = ready_store().await?;
        let mut session = SessionOrchestrator::new(SessionOptions {
            collect_timeout: Duration::from_millis(50),
            ..options(catalog)
        });

        match session.run(&api, &store).await {
            Err(AppError::Query(err @ QueryError::DeadlineExceeded { .. }))
                if err.is_transport_error() => {}
            Err(err) => return Err(format!("Unexpected error: {}", err)),
            Ok(report) => return Err(format!("Expected failure, got {:?}", report)),
        }
        if session.state() != SessionState::Failed {
            return Err(format!("Unexpected state: {:?}", session.state()));
        }
        if stored_rows(&store).await? != 0 {
            return Err("Expected zero rows".to_owned());
        }
        Ok(())
    })
}

#[test]
fn session_fails_on_missing_catalog() -> Result<(), String> {
    run_async_test(async {
        let dir = tempfile::tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let api = FakeQueryApi::new();
        let store = ready_store().await?;
        let mut session = SessionOrchestrator::new(options(dir.path().join("missing.txt")));

        match session.run(&api, &store).await {
            Err(AppError::Catalog(CatalogError::Unavailable { .. })) => {}
            Err(err) => return Err(format!("Unexpected error: {}", err)),
            Ok(report) => return Err(format!("Expected failure, got {:?}", report)),
        }
        if !api.calls().is_empty() {
            return Err("No query should run without a catalog".to_owned());
        }
        if session.state() != SessionState::Failed {
            return Err(format!("Unexpected state: {:?}", session.state()));
        }
        Ok(())
    })
}

#[test]
fn session_with_nothing_collected_is_empty_batch() -> Result<(), String> {
    run_async_test(async {
        let dir = tempfile::tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let catalog = write_catalog(dir.path(), "absent\n")?;
        let api = FakeQueryApi::new().reply("absent", FakeReply::Vector(Vec::new()));
        let store = ready_store().await?;
        let mut session = SessionOrchestrator::new(options(catalog));

        match session.run(&api, &store).await {
            Err(AppError::Store(StoreError::EmptyBatch)) => Ok(()),
            Err(err) => Err(format!("Unexpected error: {}", err)),
            Ok(report) => Err(format!("Expected failure, got {:?}", report)),
        }
    })
}

#[test]
fn session_skip_policy_persists_remaining_samples() -> Result<(), String> {
    run_async_test(async {
        let dir = tempfile::tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let catalog = write_catalog(dir.path(), "up\nbad_expr\n")?;
        let api = FakeQueryApi::new()
            .reply(
                "up",
                FakeReply::Vector(vec![element(&[("__name__", "up")], "1", 1)]),
            )
            .reply("bad_expr", FakeReply::Scalar);
        let store = ready_store().await?;
        let mut session = SessionOrchestrator::new(SessionOptions {
            collect: CollectOptions {
                failure_policy: FailurePolicy::Skip,
                ..CollectOptions::default()
            },
            ..options(catalog)
        });

        let report = session
            .run(&api, &store)
            .await
            .map_err(|err| format!("session failed: {}", err))?;
        if report.persisted != 1 || report.skipped.len() != 1 {
            return Err(format!("Unexpected report: {:?}", report));
        }
        if stored_rows(&store).await? != 1 {
            return Err("Expected one row".to_owned());
        }
        Ok(())
    })
}

#[test]
fn session_runs_only_once() -> Result<(), String> {
    run_async_test(async {
        let dir = tempfile::tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let catalog = write_catalog(dir.path(), "up\n")?;
        let api = FakeQueryApi::new().reply(
            "up",
            FakeReply::Vector(vec![element(&[("__name__", "up")], "1", 1)]),
        );
        let store = ready_store().await?;
        let mut session = SessionOrchestrator::new(options(catalog));
        session
            .run(&api, &store)
            .await
            .map_err(|err| format!("first run failed: {}", err))?;

        match session.run(&api, &store).await {
            Err(AppError::Session(SessionError::AlreadyStarted { state: "done" })) => {}
            Err(err) => return Err(format!("Unexpected error: {}", err)),
            Ok(report) => return Err(format!("Expected failure, got {:?}", report)),
        }
        if stored_rows(&store).await? != 1 {
            return Err("Second run must not write".to_owned());
        }
        Ok(())
    })
}
