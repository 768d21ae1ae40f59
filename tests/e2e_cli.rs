
use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;

use support_prometheus::{
    Reply, count_rows, run_promingest, run_promingest_with_env, scalar_body,
    spawn_prometheus_or_skip, vector_body,
};

const UP_ELEMENTS: &str = concat!(
    r#"{"metric":{"__name__":"up","instance":"localhost:9090","job":"prometheus"},"value":[1700000000,"1"]},"#,
    r#"{"metric":{"__name__":"up","instance":"localhost:9100","job":"node"},"value":[1700000000,"0"]}"#
);

fn prep_paths(catalog: &str) -> Result<(tempfile::TempDir, String, PathBuf), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let catalog_path = dir.path().join("tracked-metrics.txt");
    fs::write(&catalog_path, catalog).map_err(|err| format!("write catalog failed: {}", err))?;
    let db_path = dir.path().join("promingest.db");
    Ok((dir, catalog_path.to_string_lossy().into_owned(), db_path))
}

fn output_text(output: &std::process::Output) -> String {
    format!(
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

#[test]
fn e2e_cli_once_persists_samples() -> Result<(), String> {
    let Some((url, _server)) = spawn_prometheus_or_skip(&[
        ("up", Reply::ok(vector_body(UP_ELEMENTS))),
        ("node_memory_MemFree_bytes", Reply::ok(vector_body(""))),
    ])?
    else {
        return Ok(());
    };
    let (_dir, catalog, db_path) =
        prep_paths("# tracked metrics\nup\n\nnode_memory_MemFree_bytes\n")?;

    let output = run_promingest([
        "--catalog".to_owned(),
        catalog,
        "--prometheus-url".to_owned(),
        url,
        "--db-url".to_owned(),
        db_path.to_string_lossy().into_owned(),
        "--init-schema".to_owned(),
        "--once".to_owned(),
        "--no-color".to_owned(),
    ])?;
    if !output.status.success() {
        return Err(output_text(&output));
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.contains("Successfully imported 2 samples") {
        return Err(output_text(&output));
    }
    if count_rows(&db_path)? != 2 {
        return Err("Expected two rows".to_owned());
    }
    Ok(())
}

#[test]
fn e2e_cli_fails_on_non_vector_result() -> Result<(), String> {
    let Some((url, _server)) = spawn_prometheus_or_skip(&[
        ("up", Reply::ok(vector_body(UP_ELEMENTS))),
        ("bad_expr", Reply::ok(scalar_body())),
    ])?
    else {
        return Ok(());
    };
    let (_dir, catalog, db_path) = prep_paths("up\nbad_expr\n")?;

    let output = run_promingest([
        "--catalog".to_owned(),
        catalog,
        "--prometheus-url".to_owned(),
        url,
        "--db-url".to_owned(),
        db_path.to_string_lossy().into_owned(),
        "--init-schema".to_owned(),
        "--once".to_owned(),
        "--no-color".to_owned(),
    ])?;
    if output.status.success() {
        return Err(format!("Expected failure\n{}", output_text(&output)));
    }
    if !String::from_utf8_lossy(&output.stderr).contains("bad_expr") {
        return Err(format!("Error should name the expression\n{}", output_text(&output)));
    }
    if count_rows(&db_path)? != 0 {
        return Err("Expected zero rows".to_owned());
    }
    Ok(())
}

#[test]
fn e2e_cli_config_file_drives_run() -> Result<(), String> {
    let Some((url, server)) =
        spawn_prometheus_or_skip(&[("up", Reply::ok(vector_body(UP_ELEMENTS)))])?
    else {
        return Ok(());
    };
    let (dir, catalog, db_path) = prep_paths("up\n")?;
    let config_path = dir.path().join("promingest.toml");
    let config = format!(
        "catalog = {:?}\nprometheus_url = {:?}\nonce = true\neval_instant = \"per-query\"\n\n[database]\nurl = {:?}\ninit_schema = true\nwrite_timeout = \"2s\"\n",
        catalog,
        url,
        db_path.to_string_lossy()
    );
    fs::write(&config_path, config).map_err(|err| format!("write config failed: {}", err))?;

    let output = run_promingest([
        "--config".to_owned(),
        config_path.to_string_lossy().into_owned(),
        "--no-color".to_owned(),
    ])?;
    if !output.status.success() {
        return Err(output_text(&output));
    }
    if count_rows(&db_path)? != 2 {
        return Err("Expected two rows".to_owned());
    }
    if server.queries().len() != 1 {
        return Err("Expected one query".to_owned());
    }
    Ok(())
}

#[test]
fn e2e_cli_missing_catalog_fails() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let db_path = dir.path().join("promingest.db");

    let output = run_promingest([
        "--catalog".to_owned(),
        dir.path().join("missing.txt").to_string_lossy().into_owned(),
        "--prometheus-url".to_owned(),
        "http://127.0.0.1:9".to_owned(),
        "--db-url".to_owned(),
        db_path.to_string_lossy().into_owned(),
        "--init-schema".to_owned(),
        "--once".to_owned(),
        "--no-color".to_owned(),
    ])?;
    if output.status.success() {
        return Err(format!("Expected failure\n{}", output_text(&output)));
    }
    if !String::from_utf8_lossy(&output.stderr).contains("missing.txt") {
        return Err(format!("Error should name the catalog\n{}", output_text(&output)));
    }
    Ok(())
}

#[test]
fn e2e_cli_init_db_creates_table() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let db_path = dir.path().join("fresh.db");

    let output = run_promingest([
        "--db-url".to_owned(),
        db_path.to_string_lossy().into_owned(),
        "--no-color".to_owned(),
        "init-db".to_owned(),
    ])?;
    if !output.status.success() {
        return Err(output_text(&output));
    }
    if count_rows(&db_path)? != 0 {
        return Err("Expected an empty metrics table".to_owned());
    }
    Ok(())
}

#[test]
fn e2e_cli_env_overrides_config_file() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let file_db = dir.path().join("from-file.db");
    let env_db = dir.path().join("from-env.db");
    let config_path = dir.path().join("promingest.toml");
    let config = format!("[database]\nurl = {:?}\n", file_db.to_string_lossy());
    fs::write(&config_path, config).map_err(|err| format!("write config failed: {}", err))?;

    let env_url = env_db.to_string_lossy().into_owned();
    let output = run_promingest_with_env(
        [
            "--config".to_owned(),
            config_path.to_string_lossy().into_owned(),
            "--no-color".to_owned(),
            "init-db".to_owned(),
        ],
        &[("PROMINGEST_DB_URL", env_url.as_str())],
    )?;
    if !output.status.success() {
        return Err(output_text(&output));
    }
    if count_rows(&env_db)? != 0 {
        return Err("Expected an empty metrics table in the env database".to_owned());
    }
    if file_db.exists() {
        return Err("Config file url must lose to the environment".to_owned());
    }
    Ok(())
}
