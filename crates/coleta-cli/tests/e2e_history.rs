//! E2E tests for `coleta init`, `history`, `show` and `completions`.

use assert_cmd::Command;
use predicates::prelude::*;
use rusqlite::{Connection, params};
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn coleta_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("coleta"));
    cmd.current_dir(dir);
    cmd.env("COLETA_LOG", "error");
    cmd.env("XDG_CONFIG_HOME", dir.join("xdg"));
    cmd.env_remove("FORMAT");
    cmd
}

fn seeded_project() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    coleta_cmd(dir.path()).args(["init"]).assert().success();

    let conn = Connection::open(dir.path().join(".coleta/coleta.db")).expect("open store");
    conn.execute_batch(
        "INSERT INTO establishments (establishment_id, name, tax_id, inspection_id)
            VALUES (1, 'Laticínio Serra', '12.345.678/0001-90', 'SIM 042');
         INSERT INTO analysis_parameters (parameter_id, name, kind, application) VALUES
            (1, 'Coliformes totais', 'MICROBIOLOGICA', 'PRODUTO'),
            (2, 'pH', 'FISICO-QUIMICA', 'PRODUTO');",
    )
    .expect("seed reference data");

    for (us, date) in [(1_000_i64, "2024-04-01"), (2_000, "2024-05-01"), (3_000, "2024-06-01")] {
        conn.execute(
            "INSERT INTO requisitions (
                submitted_at_us, establishment_id, category, product_name,
                collection_date, batch, frequency_days
             ) VALUES (?1, 1, 'PRODUTO', 'Queijo Minas', ?2, 'L-88', 30)",
            params![us, date],
        )
        .expect("insert requisition");
    }
    conn.execute(
        "INSERT INTO requisition_analyses (requisition_id, parameter_id) VALUES (3, 2), (3, 1)",
        [],
    )
    .expect("link analyses");
    dir
}

#[test]
fn init_creates_project_and_reports_store() {
    let dir = TempDir::new().expect("temp dir");
    let output = coleta_cmd(dir.path())
        .args(["init", "--json"])
        .output()
        .expect("init should not crash");
    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(report["schema_version"], 2);
    assert!(dir.path().join(".coleta/config.toml").is_file());
    assert!(dir.path().join(".coleta/coleta.db").is_file());

    coleta_cmd(dir.path())
        .args(["init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn history_lists_newest_first() {
    let dir = seeded_project();
    let output = coleta_cmd(dir.path())
        .args(["history", "--json"])
        .output()
        .expect("history should not crash");
    assert!(output.status.success());
    let rows: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let ids: Vec<i64> = rows
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|r| r["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

#[test]
fn history_limit_applies() {
    let dir = seeded_project();
    coleta_cmd(dir.path())
        .args(["history", "-n", "1", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ID  SUBMITTED  CATEGORY"))
        .stdout(predicate::str::contains("01/06/2024"))
        .stdout(predicate::str::contains("01/05/2024").not());
}

#[test]
fn show_includes_analyses_grouped_by_kind() {
    let dir = seeded_project();
    let output = coleta_cmd(dir.path())
        .args(["show", "3", "--json"])
        .output()
        .expect("show should not crash");
    assert!(output.status.success());
    let detail: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(detail["id"], 3);
    assert_eq!(detail["establishment"]["inspection_id"], "SIM 042");
    assert_eq!(detail["batch"], "L-88");
    assert_eq!(detail["analyses"].as_array().map(Vec::len), Some(2));

    coleta_cmd(dir.path())
        .args(["show", "3", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Requisição #3"))
        .stdout(predicate::str::contains("Análises MICROBIOLÓGICAS"))
        .stdout(predicate::str::contains("Análises FÍSICO-QUÍMICAS"));
}

#[test]
fn show_unknown_requisition_fails_with_code() {
    let dir = seeded_project();
    coleta_cmd(dir.path())
        .args(["show", "99", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E3001"));
}

#[test]
fn completions_generate_for_bash() {
    let dir = TempDir::new().expect("temp dir");
    coleta_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("agenda"));
}

#[test]
fn older_store_is_reported_not_migrated() {
    let dir = seeded_project();
    let store = dir.path().join(".coleta/coleta.db");
    Connection::open(&store)
        .expect("open store")
        .pragma_update(None, "user_version", 1_i64)
        .expect("downgrade");

    coleta_cmd(dir.path())
        .args(["history", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2003"))
        .stderr(predicate::str::contains("init --force"));

    let version: i64 = Connection::open(&store)
        .expect("reopen")
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .expect("user_version");
    assert_eq!(version, 1);

    coleta_cmd(dir.path()).args(["init", "--force"]).assert().success();
    coleta_cmd(dir.path()).args(["history", "--json"]).assert().success();
}

#[test]
fn reads_follow_a_custom_store_path_after_reinit() {
    let dir = seeded_project();
    std::fs::write(
        dir.path().join(".coleta/config.toml"),
        "[store]\npath = \"outro/coleta.db\"\n",
    )
    .expect("write config");

    coleta_cmd(dir.path()).args(["init", "--force"]).assert().success();
    assert!(dir.path().join("outro/coleta.db").is_file());

    let output = coleta_cmd(dir.path())
        .args(["history", "--json"])
        .output()
        .expect("history should not crash");
    assert!(output.status.success());
    let rows: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(rows, serde_json::json!([]));
}
