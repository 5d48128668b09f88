//! On-disk store behavior across the read paths.

use coleta_core::db::{StoreOpenError, open_store, open_store_read_only, query};
use coleta_core::model::requisition::AnalysisKind;
use coleta_core::model::Category;
use coleta_core::source::{EventSource, SqliteEventSource};
use rusqlite::params;

fn seeded(dir: &tempfile::TempDir) -> rusqlite::Connection {
    let conn = open_store(&dir.path().join("coleta.db")).expect("open store");
    conn.execute_batch(
        "INSERT INTO establishments (establishment_id, name, tax_id, address)
            VALUES (1, 'Frigorífico Vale', '', 'Rua das Flores, 10'),
                   (2, 'Apiário Sol', NULL, NULL);
         INSERT INTO analysis_parameters (parameter_id, name, kind, application) VALUES
            (5, 'Salmonella', 'MICROBIOLOGICA', 'PRODUTO'),
            (3, 'Umidade', 'FISICO-QUIMICA', 'PRODUTO');",
    )
    .expect("seed reference data");
    for (us, est, product) in [(100_i64, 1_i64, "Salame"), (200, 2, "Mel"), (300, 1, "Salame")] {
        conn.execute(
            "INSERT INTO requisitions (submitted_at_us, establishment_id, category, product_name,
                                       collection_date, frequency_days)
             VALUES (?1, ?2, 'PRODUTO', ?3, '2024-05-01', 30)",
            params![us, est, product],
        )
        .expect("insert requisition");
    }
    conn.execute(
        "INSERT INTO requisition_analyses (requisition_id, parameter_id) VALUES (1, 5), (1, 3)",
        [],
    )
    .expect("link analyses");
    conn
}

#[test]
fn missing_store_is_not_opened() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = open_store_read_only(&dir.path().join("absent.db")).expect_err("missing store");
    assert!(matches!(err, StoreOpenError::Missing { .. }));
    assert!(!dir.path().join("absent.db").exists());
}

#[test]
fn reopening_store_keeps_data_and_version() {
    let dir = tempfile::tempdir().expect("temp dir");
    drop(seeded(&dir));

    let conn = open_store_read_only(&dir.path().join("coleta.db")).expect("store exists");
    assert_eq!(query::store_schema_version(&conn).expect("version"), 2);
    assert_eq!(query::list_requisitions(&conn, None).expect("list").len(), 3);
}

#[test]
fn deleting_an_establishment_unlinks_its_events() {
    let dir = tempfile::tempdir().expect("temp dir");
    let conn = seeded(&dir);
    conn.execute("DELETE FROM establishments WHERE establishment_id = 2", [])
        .expect("delete establishment");

    let events = SqliteEventSource::new(&conn)
        .collection_events()
        .expect("read events");
    let unlinked: Vec<i64> = events
        .iter()
        .filter(|e| e.establishment.is_none())
        .map(|e| e.requisition_id)
        .collect();
    assert_eq!(unlinked, vec![2]);
}

#[test]
fn history_limit_and_order() {
    let dir = tempfile::tempdir().expect("temp dir");
    let conn = seeded(&dir);
    let rows = query::list_requisitions(&conn, Some(2)).expect("list");
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![3, 2]);
    assert_eq!(rows[1].establishment_name.as_deref(), Some("Apiário Sol"));
    assert_eq!(rows[0].category, Category::Product);
}

#[test]
fn detail_carries_profile_and_sorted_analyses() {
    let dir = tempfile::tempdir().expect("temp dir");
    let conn = seeded(&dir);
    let detail = query::get_requisition(&conn, 1)
        .expect("query")
        .expect("requisition exists");

    let est = detail.establishment.as_ref().expect("linked");
    assert_eq!(est.name, "Frigorífico Vale");
    assert_eq!(est.tax_id, None);
    assert_eq!(est.address.as_deref(), Some("Rua das Flores, 10"));

    let names: Vec<&str> = detail.analyses.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Umidade", "Salmonella"]);
    assert_eq!(detail.analyses_of(AnalysisKind::Microbiological).count(), 1);

    assert!(query::get_requisition(&conn, 99).expect("query").is_none());
}

#[test]
fn reading_leaves_the_store_untouched() {
    let dir = tempfile::tempdir().expect("temp dir");
    drop(seeded(&dir));
    let path = dir.path().join("coleta.db");
    let before = std::fs::read(&path).expect("read store bytes");

    {
        let conn = open_store_read_only(&path).expect("open read-only");
        let events = SqliteEventSource::new(&conn)
            .collection_events()
            .expect("read events");
        assert_eq!(events.len(), 3);
        assert!(query::get_requisition(&conn, 1).expect("query").is_some());
    }

    assert_eq!(std::fs::read(&path).expect("read store bytes"), before);
}
