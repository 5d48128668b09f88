//! SQLite collection event store utilities.
//!
//! Runtime defaults:
//! - `journal_mode = WAL` so the agenda can read while the intake side appends
//! - `busy_timeout = 5s` to ride out transient writer locks
//! - `foreign_keys = ON` to keep requisitions linked to real establishments

pub mod migrations;
pub mod query;
pub mod schema;

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Busy timeout used for store connections.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open (or create) the event store, apply runtime pragmas, and migrate the
/// schema to the latest version.
///
/// # Errors
///
/// Returns an error if opening/configuring/migrating the database fails.
pub fn open_store(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create store directory {}", parent.display()))?;
    }

    let mut conn =
        Connection::open(path).with_context(|| format!("open event store {}", path.display()))?;

    configure_connection(&conn).context("configure sqlite pragmas")?;
    migrations::migrate(&mut conn).context("apply store migrations")?;

    Ok(conn)
}

/// Why an existing store could not be opened for reading.
#[derive(Debug, thiserror::Error)]
pub enum StoreOpenError {
    #[error("event store {} does not exist", path.display())]
    Missing { path: PathBuf },

    #[error("event store {} could not be read", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error(
        "event store {} has schema version {found}, this build reads version {expected}",
        path.display()
    )]
    SchemaMismatch {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
}

/// Open an existing store read-only.
///
/// Never creates, configures, or migrates the file. A store whose schema
/// version differs from [`migrations::LATEST_SCHEMA_VERSION`] is rejected.
///
/// # Errors
///
/// Returns [`StoreOpenError`] when the file is missing, is not a readable
/// store, or carries another schema version.
pub fn open_store_read_only(path: &Path) -> Result<Connection, StoreOpenError> {
    if !path.exists() {
        return Err(StoreOpenError::Missing {
            path: path.to_path_buf(),
        });
    }

    let unreadable = |source| StoreOpenError::Unreadable {
        path: path.to_path_buf(),
        source,
    };
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(unreadable)?;
    conn.busy_timeout(DEFAULT_BUSY_TIMEOUT).map_err(unreadable)?;

    let found = migrations::current_schema_version(&conn).map_err(unreadable)?;
    if found != migrations::LATEST_SCHEMA_VERSION {
        tracing::warn!(path = %path.display(), found, "event store schema version mismatch");
        return Err(StoreOpenError::SchemaMismatch {
            path: path.to_path_buf(),
            found,
            expected: migrations::LATEST_SCHEMA_VERSION,
        });
    }

    Ok(conn)
}

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    let _journal_mode: String =
        conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_BUSY_TIMEOUT, StoreOpenError, open_store, open_store_read_only};
    use std::path::Path;
    use crate::db::migrations;
    use tempfile::TempDir;

    fn temp_db_path() -> (TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(".coleta/coleta.db");
        (dir, path)
    }

    #[test]
    fn open_store_sets_wal_busy_timeout_and_fk() {
        let (_dir, path) = temp_db_path();
        let conn = open_store(&path).expect("open store");

        let journal_mode: String = conn
            .pragma_query_value(None, "journal_mode", |row| row.get(0))
            .expect("query journal_mode");
        assert_eq!(journal_mode.to_ascii_lowercase(), "wal");

        let busy_timeout_ms: u64 = conn
            .pragma_query_value(None, "busy_timeout", |row| row.get(0))
            .expect("query busy_timeout");
        assert_eq!(
            u128::from(busy_timeout_ms),
            DEFAULT_BUSY_TIMEOUT.as_millis()
        );

        let foreign_keys: i64 = conn
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .expect("query foreign_keys");
        assert_eq!(foreign_keys, 1);
    }

    #[test]
    fn open_store_runs_migrations() {
        let (_dir, path) = temp_db_path();
        let conn = open_store(&path).expect("open store");

        let version = migrations::current_schema_version(&conn).expect("schema version query");
        assert_eq!(version, migrations::LATEST_SCHEMA_VERSION);
    }

    #[test]
    fn read_only_open_reports_missing_file() {
        let (_dir, path) = temp_db_path();
        let err = open_store_read_only(&path).expect_err("missing");
        assert!(matches!(err, StoreOpenError::Missing { .. }));
        assert!(!path.exists());
        assert!(!path.parent().is_some_and(Path::exists));
    }

    #[test]
    fn read_only_open_reports_corrupt_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("corrupt.db");
        std::fs::write(&path, b"this is not a sqlite database").expect("write");

        let err = open_store_read_only(&path).expect_err("corrupt");
        assert!(matches!(err, StoreOpenError::Unreadable { .. }));
    }

    #[test]
    fn read_only_connection_rejects_writes() {
        let (_dir, path) = temp_db_path();
        drop(open_store(&path).expect("create"));

        let conn = open_store_read_only(&path).expect("open read-only");
        let insert = conn.execute(
            "INSERT INTO requisitions (submitted_at_us, category) VALUES (1, 'AGUA')",
            [],
        );
        assert!(insert.is_err());
    }

    #[test]
    fn read_only_open_does_not_migrate_older_stores() {
        let (_dir, path) = temp_db_path();
        {
            let conn = open_store(&path).expect("create");
            conn.pragma_update(None, "user_version", 1_i64).expect("downgrade");
        }

        let err = open_store_read_only(&path).expect_err("older schema");
        assert!(matches!(
            err,
            StoreOpenError::SchemaMismatch {
                found: 1,
                expected: migrations::LATEST_SCHEMA_VERSION,
                ..
            }
        ));

        let conn = rusqlite::Connection::open(&path).expect("reopen");
        assert_eq!(migrations::current_schema_version(&conn).expect("version"), 1);
    }
}
