//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure the lock wait used when another connection holds the store.
//! - Ensure the books schema before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have the `books` table in place.
//! - Callers own the connection; dropping it releases the file handle.

use super::schema::ensure_schema;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Lock wait applied when no explicit timeout is configured.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens the store file with the default busy timeout and ensures the schema.
///
/// # Side effects
/// - Creates the store file when it does not exist yet.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_db_with_timeout(path, DEFAULT_BUSY_TIMEOUT)
}

/// Opens the store file with an explicit busy timeout and ensures the schema.
///
/// # Errors
/// - `DbError::Io` when the parent directory of `path` does not exist.
/// - `DbError::Sqlite` when the file cannot be opened or bootstrapped.
pub fn open_db_with_timeout(path: impl AsRef<Path>, busy_timeout: Duration) -> DbResult<Connection> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!(
        "event=db_open module=db status=start mode=file path={}",
        path.display()
    );

    if let Err(err) = check_parent_dir(path) {
        error!(
            "event=db_open module=db status=error mode=file duration_ms={} error_code=db_path_invalid error={}",
            started_at.elapsed().as_millis(),
            err
        );
        return Err(err);
    }

    let conn = match Connection::open(path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=file duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    finish_open(conn, busy_timeout, "file", started_at)
}

/// Opens an in-memory SQLite database and ensures the schema.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let conn = match Connection::open_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=memory duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    finish_open(conn, DEFAULT_BUSY_TIMEOUT, "memory", started_at)
}

fn finish_open(
    conn: Connection,
    busy_timeout: Duration,
    mode: &str,
    started_at: Instant,
) -> DbResult<Connection> {
    match bootstrap_connection(&conn, busy_timeout) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &Connection, busy_timeout: Duration) -> DbResult<()> {
    conn.busy_timeout(busy_timeout)?;
    ensure_schema(conn)?;
    Ok(())
}

// SQLite reports a missing directory as a generic CANTOPEN; surface the path instead.
fn check_parent_dir(path: &Path) -> DbResult<()> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    match std::fs::metadata(parent) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(DbError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "parent is not a directory",
            ),
        }),
        Err(source) => Err(DbError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{open_db, open_db_in_memory, open_db_with_timeout};
    use crate::db::DbError;
    use std::time::Duration;

    #[test]
    fn open_db_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.db");
        assert!(!path.exists());

        let conn = open_db(&path).unwrap();
        drop(conn);
        assert!(path.exists());
    }

    #[test]
    fn open_db_rejects_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("library.db");

        let err = open_db(&path).unwrap_err();
        assert!(matches!(err, DbError::Io { .. }), "unexpected error: {err}");
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn open_db_with_timeout_applies_schema() {
        let dir = tempfile::tempdir().unwrap();
        let conn = open_db_with_timeout(dir.path().join("t.db"), Duration::from_millis(50)).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM books;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn in_memory_connection_is_bootstrapped() {
        let conn = open_db_in_memory().unwrap();
        conn.execute(
            "INSERT INTO books (title, author, year, genre) VALUES ('a', 'b', 1, 'c');",
            [],
        )
        .unwrap();
    }
}
