//! Books table definition and idempotent bootstrap.

use crate::db::DbResult;
use rusqlite::Connection;

/// Name of the single table owned by the gateway.
pub const BOOKS_TABLE: &str = "books";

/// Statement used by `get_books` when the caller supplies no query.
pub const DEFAULT_SELECT_SQL: &str = "SELECT * FROM books";

/// Column names in storage order.
pub const BOOK_COLUMNS: [&str; 5] = ["id", "title", "author", "year", "genre"];

// AUTOINCREMENT keeps ids monotonic and prevents reuse after deletes.
const CREATE_BOOKS_SQL: &str = "CREATE TABLE IF NOT EXISTS books (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    author TEXT NOT NULL,
    year INTEGER NOT NULL,
    genre TEXT NOT NULL
);";

/// Creates the `books` table when it does not exist yet.
///
/// Running this against an existing store is a no-op.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(CREATE_BOOKS_SQL)?;
    Ok(())
}
