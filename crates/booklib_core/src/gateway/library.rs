//! Per-call execution of caller SQL against the books store.

use crate::config::GatewayConfig;
use crate::db::open_db_with_timeout;
use crate::db::schema::DEFAULT_SELECT_SQL;
use crate::gateway::GatewayResult;
use crate::model::cell::{read_row, Row};
use log::{debug, error, info};
use rusqlite::{Batch, Connection, Statement};
use std::fmt::{Display, Formatter};
use std::ops::{Deref, DerefMut};
use std::time::Instant;

/// The four operations exposed by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOp {
    AddBook,
    GetBooks,
    DeleteBook,
    UpdateBook,
}

impl GatewayOp {
    pub const ALL: [GatewayOp; 4] = [
        GatewayOp::AddBook,
        GatewayOp::GetBooks,
        GatewayOp::DeleteBook,
        GatewayOp::UpdateBook,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::AddBook => "add_book",
            Self::GetBooks => "get_books",
            Self::DeleteBook => "delete_book",
            Self::UpdateBook => "update_book",
        }
    }

    /// Mutations commit their statement; reads roll back data changes.
    pub fn is_mutation(self) -> bool {
        !matches!(self, Self::GetBooks)
    }
}

/// Stateless gateway over the on-disk books store.
///
/// Each operation opens a fresh connection, ensures the schema, executes the
/// caller text exactly once in autocommit and closes the connection before
/// returning.
/// The text is not inspected: `add_book` runs whatever statement it is given.
#[derive(Debug, Clone)]
pub struct LibraryGateway {
    config: GatewayConfig,
}

impl LibraryGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Runs an `INSERT` (or any statement) and commits it.
    ///
    /// Returns `Ok(false)` when the engine rejects the statement.
    pub fn add_book(&self, query: &str) -> GatewayResult<bool> {
        self.mutate(GatewayOp::AddBook, query)
    }

    /// Runs a `SELECT` and returns every row in engine order.
    ///
    /// `None` reads the whole table. Returns `Ok(vec![])` when the engine
    /// rejects the statement, which callers cannot tell apart from no match.
    /// `INSERT`, `UPDATE`, `DELETE` and `REPLACE` run in a transaction that is
    /// rolled back; any other statement runs in autocommit.
    pub fn get_books(&self, query: Option<&str>) -> GatewayResult<Vec<Row>> {
        let op = GatewayOp::GetBooks;
        let query = query.unwrap_or(DEFAULT_SELECT_SQL);
        let started_at = Instant::now();
        let mut conn = self.connect(op)?;

        match read_rows(&mut conn, query) {
            Ok(rows) => {
                debug!(
                    "event=gateway_call module=gateway status=ok op={} rows={} duration_ms={}",
                    op.name(),
                    rows.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(rows)
            }
            Err(err) => {
                log_statement_error(op, started_at, &err);
                Ok(Vec::new())
            }
        }
    }

    /// Runs a `DELETE` (or any statement) and commits it.
    ///
    /// A delete matching zero rows still succeeds.
    pub fn delete_book(&self, query: &str) -> GatewayResult<bool> {
        self.mutate(GatewayOp::DeleteBook, query)
    }

    /// Runs an `UPDATE` (or any statement) and commits it.
    pub fn update_book(&self, query: &str) -> GatewayResult<bool> {
        self.mutate(GatewayOp::UpdateBook, query)
    }

    fn mutate(&self, op: GatewayOp, query: &str) -> GatewayResult<bool> {
        let started_at = Instant::now();
        let conn = self.connect(op)?;

        match execute_and_commit(&conn, query) {
            Ok(changes) => {
                debug!(
                    "event=gateway_call module=gateway status=ok op={} changes={} duration_ms={}",
                    op.name(),
                    changes,
                    started_at.elapsed().as_millis()
                );
                Ok(true)
            }
            Err(err) => {
                log_statement_error(op, started_at, &err);
                Ok(false)
            }
        }
    }

    fn connect(&self, op: GatewayOp) -> GatewayResult<CallConnection> {
        let conn = open_db_with_timeout(&self.config.db_path, self.config.busy_timeout)?;
        Ok(CallConnection {
            conn,
            op,
            opened_at: Instant::now(),
        })
    }
}

/// Connection scoped to one gateway call; closed when dropped.
struct CallConnection {
    conn: Connection,
    op: GatewayOp,
    opened_at: Instant,
}

impl Deref for CallConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl DerefMut for CallConnection {
    fn deref_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

impl Drop for CallConnection {
    fn drop(&mut self) {
        debug!(
            "event=db_close module=gateway status=ok op={} held_ms={}",
            self.op.name(),
            self.opened_at.elapsed().as_millis()
        );
    }
}

/// Engine-side failure of one caller statement; never leaves this module.
#[derive(Debug)]
enum StatementError {
    Sqlite(rusqlite::Error),
    MultipleStatements,
}

impl Display for StatementError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::MultipleStatements => write!(f, "only one statement can be executed at a time"),
        }
    }
}

impl From<rusqlite::Error> for StatementError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

// Blank or comment-only text prepares to `None` and runs as a no-op.
fn prepare_single<'conn>(
    conn: &'conn Connection,
    query: &str,
) -> Result<Option<Statement<'conn>>, StatementError> {
    let mut batch = Batch::new(conn, query);
    let first = batch.next()?;
    if first.is_some() && batch.next()?.is_some() {
        return Err(StatementError::MultipleStatements);
    }
    Ok(first)
}

// Autocommit: a single statement commits as soon as it finishes stepping.
fn execute_and_commit(conn: &Connection, query: &str) -> Result<usize, StatementError> {
    if let Some(mut stmt) = prepare_single(conn, query)? {
        let mut rows = stmt.query([])?;
        // Rows from a non-mutating statement are stepped through and discarded.
        while rows.next()?.is_some() {}
    }
    Ok(usize::try_from(conn.changes()).unwrap_or(usize::MAX))
}

fn read_rows(conn: &mut Connection, query: &str) -> Result<Vec<Row>, StatementError> {
    if !is_dml(query) {
        return collect_rows(conn, query);
    }
    let tx = conn.transaction()?;
    let rows = collect_rows(&tx, query);
    // Dropping the transaction rolls back the data change.
    drop(tx);
    rows
}

fn collect_rows(conn: &Connection, query: &str) -> Result<Vec<Row>, StatementError> {
    let mut collected = Vec::new();
    if let Some(mut stmt) = prepare_single(conn, query)? {
        let column_count = stmt.column_count();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            collected.push(read_row(row, column_count)?);
        }
    }
    Ok(collected)
}

const DML_KEYWORDS: [&str; 4] = ["INSERT", "UPDATE", "DELETE", "REPLACE"];

/// True when the first keyword, after whitespace and comments, is a data change.
fn is_dml(query: &str) -> bool {
    let keyword: String = skip_leading_trivia(query)
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    DML_KEYWORDS
        .iter()
        .any(|dml| keyword.eq_ignore_ascii_case(dml))
}

fn skip_leading_trivia(mut text: &str) -> &str {
    loop {
        text = text.trim_start();
        if let Some(rest) = text.strip_prefix("--") {
            text = rest.split_once('\n').map_or("", |(_, after)| after);
        } else if let Some(rest) = text.strip_prefix("/*") {
            text = rest.split_once("*/").map_or("", |(_, after)| after);
        } else {
            return text;
        }
    }
}

fn log_statement_error(op: GatewayOp, started_at: Instant, err: &StatementError) {
    error!(
        "event=gateway_call module=gateway status=error op={} duration_ms={} error={}",
        op.name(),
        started_at.elapsed().as_millis(),
        err
    );
    info!(
        "event=gateway_call module=gateway status=collapsed op={} result={}",
        op.name(),
        if op.is_mutation() { "false" } else { "[]" }
    );
}

#[cfg(test)]
mod tests {
    use super::{is_dml, GatewayOp, LibraryGateway};
    use crate::config::GatewayConfig;

    fn gateway(dir: &tempfile::TempDir) -> LibraryGateway {
        LibraryGateway::new(GatewayConfig::new(dir.path().join("library.db")))
    }

    #[test]
    fn op_names_match_registered_tools() {
        let names: Vec<&str> = GatewayOp::ALL.iter().map(|op| op.name()).collect();
        assert_eq!(names, ["add_book", "get_books", "delete_book", "update_book"]);
        assert!(!GatewayOp::GetBooks.is_mutation());
        assert!(GatewayOp::AddBook.is_mutation());
    }

    #[test]
    fn dml_detection_skips_comments_and_ignores_case() {
        assert!(is_dml("delete from books"));
        assert!(is_dml("  -- clean up\n  /* all */ DELETE FROM books"));
        assert!(is_dml("Replace INTO books VALUES (1, 'a', 'b', 1, 'c')"));
        assert!(!is_dml("SELECT * FROM books"));
        assert!(!is_dml("CREATE TABLE shelf (id INTEGER)"));
        assert!(!is_dml("WITH gone AS (SELECT 1) DELETE FROM books"));
        assert!(!is_dml("INSERTED"));
        assert!(!is_dml("-- only a comment"));
        assert!(!is_dml(""));
    }

    #[test]
    fn select_passed_to_mutation_runs_and_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = gateway(&dir);
        gateway
            .add_book("INSERT INTO books (title, author, year, genre) VALUES ('a', 'b', 1, 'c')")
            .unwrap();

        assert!(gateway.add_book("SELECT * FROM books").unwrap());
    }

    #[test]
    fn multiple_statements_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = gateway(&dir);

        let ok = gateway
            .add_book(
                "INSERT INTO books (title, author, year, genre) VALUES ('a', 'b', 1, 'c'); \
                 DELETE FROM books",
            )
            .unwrap();
        assert!(!ok);
        assert!(gateway.get_books(None).unwrap().is_empty());
    }
}
