//! Row values produced by arbitrary `SELECT` statements.
//!
//! Caller SQL may project any columns, so rows are kept as dynamically typed
//! SQLite values rather than mapped onto `Book`.

use rusqlite::types::ValueRef;
use serde::{Deserialize, Serialize};
use std::str::Utf8Error;

/// One SQLite value as read from a result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

/// One result tuple, in the column order of the producing statement.
pub type Row = Vec<Cell>;

impl Cell {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

impl TryFrom<ValueRef<'_>> for Cell {
    type Error = Utf8Error;

    /// Fails on TEXT that is not valid UTF-8; SQLite stores it unchecked.
    fn try_from(value: ValueRef<'_>) -> Result<Self, Self::Error> {
        Ok(match value {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(v) => Self::Integer(v),
            ValueRef::Real(v) => Self::Real(v),
            ValueRef::Text(bytes) => Self::Text(std::str::from_utf8(bytes)?.to_string()),
            ValueRef::Blob(bytes) => Self::Blob(bytes.to_vec()),
        })
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Reads every column of a result row into owned cells.
///
/// A single undecodable TEXT value fails the whole row.
pub fn read_row(row: &rusqlite::Row<'_>, column_count: usize) -> rusqlite::Result<Row> {
    (0..column_count)
        .map(|idx| -> rusqlite::Result<Cell> { Ok(Cell::try_from(row.get_ref(idx)?)?) })
        .collect()
}
