//! Book domain model.
//!
//! # Responsibility
//! - Define the canonical record stored in the `books` table.
//! - Convert between typed records and `(id, title, author, year, genre)` tuples.
//!
//! The gateway never builds a `Book`: it returns untyped rows. This module
//! is the typed view for callers of `get_books` that read whole-table rows.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused.
//! - `title`, `author` and `genre` are non-empty.
//! - Duplicate title/author/year/genre combinations are allowed.

use crate::model::cell::{Cell, Row};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned surrogate key.
pub type BookId = i64;

/// Validation errors for book records and book-shaped rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookValidationError {
    EmptyField(&'static str),
    WrongArity { expected: usize, actual: usize },
    WrongType { column: &'static str },
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "book {field} must not be empty"),
            Self::WrongArity { expected, actual } => {
                write!(f, "book row must have {expected} columns, got {actual}")
            }
            Self::WrongType { column } => write!(f, "book column `{column}` has the wrong type"),
        }
    }
}

impl Error for BookValidationError {}

/// One row of the `books` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub year: i64,
    pub genre: String,
}

impl Book {
    /// Checks the non-empty text invariants.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        if self.title.trim().is_empty() {
            return Err(BookValidationError::EmptyField("title"));
        }
        if self.author.trim().is_empty() {
            return Err(BookValidationError::EmptyField("author"));
        }
        if self.genre.trim().is_empty() {
            return Err(BookValidationError::EmptyField("genre"));
        }
        Ok(())
    }

    /// Reads a full `books` row tuple.
    ///
    /// # Errors
    /// - `WrongArity` when the tuple does not have exactly five cells.
    /// - `WrongType` when a cell does not hold the column's storage class.
    /// - `EmptyField` when a text column is blank.
    pub fn from_row(row: &[Cell]) -> Result<Self, BookValidationError> {
        let [id, title, author, year, genre] = row else {
            return Err(BookValidationError::WrongArity {
                expected: 5,
                actual: row.len(),
            });
        };

        let book = Self {
            id: id.as_i64().ok_or(BookValidationError::WrongType { column: "id" })?,
            title: text(title, "title")?,
            author: text(author, "author")?,
            year: year
                .as_i64()
                .ok_or(BookValidationError::WrongType { column: "year" })?,
            genre: text(genre, "genre")?,
        };
        book.validate()?;
        Ok(book)
    }

    /// Returns the record as a tuple in storage column order.
    pub fn to_row(&self) -> Row {
        vec![
            Cell::Integer(self.id),
            Cell::from(self.title.as_str()),
            Cell::from(self.author.as_str()),
            Cell::Integer(self.year),
            Cell::from(self.genre.as_str()),
        ]
    }
}

fn text(cell: &Cell, column: &'static str) -> Result<String, BookValidationError> {
    cell.as_str()
        .map(str::to_string)
        .ok_or(BookValidationError::WrongType { column })
}
