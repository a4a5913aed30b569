//! Domain model for the book library.
//!
//! # Responsibility
//! - Define the book record stored in the single `books` table.
//! - Define the loosely typed row values returned by caller-supplied reads.
//!
//! # Invariants
//! - Every stored book is identified by a monotonically assigned `BookId`.
//! - Row tuples keep the column order of the statement that produced them.

pub mod book;
pub mod cell;
