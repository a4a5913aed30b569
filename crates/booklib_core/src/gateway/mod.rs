//! Library Store Gateway.
//!
//! # Responsibility
//! - Run caller-supplied SQL against the durable `books` store.
//! - Give every call its own connection and release it on every exit path.
//! - Collapse engine errors into each operation's failure value.
//!
//! # Invariants
//! - No connection or other state is held between calls.
//! - Statement errors never reach the caller; they are logged instead.
//! - Only store open/bootstrap failures surface as `GatewayError`.

mod library;

pub use library::{GatewayOp, LibraryGateway};

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Failure to obtain a usable store connection.
///
/// Errors raised by the caller's statement are not represented here; they are
/// collapsed to `false` or an empty row list.
#[derive(Debug)]
pub enum GatewayError {
    Store(DbError),
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "library store unavailable: {err}"),
        }
    }
}

impl Error for GatewayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
        }
    }
}

impl From<DbError> for GatewayError {
    fn from(value: DbError) -> Self {
        Self::Store(value)
    }
}
