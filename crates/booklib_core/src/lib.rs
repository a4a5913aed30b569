//! Core of the book library tool server.
//! This crate owns the books store, its schema, and the four library operations.
//!
//! `Book` is a helper for library callers: it decodes `get_books` rows in
//! storage column order and is not used by the gateway itself.

pub mod config;
pub mod db;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod tool;

pub use config::GatewayConfig;
pub use gateway::{GatewayError, GatewayOp, GatewayResult, LibraryGateway};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::book::{Book, BookId, BookValidationError};
pub use model::cell::{Cell, Row};
pub use tool::{ToolError, ToolParam, ToolRegistry, ToolSpec};

/// Name under which the library is exposed to tool-calling agents.
pub const SERVER_NAME: &str = "sqlite-book-library";

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, SERVER_NAME};

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn server_name_is_stable() {
        assert_eq!(SERVER_NAME, "sqlite-book-library");
    }
}
