//! # booklib_mcp
//!
//! MCP front door for the book library.
//!
//! Exposes the library tools over JSON-RPC 2.0 on two transports:
//! line-delimited stdio and HTTP with server-sent events.

mod dispatch;
pub mod error;
pub mod handler;
pub mod protocol;
pub mod sse;
pub mod stdio;

pub use error::{SseTransportError, TransportError};
pub use handler::{JsonRpcOutput, McpHandler};
pub use sse::{build_router, SseServer, SseState};
pub use stdio::{serve_stdio, StdioServer, StdioTransport};
