//! Stdio transport: one JSON-RPC message per line on stdin/stdout.

mod server;
mod transport;

pub use server::StdioServer;
pub use transport::StdioTransport;

use crate::error::TransportError;
use crate::handler::McpHandler;

/// Serves `handler` on the process stdin/stdout until stdin closes.
pub async fn serve_stdio(handler: McpHandler) -> Result<(), TransportError> {
    let transport = StdioTransport::new(tokio::io::stdin(), tokio::io::stdout());
    StdioServer::new(transport, handler).run().await
}
