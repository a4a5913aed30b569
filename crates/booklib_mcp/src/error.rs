//! Transport-layer error types.

use thiserror::Error;

/// Errors from the stdio transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to read from the input stream.
    #[error("read error: {0}")]
    Read(String),
    /// Failed to write to the output stream.
    #[error("write error: {0}")]
    Write(String),
}

/// Errors from the SSE transport.
#[derive(Debug, Error)]
pub enum SseTransportError {
    /// Failed to bind the listening socket.
    #[error("failed to bind on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    /// The HTTP server stopped with an I/O error.
    #[error("server error: {0}")]
    Serve(String),
}
