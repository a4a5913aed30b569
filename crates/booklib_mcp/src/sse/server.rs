//! HTTP server that binds the SSE router to a TCP socket.

use std::net::SocketAddr;

use log::info;
use tokio::net::TcpListener;

use crate::error::SseTransportError;
use crate::handler::McpHandler;
use crate::sse::router::{build_router, SseState, SSE_PATH};

pub struct SseServer {
    pub(crate) addr: SocketAddr,
    pub(crate) state: SseState,
}

impl SseServer {
    pub fn new(handler: McpHandler, addr: SocketAddr) -> Self {
        Self {
            addr,
            state: SseState::new(handler),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Binds and serves until the server stops.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP bind fails or the server crashes.
    pub async fn run(self) -> Result<(), SseTransportError> {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|e| SseTransportError::Bind {
                addr: self.addr.to_string(),
                source: e,
            })?;

        info!(
            "event=server_start module=mcp transport=sse addr={} stream_path={SSE_PATH}",
            self.addr
        );

        axum::serve(listener, build_router(self.state))
            .await
            .map_err(|e| SseTransportError::Serve(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::SseServer;
    use crate::handler::McpHandler;
    use booklib_core::{GatewayConfig, LibraryGateway};
    use std::net::SocketAddr;

    #[test]
    fn new_keeps_address_and_starts_without_sessions() {
        let handler = McpHandler::library(LibraryGateway::new(GatewayConfig::default()));
        let addr: SocketAddr = "127.0.0.1:8000".parse().unwrap();
        let server = SseServer::new(handler, addr);
        assert_eq!(server.addr().port(), 8000);
        assert!(server.state.sessions.is_empty());
    }

    #[tokio::test]
    async fn bind_conflict_is_reported() {
        let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap();
        let handler = McpHandler::library(LibraryGateway::new(GatewayConfig::default()));

        let err = SseServer::new(handler, addr).run().await.unwrap_err();
        assert!(err.to_string().contains(&addr.to_string()));
    }
}
