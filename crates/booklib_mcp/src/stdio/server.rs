//! MCP server loop over the stdio transport.

use log::{debug, error, info, warn};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::TransportError;
use crate::handler::{JsonRpcOutput, McpHandler};
use crate::protocol::{error_codes, IncomingMessage, JsonRpcErrorResponse, RequestId};
use crate::stdio::transport::StdioTransport;

/// Reads requests line by line and writes one response per request.
///
/// Notifications are handled without a response. Requests are answered in
/// arrival order.
pub struct StdioServer<R, W> {
    transport: StdioTransport<R, W>,
    handler: McpHandler,
}

impl<R, W> StdioServer<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(transport: StdioTransport<R, W>, handler: McpHandler) -> Self {
        Self { transport, handler }
    }

    /// Runs until the input stream reaches EOF.
    pub async fn run(&mut self) -> Result<(), TransportError> {
        info!("event=server_start module=mcp transport=stdio");

        loop {
            let line = match self.transport.read_line().await? {
                Some(line) if line.is_empty() => continue,
                Some(line) => line,
                None => {
                    info!("event=server_stop module=mcp transport=stdio reason=eof");
                    return Ok(());
                }
            };

            match IncomingMessage::parse(&line) {
                Ok(IncomingMessage::Request(request)) => {
                    debug!(
                        "event=mcp_request module=mcp transport=stdio method={} id={:?}",
                        request.method, request.id
                    );
                    let output = self.handler.dispatch(&request).await;
                    self.write_output(&output).await?;
                }
                Ok(IncomingMessage::Notification(notification)) => {
                    debug!(
                        "event=mcp_notification module=mcp transport=stdio method={}",
                        notification.method
                    );
                    self.handler.handle_notification(&notification);
                }
                Err(e) => {
                    warn!("event=mcp_request module=mcp transport=stdio status=parse_error error={e}");
                    let err = JsonRpcErrorResponse::error(
                        RequestId::Number(0),
                        error_codes::PARSE_ERROR,
                        format!("parse error: {e}"),
                    );
                    self.write_output(&JsonRpcOutput::Error(err)).await?;
                }
            }
        }
    }

    /// Consumes the server and returns the transport.
    pub fn into_transport(self) -> StdioTransport<R, W> {
        self.transport
    }

    async fn write_output(&mut self, output: &JsonRpcOutput) -> Result<(), TransportError> {
        match output.to_json() {
            Ok(json) => self.transport.write_line(&json).await,
            Err(e) => {
                error!("event=mcp_response module=mcp status=encode_error error={e}");
                Err(TransportError::Write(e.to_string()))
            }
        }
    }
}
