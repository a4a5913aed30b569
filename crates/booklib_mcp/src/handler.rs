//! MCP request routing.
//!
//! `McpHandler` is shared by both transports; each family of methods lives
//! in `dispatch` as free functions.

use std::sync::Arc;

use booklib_core::{LibraryGateway, ToolRegistry};
use log::{debug, info};
use serde::Serialize;
use serde_json::json;

use crate::dispatch::{initialize, tools_call, tools_list};
use crate::protocol::{
    error_codes, methods, JsonRpcErrorResponse, JsonRpcNotification, JsonRpcRequest,
    JsonRpcResponse,
};

/// Response to one JSON-RPC request.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum JsonRpcOutput {
    Success(JsonRpcResponse),
    Error(JsonRpcErrorResponse),
}

impl JsonRpcOutput {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Dispatches MCP methods to the library tools.
#[derive(Clone)]
pub struct McpHandler {
    gateway: Arc<LibraryGateway>,
    registry: Arc<ToolRegistry>,
}

impl McpHandler {
    pub fn new(gateway: LibraryGateway, registry: ToolRegistry) -> Self {
        Self {
            gateway: Arc::new(gateway),
            registry: Arc::new(registry),
        }
    }

    /// Handler exposing the four library tools over `gateway`.
    pub fn library(gateway: LibraryGateway) -> Self {
        Self::new(gateway, ToolRegistry::library())
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Routes one request to its method implementation.
    pub async fn dispatch(&self, request: &JsonRpcRequest) -> JsonRpcOutput {
        let id = request.id.clone();
        match request.method.as_str() {
            methods::INITIALIZE => initialize::handle_initialize(id, &request.params),
            methods::PING => JsonRpcOutput::Success(JsonRpcResponse::success(id, json!({}))),
            methods::TOOLS_LIST => tools_list::handle_tools_list(id, &self.registry),
            methods::TOOLS_CALL => {
                tools_call::handle_tools_call(
                    id,
                    &request.params,
                    Arc::clone(&self.gateway),
                    Arc::clone(&self.registry),
                )
                .await
            }
            other => {
                debug!("event=mcp_dispatch module=mcp status=unknown_method method={other}");
                JsonRpcOutput::Error(JsonRpcErrorResponse::error(
                    id,
                    error_codes::METHOD_NOT_FOUND,
                    format!("method not found: {other}"),
                ))
            }
        }
    }

    /// Notifications never produce a response.
    pub fn handle_notification(&self, notification: &JsonRpcNotification) {
        match notification.method.as_str() {
            methods::NOTIFICATION_INITIALIZED => {
                info!("event=mcp_session module=mcp status=initialized");
            }
            // Calls are synchronous and short; there is nothing to cancel.
            methods::NOTIFICATION_CANCELLED => {}
            other => debug!("event=mcp_notification module=mcp status=ignored method={other}"),
        }
    }
}
