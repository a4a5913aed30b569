//! Handles the `tools/call` MCP method.

use std::sync::Arc;

use booklib_core::{LibraryGateway, ToolRegistry};
use log::{debug, error, warn};
use serde_json::Value;

use crate::dispatch::success;
use crate::handler::JsonRpcOutput;
use crate::protocol::tools::{ToolsCallParams, ToolsCallResult};
use crate::protocol::{error_codes, JsonRpcErrorResponse, RequestId};

/// Handles the `tools/call` request.
///
/// The gateway blocks on SQLite, so the handler runs on tokio's blocking
/// pool. Each tool value is returned as JSON text, one item per row for
/// `get_books`; tool failures are reported in-band with `isError: true`.
pub(crate) async fn handle_tools_call(
    id: RequestId,
    params: &Option<Value>,
    gateway: Arc<LibraryGateway>,
    registry: Arc<ToolRegistry>,
) -> JsonRpcOutput {
    // 1. Parse params
    let call_params = match params {
        Some(p) => match serde_json::from_value::<ToolsCallParams>(p.clone()) {
            Ok(cp) => cp,
            Err(e) => {
                return JsonRpcOutput::Error(JsonRpcErrorResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("invalid tools/call params: {e}"),
                ));
            }
        },
        None => {
            return JsonRpcOutput::Error(JsonRpcErrorResponse::error(
                id,
                error_codes::INVALID_PARAMS,
                "tools/call requires params",
            ));
        }
    };

    // 2. Resolve tool
    if registry.get(&call_params.name).is_none() {
        return JsonRpcOutput::Error(JsonRpcErrorResponse::error(
            id,
            error_codes::INVALID_PARAMS,
            format!("unknown tool: {}", call_params.name),
        ));
    }

    // 3. Execute off the async runtime
    debug!(
        "event=tool_call module=mcp status=start tool={}",
        call_params.name
    );
    let name = call_params.name.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        registry.call(&gateway, &call_params.name, &call_params.arguments)
    })
    .await;

    let result = match outcome {
        Ok(Ok(value)) => ToolsCallResult::from_value(&value),
        Ok(Err(err)) => {
            warn!("event=tool_call module=mcp status=error tool={name} error={err}");
            ToolsCallResult::text(err.to_string(), true)
        }
        Err(join_err) => {
            error!("event=tool_call module=mcp status=panicked tool={name} error={join_err}");
            return JsonRpcOutput::Error(JsonRpcErrorResponse::error(
                id,
                error_codes::INTERNAL_ERROR,
                format!("tool {name} did not complete"),
            ));
        }
    };

    success(id, result)
}
