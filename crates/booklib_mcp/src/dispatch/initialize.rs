//! Handles the `initialize` MCP method.

use booklib_core::SERVER_NAME;
use log::info;
use serde_json::Value;

use crate::dispatch::success;
use crate::handler::JsonRpcOutput;
use crate::protocol::initialize::{
    ImplementationInfo, InitializeParams, InitializeResult, ServerCapabilities, ToolCapability,
    PROTOCOL_VERSION,
};
use crate::protocol::{error_codes, JsonRpcErrorResponse, RequestId};

/// Handles the `initialize` request and returns the server capabilities.
///
/// The server always answers with its own protocol version; clients decide
/// whether they can proceed.
pub(crate) fn handle_initialize(id: RequestId, params: &Option<Value>) -> JsonRpcOutput {
    if let Some(p) = params {
        match serde_json::from_value::<InitializeParams>(p.clone()) {
            Ok(parsed) => info!(
                "event=mcp_initialize module=mcp status=ok client={} client_protocol={}",
                parsed
                    .client_info
                    .as_ref()
                    .map_or("unknown", |info| info.name.as_str()),
                parsed.protocol_version
            ),
            Err(e) => {
                return JsonRpcOutput::Error(JsonRpcErrorResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("invalid initialize params: {e}"),
                ));
            }
        }
    }

    let result = InitializeResult {
        protocol_version: PROTOCOL_VERSION.to_string(),
        capabilities: ServerCapabilities {
            tools: Some(ToolCapability {
                list_changed: false,
            }),
        },
        server_info: ImplementationInfo {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    };

    success(id, result)
}

#[cfg(test)]
mod tests {
    use super::handle_initialize;
    use crate::handler::JsonRpcOutput;
    use crate::protocol::RequestId;
    use serde_json::json;

    #[test]
    fn initialize_without_params_succeeds() {
        let output = handle_initialize(RequestId::Number(1), &None);
        let JsonRpcOutput::Success(response) = output else {
            panic!("expected success");
        };
        assert_eq!(response.result["serverInfo"]["name"], "sqlite-book-library");
        assert_eq!(response.result["protocolVersion"], "2024-11-05");
        assert!(response.result["capabilities"]["tools"].is_object());
    }

    #[test]
    fn initialize_with_malformed_params_is_rejected() {
        let output = handle_initialize(RequestId::Number(1), &Some(json!({"protocolVersion": 5})));
        assert!(output.is_error());
    }
}
