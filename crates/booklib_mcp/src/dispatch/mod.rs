//! MCP method dispatch functions.
//!
//! Each sub-module handles one method as a free function, keeping
//! `McpHandler` itself thin (struct + routing only).

pub(crate) mod initialize;
pub(crate) mod tools_call;
pub(crate) mod tools_list;

use serde::Serialize;

use crate::handler::JsonRpcOutput;
use crate::protocol::{error_codes, JsonRpcErrorResponse, JsonRpcResponse, RequestId};

/// Wraps a serializable result, or reports the encoding failure.
pub(crate) fn success<T: Serialize>(id: RequestId, result: T) -> JsonRpcOutput {
    match serde_json::to_value(result) {
        Ok(v) => JsonRpcOutput::Success(JsonRpcResponse::success(id, v)),
        Err(e) => JsonRpcOutput::Error(JsonRpcErrorResponse::error(
            id,
            error_codes::INTERNAL_ERROR,
            e.to_string(),
        )),
    }
}
