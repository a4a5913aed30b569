//! Handles the `tools/list` MCP method.

use booklib_core::ToolRegistry;

use crate::dispatch::success;
use crate::handler::JsonRpcOutput;
use crate::protocol::tools::{McpToolDefinition, ToolsListResult};
use crate::protocol::RequestId;

/// Lists every registered tool in registration order.
pub(crate) fn handle_tools_list(id: RequestId, registry: &ToolRegistry) -> JsonRpcOutput {
    let tools = registry
        .iter()
        .map(|spec| McpToolDefinition {
            name: spec.name.to_string(),
            description: Some(spec.description.to_string()),
            input_schema: spec.input_schema(),
        })
        .collect();

    success(
        id,
        ToolsListResult {
            tools,
            next_cursor: None,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::handle_tools_list;
    use crate::handler::JsonRpcOutput;
    use crate::protocol::RequestId;
    use booklib_core::ToolRegistry;

    #[test]
    fn lists_library_tools_with_schemas() {
        let output = handle_tools_list(RequestId::Number(2), &ToolRegistry::library());
        let JsonRpcOutput::Success(response) = output else {
            panic!("expected success");
        };
        let tools = response.result["tools"].as_array().expect("tools array");
        let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
        assert_eq!(names, ["add_book", "get_books", "delete_book", "update_book"]);
        assert_eq!(tools[0]["inputSchema"]["required"][0], "query");
    }

    #[test]
    fn empty_registry_lists_nothing() {
        let output = handle_tools_list(RequestId::Number(2), &ToolRegistry::new());
        let JsonRpcOutput::Success(response) = output else {
            panic!("expected success");
        };
        assert!(response.result["tools"].as_array().expect("arr").is_empty());
    }
}
