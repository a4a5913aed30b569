//! MCP tools/* method types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single tool definition in the `tools/list` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpToolDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Response for `tools/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsListResult {
    pub tools: Vec<McpToolDefinition>,
    #[serde(rename = "nextCursor", default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Request params for `tools/call`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsCallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Content item in a tool call response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    Text { text: String },
}

/// Response for `tools/call`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsCallResult {
    pub content: Vec<ToolContent>,
    #[serde(default, rename = "isError")]
    pub is_error: bool,
}

impl ToolsCallResult {
    pub fn text(text: impl Into<String>, is_error: bool) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error,
        }
    }

    /// Successful result for a tool value.
    ///
    /// A JSON array becomes one text item per element, so an empty array
    /// produces no content at all. Any other value is a single text item.
    pub fn from_value(value: &Value) -> Self {
        let content = match value {
            Value::Array(items) => items
                .iter()
                .map(|item| ToolContent::Text {
                    text: item.to_string(),
                })
                .collect(),
            other => vec![ToolContent::Text {
                text: other.to_string(),
            }],
        };
        Self {
            content,
            is_error: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_definition_uses_camel_case_schema_key() {
        let def = McpToolDefinition {
            name: "get_books".into(),
            description: None,
            input_schema: json!({"type": "object"}),
        };
        let value = serde_json::to_value(def).unwrap();
        assert!(value.get("inputSchema").is_some());
        assert!(value.get("description").is_none());
    }

    #[test]
    fn tools_call_params_default_to_null_arguments() {
        let params: ToolsCallParams = serde_json::from_str(r#"{"name":"get_books"}"#).unwrap();
        assert_eq!(params.name, "get_books");
        assert!(params.arguments.is_null());
    }

    #[test]
    fn array_values_become_one_item_per_element() {
        let rows = json!([[1, "1984"], [2, "Dune"]]);
        let result = ToolsCallResult::from_value(&rows);
        let value = serde_json::to_value(result).unwrap();
        assert_eq!(value["content"][0]["text"], r#"[1,"1984"]"#);
        assert_eq!(value["content"][1]["text"], r#"[2,"Dune"]"#);

        let empty = ToolsCallResult::from_value(&json!([]));
        assert!(empty.content.is_empty());
        assert!(!empty.is_error);

        let flag = serde_json::to_value(ToolsCallResult::from_value(&json!(false))).unwrap();
        assert_eq!(flag["content"], json!([{"type": "text", "text": "false"}]));
    }

    #[test]
    fn text_result_serializes_with_type_tag() {
        let value = serde_json::to_value(ToolsCallResult::text("true", false)).unwrap();
        assert_eq!(
            value,
            json!({"content": [{"type": "text", "text": "true"}], "isError": false})
        );
    }
}
