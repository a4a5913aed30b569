//! Registry of the library tools and their argument handling.

use crate::db::schema::DEFAULT_SELECT_SQL;
use crate::gateway::{GatewayOp, LibraryGateway};
use crate::tool::ToolError;
use serde_json::{Map, Value};

/// Runs one tool against the gateway with already-parsed JSON arguments.
pub type ToolHandler = fn(&LibraryGateway, &Value) -> Result<Value, ToolError>;

/// One named argument of a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolParam {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub default: Option<&'static str>,
}

/// A registered tool.
#[derive(Clone)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ToolParam],
    pub handler: ToolHandler,
}

impl std::fmt::Debug for ToolSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolSpec")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl ToolSpec {
    /// JSON Schema object describing the tool arguments.
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in self.params {
            let mut prop = Map::new();
            prop.insert("type".to_string(), Value::String("string".to_string()));
            prop.insert(
                "description".to_string(),
                Value::String(param.description.to_string()),
            );
            if let Some(default) = param.default {
                prop.insert("default".to_string(), Value::String(default.to_string()));
            }
            properties.insert(param.name.to_string(), Value::Object(prop));
            if param.required {
                required.push(Value::String(param.name.to_string()));
            }
        }

        let mut schema = Map::new();
        schema.insert("type".to_string(), Value::String("object".to_string()));
        schema.insert("properties".to_string(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".to_string(), Value::Array(required));
        }
        Value::Object(schema)
    }
}

const QUERY_PARAM_NAME: &str = "query";

const ADD_QUERY: &[ToolParam] = &[ToolParam {
    name: QUERY_PARAM_NAME,
    description: "SQL INSERT, e.g. INSERT INTO books (title, author, year, genre) \
                  VALUES ('1984', 'George Orwell', 1949, 'Dystopian')",
    required: true,
    default: None,
}];

const GET_QUERY: &[ToolParam] = &[ToolParam {
    name: QUERY_PARAM_NAME,
    description: "SQL SELECT used to retrieve books",
    required: false,
    default: Some(DEFAULT_SELECT_SQL),
}];

const DELETE_QUERY: &[ToolParam] = &[ToolParam {
    name: QUERY_PARAM_NAME,
    description: "SQL DELETE, e.g. DELETE FROM books WHERE id = 1",
    required: true,
    default: None,
}];

const UPDATE_QUERY: &[ToolParam] = &[ToolParam {
    name: QUERY_PARAM_NAME,
    description: "SQL UPDATE, e.g. UPDATE books SET genre = 'Science Fiction' WHERE title = '1984'",
    required: true,
    default: None,
}];

/// Ordered name -> handler table.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolSpec>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry exposing `add_book`, `get_books`, `delete_book` and `update_book`.
    pub fn library() -> Self {
        // Names come from `GatewayOp` and are distinct.
        Self {
            tools: GatewayOp::ALL.into_iter().map(library_tool).collect(),
        }
    }

    pub fn register(&mut self, spec: ToolSpec) -> Result<(), ToolError> {
        if self.get(spec.name).is_some() {
            return Err(ToolError::DuplicateTool(spec.name.to_string()));
        }
        self.tools.push(spec);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.iter().find(|spec| spec.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolSpec> {
        self.tools.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|spec| spec.name).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Looks up `name` and runs its handler.
    pub fn call(
        &self,
        gateway: &LibraryGateway,
        name: &str,
        arguments: &Value,
    ) -> Result<Value, ToolError> {
        let spec = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        (spec.handler)(gateway, arguments)
    }
}

fn library_tool(op: GatewayOp) -> ToolSpec {
    match op {
        GatewayOp::AddBook => ToolSpec {
            name: op.name(),
            description: "Add a new book to the library using a SQL INSERT query. \
                          Returns true if added successfully, false otherwise.",
            params: ADD_QUERY,
            handler: handle_add_book,
        },
        GatewayOp::GetBooks => ToolSpec {
            name: op.name(),
            description: "Fetch books using a SQL SELECT query. \
                          Returns a list of row tuples (id, title, author, year, genre).",
            params: GET_QUERY,
            handler: handle_get_books,
        },
        GatewayOp::DeleteBook => ToolSpec {
            name: op.name(),
            description: "Delete a book using a SQL DELETE query. \
                          Returns true if deletion was successful, false otherwise.",
            params: DELETE_QUERY,
            handler: handle_delete_book,
        },
        GatewayOp::UpdateBook => ToolSpec {
            name: op.name(),
            description: "Update book information using a SQL UPDATE query. \
                          Returns true if update was successful, false otherwise.",
            params: UPDATE_QUERY,
            handler: handle_update_book,
        },
    }
}

fn handle_add_book(gateway: &LibraryGateway, arguments: &Value) -> Result<Value, ToolError> {
    let query = required_query(arguments)?;
    Ok(Value::Bool(gateway.add_book(query)?))
}

fn handle_get_books(gateway: &LibraryGateway, arguments: &Value) -> Result<Value, ToolError> {
    let query = optional_query(arguments)?;
    let rows = gateway.get_books(query)?;
    serde_json::to_value(rows).map_err(ToolError::Encode)
}

fn handle_delete_book(gateway: &LibraryGateway, arguments: &Value) -> Result<Value, ToolError> {
    let query = required_query(arguments)?;
    Ok(Value::Bool(gateway.delete_book(query)?))
}

fn handle_update_book(gateway: &LibraryGateway, arguments: &Value) -> Result<Value, ToolError> {
    let query = required_query(arguments)?;
    Ok(Value::Bool(gateway.update_book(query)?))
}

fn required_query(arguments: &Value) -> Result<&str, ToolError> {
    optional_query(arguments)?.ok_or_else(|| {
        ToolError::InvalidArguments(format!("missing required argument `{QUERY_PARAM_NAME}`"))
    })
}

fn optional_query(arguments: &Value) -> Result<Option<&str>, ToolError> {
    let object = match arguments {
        Value::Null => return Ok(None),
        Value::Object(object) => object,
        _ => {
            return Err(ToolError::InvalidArguments(
                "arguments must be an object".to_string(),
            ))
        }
    };

    match object.get(QUERY_PARAM_NAME) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(query)) => Ok(Some(query.as_str())),
        Some(_) => Err(ToolError::InvalidArguments(format!(
            "argument `{QUERY_PARAM_NAME}` must be a string"
        ))),
    }
}
