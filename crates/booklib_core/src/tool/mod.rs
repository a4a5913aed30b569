//! Operation registration table.
//!
//! # Responsibility
//! - Map tool names to gateway handlers, independent of any transport.
//! - Describe each tool's single `query` argument for discovery.
//!
//! # Invariants
//! - Names are unique; registration order is preserved for listing.
//! - Handlers only fail on bad arguments or an unusable store; statement
//!   errors have already been collapsed by the gateway.

mod registry;

pub use registry::{ToolHandler, ToolParam, ToolRegistry, ToolSpec};

use crate::gateway::GatewayError;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ToolError {
    UnknownTool(String),
    DuplicateTool(String),
    InvalidArguments(String),
    Gateway(GatewayError),
    Encode(serde_json::Error),
}

impl Display for ToolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTool(name) => write!(f, "unknown tool: {name}"),
            Self::DuplicateTool(name) => write!(f, "tool already registered: {name}"),
            Self::InvalidArguments(message) => write!(f, "invalid arguments: {message}"),
            Self::Gateway(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode tool result: {err}"),
        }
    }
}

impl Error for ToolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Gateway(err) => Some(err),
            Self::Encode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GatewayError> for ToolError {
    fn from(value: GatewayError) -> Self {
        Self::Gateway(value)
    }
}
