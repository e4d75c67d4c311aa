//! Parsed memory tool calls.

use crate::error::ToolError;
use serde::Deserialize;
use serde_json::Value;

/// Tool names exposed by the memory service.
pub const TOOL_ADD: &str = "mem0.add";
pub const TOOL_GET: &str = "mem0.get";
pub const TOOL_SEARCH: &str = "mem0.search";
pub const TOOL_RECENT: &str = "mem0.recent";
pub const TOOL_DELETE: &str = "mem0.delete";

/// Parameters for `mem0.add`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AddParams {
    pub session_id: String,
    pub key: String,
    pub value: Value,
    /// Accepted for wire compatibility with existing callers; expiry is
    /// not enforced anywhere in the store.
    #[serde(default)]
    pub ttl: Option<i64>,
    /// Caller-supplied embedding, bypassing encoding.
    #[serde(default)]
    pub embed: Option<Vec<f32>>,
}

/// Parameters for `mem0.get`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GetParams {
    pub session_id: String,
    pub key: String,
}

/// Parameters for `mem0.search`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SearchParams {
    pub session_id: String,
    #[serde(alias = "text_query")]
    pub query: String,
    #[serde(default, alias = "top_k")]
    pub limit: Option<usize>,
}

/// Parameters for `mem0.recent`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RecentParams {
    pub session_id: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Parameters for `mem0.delete`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DeleteParams {
    pub session_id: String,
    pub key: String,
}

/// Closed set of memory tool operations.
#[derive(Debug, Clone, PartialEq)]
pub enum MemoryToolCall {
    Add(AddParams),
    Get(GetParams),
    Search(SearchParams),
    Recent(RecentParams),
    Delete(DeleteParams),
}

impl MemoryToolCall {
    /// Parse and validate a call from a tool name and parameter map.
    ///
    /// Validation happens here, before any store is touched: unknown names,
    /// missing fields, and blank identifiers are all rejected.
    pub fn parse(tool: &str, params: Value) -> Result<Self, ToolError> {
        let call = match tool {
            TOOL_ADD => MemoryToolCall::Add(decode(params)?),
            TOOL_GET => MemoryToolCall::Get(decode(params)?),
            TOOL_SEARCH => MemoryToolCall::Search(decode(params)?),
            TOOL_RECENT => MemoryToolCall::Recent(decode(params)?),
            TOOL_DELETE => MemoryToolCall::Delete(decode(params)?),
            other => return Err(ToolError::UnknownTool(other.to_string())),
        };
        call.validate()?;
        Ok(call)
    }

    /// Tool name for this call.
    pub fn name(&self) -> &'static str {
        match self {
            MemoryToolCall::Add(_) => TOOL_ADD,
            MemoryToolCall::Get(_) => TOOL_GET,
            MemoryToolCall::Search(_) => TOOL_SEARCH,
            MemoryToolCall::Recent(_) => TOOL_RECENT,
            MemoryToolCall::Delete(_) => TOOL_DELETE,
        }
    }

    /// Session the call targets.
    pub fn session_id(&self) -> &str {
        match self {
            MemoryToolCall::Add(params) => &params.session_id,
            MemoryToolCall::Get(params) => &params.session_id,
            MemoryToolCall::Search(params) => &params.session_id,
            MemoryToolCall::Recent(params) => &params.session_id,
            MemoryToolCall::Delete(params) => &params.session_id,
        }
    }

    fn validate(&self) -> Result<(), ToolError> {
        require("session_id", self.session_id())?;
        match self {
            MemoryToolCall::Add(params) => {
                require("key", &params.key)?;
                if params.value.is_null() {
                    return Err(ToolError::InvalidParams(
                        "value is required".to_string(),
                    ));
                }
            }
            MemoryToolCall::Get(params) => require("key", &params.key)?,
            MemoryToolCall::Search(params) => require("query", &params.query)?,
            MemoryToolCall::Delete(params) => require("key", &params.key)?,
            MemoryToolCall::Recent(_) => {}
        }
        Ok(())
    }
}

/// All tool names, for discovery endpoints.
pub fn tool_names() -> &'static [&'static str] {
    &[TOOL_ADD, TOOL_GET, TOOL_SEARCH, TOOL_RECENT, TOOL_DELETE]
}

fn decode<T: serde::de::DeserializeOwned>(params: Value) -> Result<T, ToolError> {
    serde_json::from_value(params).map_err(|err| ToolError::InvalidParams(err.to_string()))
}

fn require(field: &str, value: &str) -> Result<(), ToolError> {
    if value.trim().is_empty() {
        return Err(ToolError::InvalidParams(format!("{field} is required")));
    }
    Ok(())
}
