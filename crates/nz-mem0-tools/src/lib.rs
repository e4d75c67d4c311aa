//! Typed tool surface over the memory store.
//!
//! Replaces the service's name-to-function dispatch table with a closed set
//! of operation variants and one exhaustive dispatcher, so an unknown tool
//! or a malformed parameter map is rejected at the boundary instead of
//! failing somewhere inside a handler.

mod audit;
mod call;
mod dispatch;
mod error;

/// Structured audit logging for tool invocations.
pub use audit::{AuditLog, new_trace_id};
/// Parsed tool calls and their parameter structs.
pub use call::{
    AddParams, DeleteParams, GetParams, MemoryToolCall, RecentParams, SearchParams, TOOL_ADD,
    TOOL_DELETE, TOOL_GET, TOOL_RECENT, TOOL_SEARCH, tool_names,
};
/// Dispatcher and response shapes.
pub use dispatch::{ToolDispatcher, ToolOutcome};
/// Tool boundary error type.
pub use error::ToolError;
