//! Error types for the tool boundary.

use nz_mem0_memory::MemoryError;
use thiserror::Error;

/// Errors returned by tool parsing and dispatch.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The tool name is not part of the memory tool set.
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    /// Required parameters are missing or malformed. Raised before any
    /// store is touched.
    #[error("invalid params: {0}")]
    InvalidParams(String),
    /// The underlying memory operation failed.
    #[error("memory error: {0}")]
    Memory(#[from] MemoryError),
}
