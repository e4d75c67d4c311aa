//! Exhaustive dispatcher mapping tool calls onto the memory store.

use crate::audit::AuditLog;
use crate::call::MemoryToolCall;
use crate::error::ToolError;
use nz_mem0_memory::{MemoryStore, RetrievedRecord, ScoredRecord, StoreReceipt};
use serde::Serialize;
use std::sync::Arc;

/// Search limit used when the caller does not supply one.
const DEFAULT_SEARCH_LIMIT: usize = 10;
/// Recent-list limit used when the caller does not supply one.
const DEFAULT_RECENT_LIMIT: usize = 20;

/// Result of a dispatched tool call, serialized for the transport layer.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ToolOutcome {
    /// `mem0.add` receipt.
    Stored { receipt: StoreReceipt },
    /// `mem0.get` result; `None` when the record does not exist.
    Fetched { record: Option<RetrievedRecord> },
    /// `mem0.search` matches, best first.
    Matches { results: Vec<ScoredRecord> },
    /// `mem0.recent` records, newest first.
    Recent { results: Vec<RetrievedRecord> },
    /// `mem0.delete` outcome.
    Deleted { deleted: bool },
}

/// Dispatcher owning the store handle and audit sink.
#[derive(Clone)]
pub struct ToolDispatcher {
    store: Arc<MemoryStore>,
    audit: AuditLog,
    default_search_limit: usize,
}

impl ToolDispatcher {
    /// Create a dispatcher over an application-scoped store.
    pub fn new(store: Arc<MemoryStore>, audit: AuditLog) -> Self {
        Self {
            store,
            audit,
            default_search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    /// Override the default search limit.
    pub fn with_default_search_limit(mut self, limit: usize) -> Self {
        self.default_search_limit = limit.max(1);
        self
    }

    /// Execute one validated call. Every variant is handled here; adding a
    /// tool without extending this match is a compile error.
    pub async fn dispatch(
        &self,
        call: MemoryToolCall,
        trace_id: Option<&str>,
    ) -> Result<ToolOutcome, ToolError> {
        self.audit.record(call.name(), call.session_id(), trace_id);
        match call {
            MemoryToolCall::Add(params) => {
                let receipt = self
                    .store
                    .store(&params.session_id, &params.key, &params.value, params.embed)
                    .await?;
                Ok(ToolOutcome::Stored { receipt })
            }
            MemoryToolCall::Get(params) => {
                let record = self.store.retrieve(&params.session_id, &params.key).await?;
                Ok(ToolOutcome::Fetched { record })
            }
            MemoryToolCall::Search(params) => {
                let limit = params.limit.unwrap_or(self.default_search_limit);
                let results = self
                    .store
                    .search(&params.session_id, &params.query, limit)
                    .await?;
                Ok(ToolOutcome::Matches { results })
            }
            MemoryToolCall::Recent(params) => {
                let limit = params.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
                let results = self.store.recent(&params.session_id, limit).await?;
                Ok(ToolOutcome::Recent { results })
            }
            MemoryToolCall::Delete(params) => {
                let deleted = self.store.delete(&params.session_id, &params.key).await?;
                Ok(ToolOutcome::Deleted { deleted })
            }
        }
    }

    /// Parse and execute in one step, the shape transports actually use.
    pub async fn invoke(
        &self,
        tool: &str,
        params: serde_json::Value,
        trace_id: Option<&str>,
    ) -> Result<ToolOutcome, ToolError> {
        let call = MemoryToolCall::parse(tool, params)?;
        self.dispatch(call, trace_id).await
    }
}
