//! Structured audit logging for tool invocations.

use chrono::Utc;
use log::info;
use uuid::Uuid;

/// Generate a trace id with the given prefix, e.g. `audit-1f2e3d4c5b6a`.
pub fn new_trace_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", &hex[..12])
}

/// Audit sink emitting one structured log line per dispatched tool call.
#[derive(Debug, Clone)]
pub struct AuditLog {
    enabled: bool,
}

impl AuditLog {
    /// Create an audit log; a disabled log drops every entry.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Record one tool invocation. Returns the trace id used, generating
    /// one when the caller did not supply it.
    pub fn record(
        &self,
        action: &str,
        session_id: &str,
        trace_id: Option<&str>,
    ) -> Option<String> {
        if !self.enabled {
            return None;
        }
        let trace_id = match trace_id {
            Some(trace_id) => trace_id.to_string(),
            None => new_trace_id("audit"),
        };
        info!(
            target: "nz_mem0::audit",
            "audit (trace_id={}, action={}, session_id={}, ts={})",
            trace_id,
            action,
            session_id,
            Utc::now().timestamp()
        );
        Some(trace_id)
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new(true)
    }
}
