use serde::{Deserialize, Serialize};

/// Audit log record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: i64,
    pub timestamp: String,
    /// Always "server" for entries written by the backend
    pub source: String,
    /// Subsystem that wrote the entry, e.g. "a002_order"
    pub category: String,
    pub message: String,
}
