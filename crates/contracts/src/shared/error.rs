use serde::{Deserialize, Serialize};

/// Body of every non-2xx JSON response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable category, e.g. `validation` or `invalid_transition`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}
