use serde::{Deserialize, Serialize};

/// What the fetch produced; an empty menu and a failed fetch are different outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportOutcome {
    Loaded,
    Empty,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportMenuResponse {
    pub outcome: ImportOutcome,
    pub fetched: usize,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub error: Option<String>,
}

impl ImportMenuResponse {
    pub fn empty() -> Self {
        Self {
            outcome: ImportOutcome::Empty,
            fetched: 0,
            created: 0,
            updated: 0,
            skipped: 0,
            error: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            outcome: ImportOutcome::Failed,
            error: Some(reason.into()),
            ..Self::empty()
        }
    }
}
