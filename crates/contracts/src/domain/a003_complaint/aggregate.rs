use crate::domain::common::{AggregateId, AggregateRoot, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shortest accepted complaint description, in characters
pub const MIN_DESCRIPTION_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplaintId(pub Uuid);

impl ComplaintId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for ComplaintId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(ComplaintId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ComplaintStatus {
    #[default]
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

impl ComplaintStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Open => "Open",
            ComplaintStatus::InProgress => "In Progress",
            ComplaintStatus::Resolved => "Resolved",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Open" => Some(ComplaintStatus::Open),
            "In Progress" => Some(ComplaintStatus::InProgress),
            "Resolved" => Some(ComplaintStatus::Resolved),
            _ => None,
        }
    }
}

/// Customer complaint, optionally about a specific order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: ComplaintId,
    /// Ticket code, e.g. "CMP-000003"
    pub code: String,
    pub customer_id: String,
    pub customer_email: String,
    pub order_id: Option<String>,
    pub order_code: Option<String>,
    pub issue: Option<String>,
    pub description: String,
    pub image_ref: Option<String>,
    pub status: ComplaintStatus,
    pub metadata: EntityMetadata,
}

impl Complaint {
    pub fn code_for(number: i64) -> String {
        format!("CMP-{:06}", number)
    }

    pub fn validate_description(description: &str) -> Result<(), String> {
        let description = description.trim();
        if description.is_empty() {
            return Err("Please describe your issue".into());
        }
        if description.chars().count() < MIN_DESCRIPTION_LEN {
            return Err(format!(
                "Description must be at least {} characters",
                MIN_DESCRIPTION_LEN
            ));
        }
        Ok(())
    }

    /// Submission timestamp
    pub fn submitted_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.metadata.created_at
    }

    /// Status writes are unrestricted in both directions
    pub fn set_status(&mut self, status: ComplaintStatus) {
        if self.status != status {
            self.status = status;
            self.metadata.before_write();
        }
    }
}

impl AggregateRoot for Complaint {
    type Id = ComplaintId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.metadata
    }

    fn aggregate_index() -> &'static str {
        "a003"
    }

    fn collection_name() -> &'static str {
        "complaint"
    }

    fn element_name() -> &'static str {
        "Complaint"
    }

    fn list_name() -> &'static str {
        "Complaints"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FileComplaintRequest {
    /// Order id or code
    pub order_id: Option<String>,
    pub issue: Option<String>,
    pub description: String,
    pub image_ref: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateComplaintStatusRequest {
    pub status: ComplaintStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_length() {
        assert!(Complaint::validate_description("bad").is_err());
        assert!(Complaint::validate_description("          ").is_err());
        assert!(Complaint::validate_description("Food arrived cold").is_ok());
    }

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&ComplaintStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        assert_eq!(ComplaintStatus::parse("Resolved"), Some(ComplaintStatus::Resolved));
    }
}
