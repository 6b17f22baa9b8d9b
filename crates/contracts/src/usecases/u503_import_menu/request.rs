use crate::domain::a001_menu_item::{Availability, MenuItemDto};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ImportMenuRequest {
    /// Overrides the configured source URL
    pub source_url: Option<String>,
}

/// Menu entry as published by the remote source.
///
/// Only `name` and `price` are required; everything else falls back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteMenuItem {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
}

impl RemoteMenuItem {
    pub fn to_dto(&self) -> MenuItemDto {
        MenuItemDto {
            name: Some(self.name.clone()),
            description: self.description.clone(),
            price: Some(self.price),
            category: Some(
                self.category
                    .clone()
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or_else(|| "Uncategorized".to_string()),
            ),
            image: self.image.clone(),
            availability: self.availability.as_deref().and_then(Availability::parse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_remote_item() {
        let item: RemoteMenuItem =
            serde_json::from_str(r#"{"name":"Sinigang","price":259,"availability":"Low Stock"}"#)
                .unwrap();
        let dto = item.to_dto();
        assert_eq!(dto.category.as_deref(), Some("Uncategorized"));
        assert_eq!(dto.availability, Some(Availability::LowStock));
        assert!(dto.validate_for_create().is_ok());
    }
}
