use crate::domain::common::{AggregateId, AggregateRoot, EntityMetadata};
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================

/// Identifier of a menu item, stable across edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct MenuItemId(pub i32);

impl MenuItemId {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl AggregateId for MenuItemId {
    fn as_string(&self) -> String {
        self.0.as_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        <i32 as AggregateId>::from_string(s).map(MenuItemId)
    }
}

impl std::fmt::Display for MenuItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Availability
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Availability {
    #[default]
    Available,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Available => "Available",
            Availability::LowStock => "Low Stock",
            Availability::OutOfStock => "Out of Stock",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Available" => Some(Availability::Available),
            "Low Stock" => Some(Availability::LowStock),
            "Out of Stock" => Some(Availability::OutOfStock),
            _ => None,
        }
    }

    pub fn can_order(&self) -> bool {
        !matches!(self, Availability::OutOfStock)
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// A dish on the restaurant menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image: Option<String>,
    pub availability: Availability,
    pub metadata: EntityMetadata,
}

impl MenuItem {
    /// Build a menu item from a validated DTO; the id is assigned by the store.
    pub fn from_dto(id: MenuItemId, dto: &MenuItemDto) -> Result<Self, String> {
        dto.validate_for_create()?;
        Ok(Self {
            id,
            name: dto.name.clone().unwrap_or_default().trim().to_string(),
            description: dto.description.clone().unwrap_or_default(),
            price: dto.price.unwrap_or_default(),
            category: dto.category.clone().unwrap_or_default().trim().to_string(),
            image: dto.image.clone(),
            availability: dto.availability.unwrap_or_default(),
            metadata: EntityMetadata::new(),
        })
    }

    /// Merge a partial update; absent fields keep their current value.
    pub fn apply_patch(&mut self, dto: &MenuItemDto) {
        if let Some(name) = &dto.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = &dto.description {
            self.description = description.clone();
        }
        if let Some(price) = dto.price {
            self.price = price;
        }
        if let Some(category) = &dto.category {
            self.category = category.trim().to_string();
        }
        if dto.image.is_some() {
            self.image = dto.image.clone();
        }
        if let Some(availability) = dto.availability {
            self.availability = availability;
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".into());
        }
        if self.category.trim().is_empty() {
            return Err("Category is required".into());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err("Price must be a non-negative number".into());
        }
        Ok(())
    }
}

impl AggregateRoot for MenuItem {
    type Id = MenuItemId;

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
        "a001"
    }

    fn collection_name() -> &'static str {
        "menu_item"
    }

    fn element_name() -> &'static str {
        "Menu item"
    }

    fn list_name() -> &'static str {
        "Menu"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// Create/update payload; every field is optional so the same shape serves as a patch.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub availability: Option<Availability>,
}

impl MenuItemDto {
    pub fn validate_for_create(&self) -> Result<(), String> {
        let mut missing = Vec::new();
        if self.name.as_deref().map_or(true, |s| s.trim().is_empty()) {
            missing.push("name");
        }
        if self.category.as_deref().map_or(true, |s| s.trim().is_empty()) {
            missing.push("category");
        }
        if self.price.is_none() {
            missing.push("price");
        }
        if !missing.is_empty() {
            return Err(format!("Missing required field(s): {}", missing.join(", ")));
        }
        match self.price {
            Some(p) if !p.is_finite() || p < 0.0 => {
                Err("Price must be a non-negative number".into())
            }
            _ => Ok(()),
        }
    }
}
