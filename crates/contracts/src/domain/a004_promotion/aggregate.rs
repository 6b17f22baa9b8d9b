use crate::domain::common::{AggregateId, AggregateRoot, EntityMetadata};
use crate::shared::money::round_cents;
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromotionId(pub i32);

impl PromotionId {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl AggregateId for PromotionId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        s.parse::<i32>()
            .map(PromotionId::new)
            .map_err(|e| format!("Invalid promotion id: {}", e))
    }
}

// ============================================================================
// Value types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PromotionKind {
    #[default]
    Percentage,
    Fixed,
}

impl PromotionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromotionKind::Percentage => "Percentage",
            PromotionKind::Fixed => "Fixed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Percentage" => Some(PromotionKind::Percentage),
            "Fixed" => Some(PromotionKind::Fixed),
            _ => None,
        }
    }
}

/// How often a code may be redeemed.
///
/// `OneTime` is per account, `Limited` counts redemptions across all accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UsageLimit {
    OneTime,
    Limited {
        #[serde(rename = "maxUses")]
        max_uses: u32,
    },
    #[default]
    Unlimited,
}

impl UsageLimit {
    /// Storage form: a label plus the optional cap
    pub fn to_parts(&self) -> (&'static str, Option<i64>) {
        match self {
            UsageLimit::OneTime => ("OneTime", None),
            UsageLimit::Limited { max_uses } => ("Limited", Some(i64::from(*max_uses))),
            UsageLimit::Unlimited => ("Unlimited", None),
        }
    }

    pub fn from_parts(label: &str, max_uses: Option<i64>) -> Option<Self> {
        match label {
            "OneTime" => Some(UsageLimit::OneTime),
            "Unlimited" => Some(UsageLimit::Unlimited),
            "Limited" => max_uses
                .and_then(|n| u32::try_from(n).ok())
                .map(|max_uses| UsageLimit::Limited { max_uses }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PromotionStatus {
    #[default]
    Active,
    Inactive,
}

impl PromotionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromotionStatus::Active => "Active",
            PromotionStatus::Inactive => "Inactive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Active" => Some(PromotionStatus::Active),
            "Inactive" => Some(PromotionStatus::Inactive),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            PromotionStatus::Active => PromotionStatus::Inactive,
            PromotionStatus::Inactive => PromotionStatus::Active,
        }
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Promo code redeemable at checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: PromotionId,
    /// Unique, always upper case
    pub code: String,
    pub description: String,
    pub kind: PromotionKind,
    pub value: f64,
    pub usage_limit: UsageLimit,
    pub status: PromotionStatus,
    pub times_used: i64,
    pub metadata: EntityMetadata,
}

impl Promotion {
    pub fn normalize_code(code: &str) -> String {
        code.trim().to_uppercase()
    }

    pub fn from_dto(id: PromotionId, dto: &PromotionDto) -> Result<Self, String> {
        let code = dto
            .code
            .as_deref()
            .map(Self::normalize_code)
            .unwrap_or_default();
        let promotion = Self {
            id,
            code,
            description: dto.description.clone().unwrap_or_default(),
            kind: dto.kind.unwrap_or_default(),
            value: dto.value.unwrap_or_default(),
            usage_limit: dto.usage_limit.unwrap_or_default(),
            status: dto.status.unwrap_or_default(),
            times_used: 0,
            metadata: EntityMetadata::new(),
        };
        promotion.validate()?;
        Ok(promotion)
    }

    pub fn apply_patch(&mut self, dto: &PromotionDto) {
        if let Some(code) = &dto.code {
            self.code = Self::normalize_code(code);
        }
        if let Some(description) = &dto.description {
            self.description = description.clone();
        }
        if let Some(kind) = dto.kind {
            self.kind = kind;
        }
        if let Some(value) = dto.value {
            self.value = value;
        }
        if let Some(limit) = dto.usage_limit {
            self.usage_limit = limit;
        }
        if let Some(status) = dto.status {
            self.status = status;
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.code.is_empty() {
            return Err("Promo code is required".into());
        }
        if !self.value.is_finite() || self.value <= 0.0 {
            return Err("Value must be greater than zero".into());
        }
        if self.kind == PromotionKind::Percentage && self.value > 100.0 {
            return Err("Percentage cannot exceed 100".into());
        }
        Ok(())
    }

    /// Discount on `subtotal`, capped at the subtotal and rounded to cents
    pub fn discount_for(&self, subtotal: f64) -> f64 {
        let raw = match self.kind {
            PromotionKind::Percentage => subtotal * self.value / 100.0,
            PromotionKind::Fixed => self.value,
        };
        round_cents(raw.max(0.0).min(subtotal.max(0.0)))
    }

    /// Whether the code can be redeemed by an account that has already used it
    /// `uses_by_account` times
    pub fn check_redeemable(&self, uses_by_account: i64) -> Result<(), String> {
        if self.status != PromotionStatus::Active {
            return Err(format!("Promo code {} is not active", self.code));
        }
        let exhausted = match self.usage_limit {
            UsageLimit::OneTime => uses_by_account > 0,
            UsageLimit::Limited { max_uses } => self.times_used >= i64::from(max_uses),
            UsageLimit::Unlimited => false,
        };
        if exhausted {
            return Err(format!("Promo code {} has already been used up", self.code));
        }
        Ok(())
    }
}

impl AggregateRoot for Promotion {
    type Id = PromotionId;

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
        "a004"
    }

    fn collection_name() -> &'static str {
        "promotion"
    }

    fn element_name() -> &'static str {
        "Promotion"
    }

    fn list_name() -> &'static str {
        "Promotions"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PromotionDto {
    pub code: Option<String>,
    pub description: Option<String>,
    pub kind: Option<PromotionKind>,
    pub value: Option<f64>,
    pub usage_limit: Option<UsageLimit>,
    pub status: Option<PromotionStatus>,
}
