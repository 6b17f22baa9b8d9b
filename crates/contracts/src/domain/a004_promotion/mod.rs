pub mod aggregate;

pub use aggregate::{
    Promotion, PromotionDto, PromotionId, PromotionKind, PromotionStatus, UsageLimit,
};
