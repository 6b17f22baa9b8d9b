use super::repository;
use contracts::domain::a004_promotion::{Promotion, PromotionDto, PromotionId};
use contracts::domain::common::AggregateRoot;
use sea_orm::{ConnectionTrait, DatabaseConnection};

use crate::domain::a002_order::repository as order_repository;
use crate::shared::error::{AppError, AppResult};
use crate::shared::logger;

pub async fn list(db: &DatabaseConnection) -> AppResult<Vec<Promotion>> {
    Ok(repository::list_all(db).await?)
}

pub async fn get(db: &DatabaseConnection, id: PromotionId) -> AppResult<Promotion> {
    repository::get_by_id(db, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Promotion {}", id.value())))
}

async fn ensure_code_free(db: &DatabaseConnection, code: &str, own: Option<PromotionId>) -> AppResult<()> {
    if let Some(existing) = repository::get_by_code(db, code).await? {
        if Some(existing.id) != own {
            return Err(AppError::Conflict(format!(
                "Promo code {} already exists",
                existing.code
            )));
        }
    }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, dto: PromotionDto) -> AppResult<Promotion> {
    let mut promotion = Promotion::from_dto(PromotionId(0), &dto).map_err(AppError::Validation)?;
    ensure_code_free(db, &promotion.code, None).await?;
    promotion.metadata.before_write();
    let promotion = repository::insert(db, &promotion).await?;
    logger::log(db, &Promotion::full_name(), &format!("Promotion {} created", promotion.code));
    Ok(promotion)
}

pub async fn update(db: &DatabaseConnection, id: PromotionId, dto: PromotionDto) -> AppResult<Promotion> {
    let mut promotion = get(db, id).await?;
    promotion.apply_patch(&dto);
    promotion.validate().map_err(AppError::Validation)?;
    ensure_code_free(db, &promotion.code, Some(id)).await?;
    promotion.metadata.before_write();
    repository::update(db, &promotion).await?;
    logger::log(db, &Promotion::full_name(), &format!("Promotion {} updated", promotion.code));
    Ok(promotion)
}

pub async fn delete(db: &DatabaseConnection, id: PromotionId) -> AppResult<()> {
    if !repository::delete(db, id).await? {
        return Err(AppError::not_found(format!("Promotion {}", id.value())));
    }
    logger::log(db, &Promotion::full_name(), &format!("Promotion {} deleted", id.value()));
    Ok(())
}

/// Switch between Active and Inactive
pub async fn toggle(db: &DatabaseConnection, id: PromotionId) -> AppResult<Promotion> {
    let mut promotion = get(db, id).await?;
    promotion.status = promotion.status.toggled();
    promotion.metadata.before_write();
    repository::update(db, &promotion).await?;
    logger::log(
        db,
        &Promotion::full_name(),
        &format!("Promotion {} is now {}", promotion.code, promotion.status.as_str()),
    );
    Ok(promotion)
}

/// Resolve a code for `account_id` and compute its discount on `subtotal`.
///
/// Unknown, inactive and used-up codes are validation errors.
pub async fn resolve_discount<C: ConnectionTrait>(
    conn: &C,
    account_id: &str,
    code: &str,
    subtotal: f64,
) -> AppResult<(Promotion, f64)> {
    let promotion = repository::get_by_code(conn, code)
        .await?
        .ok_or_else(|| AppError::Validation(format!("Promo code {} is not valid", code)))?;
    let uses = order_repository::count_promo_uses(conn, account_id, &promotion.code).await?;
    promotion
        .check_redeemable(uses)
        .map_err(AppError::Validation)?;
    let discount = promotion.discount_for(subtotal);
    Ok((promotion, discount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_support::test_db;
    use contracts::domain::a004_promotion::{PromotionKind, PromotionStatus, UsageLimit};

    fn welcome() -> PromotionDto {
        PromotionDto {
            code: Some("welcome10".into()),
            description: Some("10% off".into()),
            kind: Some(PromotionKind::Percentage),
            value: Some(10.0),
            usage_limit: Some(UsageLimit::Limited { max_uses: 1 }),
            status: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_code_conflicts() {
        let (_dir, db) = test_db().await;
        create(&db, welcome()).await.unwrap();
        assert!(matches!(create(&db, welcome()).await, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_toggle_blocks_redemption() {
        let (_dir, db) = test_db().await;
        let promo = create(&db, welcome()).await.unwrap();
        let (_, discount) = resolve_discount(&db, "acc", "Welcome10", 598.0).await.unwrap();
        assert_eq!(discount, 59.8);

        let toggled = toggle(&db, promo.id).await.unwrap();
        assert_eq!(toggled.status, PromotionStatus::Inactive);
        assert!(matches!(
            resolve_discount(&db, "acc", "WELCOME10", 598.0).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_record_use_respects_global_cap() {
        let (_dir, db) = test_db().await;
        create(&db, welcome()).await.unwrap();
        assert!(repository::record_use(&db, "WELCOME10").await.unwrap());
        assert!(!repository::record_use(&db, "WELCOME10").await.unwrap());
        assert!(matches!(
            resolve_discount(&db, "acc", "WELCOME10", 100.0).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_code_and_missing_id() {
        let (_dir, db) = test_db().await;
        assert!(matches!(
            resolve_discount(&db, "acc", "NOPE", 100.0).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            delete(&db, PromotionId(42)).await,
            Err(AppError::NotFound(_))
        ));
    }
}
