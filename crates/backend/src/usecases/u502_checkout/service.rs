use contracts::domain::a002_order::{Order, OrderLine};
use contracts::system::accounts::Account;
use contracts::usecases::u501_cart::Cart;
use contracts::usecases::u502_checkout::{
    CheckoutDraft, CheckoutDraftPatch, CheckoutSummary, CheckoutView, FinalizedCheckout,
};
use sea_orm::DatabaseConnection;

use crate::domain::a002_order::service::{self as order_service, OrderSource};
use crate::domain::a004_promotion::service as promotion_service;
use crate::shared::data::account_store::{self, ResourceKind};
use crate::shared::error::{AppError, AppResult};
use crate::usecases::u501_cart::events::CartEvents;
use crate::usecases::u501_cart::service as cart_service;

async fn load_draft(db: &DatabaseConnection, account_id: &str) -> AppResult<Option<CheckoutDraft>> {
    Ok(account_store::load(db, account_id, ResourceKind::CheckoutDraft).await?)
}

async fn non_empty_cart(db: &DatabaseConnection, account_id: &str) -> AppResult<Cart> {
    let cart = cart_service::load(db, account_id).await?;
    if cart.is_empty() {
        return Err(AppError::EmptyCart);
    }
    Ok(cart)
}

/// Totals for the current cart; an unusable promo code simply gives no discount here
async fn preview(db: &DatabaseConnection, account_id: &str, cart: &Cart, draft: &CheckoutDraft) -> AppResult<CheckoutSummary> {
    let subtotal = cart.subtotal();
    let discount = match &draft.promo_code {
        Some(code) => match promotion_service::resolve_discount(db, account_id, code, subtotal).await {
            Ok((_, discount)) => discount,
            Err(AppError::Validation(reason)) => {
                tracing::debug!("promo {} not applied for {}: {}", code, account_id, reason);
                0.0
            }
            Err(e) => return Err(e),
        },
        None => 0.0,
    };
    Ok(CheckoutSummary::compute(subtotal, discount))
}

async fn view(db: &DatabaseConnection, account_id: &str, cart: &Cart, draft: CheckoutDraft) -> AppResult<CheckoutView> {
    let summary = preview(db, account_id, cart, &draft).await?;
    Ok(CheckoutView {
        draft,
        cart: cart.view(),
        summary,
    })
}

/// Open checkout for a non-empty cart. A new draft is prefilled from the profile;
/// an existing one is kept so a reload does not lose typed fields.
pub async fn start(db: &DatabaseConnection, account: &Account) -> AppResult<CheckoutView> {
    let cart = non_empty_cart(db, &account.id).await?;
    let draft = match load_draft(db, &account.id).await? {
        Some(draft) => draft,
        None => {
            let draft = CheckoutDraft {
                delivery_address: account.address.clone().unwrap_or_default(),
                contact_number: account.contact_number.clone().unwrap_or_default(),
                ..Default::default()
            };
            account_store::save(db, &account.id, ResourceKind::CheckoutDraft, &draft).await?;
            draft
        }
    };
    view(db, &account.id, &cart, draft).await
}

pub async fn get_draft(db: &DatabaseConnection, account: &Account) -> AppResult<CheckoutView> {
    let cart = cart_service::load(db, &account.id).await?;
    let draft = load_draft(db, &account.id)
        .await?
        .ok_or_else(|| AppError::not_found("Checkout draft"))?;
    view(db, &account.id, &cart, draft).await
}

/// Merge the given fields; validation waits for [`finalize`]
pub async fn update_draft(
    db: &DatabaseConnection,
    account: &Account,
    patch: CheckoutDraftPatch,
) -> AppResult<CheckoutView> {
    let cart = cart_service::load(db, &account.id).await?;
    let mut draft = load_draft(db, &account.id)
        .await?
        .ok_or_else(|| AppError::not_found("Checkout draft"))?;
    draft.merge(patch);
    account_store::save(db, &account.id, ResourceKind::CheckoutDraft, &draft).await?;
    view(db, &account.id, &cart, draft).await
}

/// Validate the draft and price it. Writes nothing.
pub async fn finalize(db: &DatabaseConnection, account: &Account) -> AppResult<(Cart, FinalizedCheckout)> {
    let cart = non_empty_cart(db, &account.id).await?;
    let draft = load_draft(db, &account.id)
        .await?
        .ok_or_else(|| AppError::Validation("Checkout has not been started".into()))?;

    let subtotal = cart.subtotal();
    let discount = match &draft.promo_code {
        Some(code) => promotion_service::resolve_discount(db, &account.id, code, subtotal).await?.1,
        None => 0.0,
    };
    let checkout = FinalizedCheckout::from_draft(&draft, CheckoutSummary::compute(subtotal, discount))
        .map_err(AppError::Validation)?;
    Ok((cart, checkout))
}

/// Finalize and turn the cart into an order
pub async fn place_order(db: &DatabaseConnection, events: &CartEvents, account: &Account) -> AppResult<Order> {
    let (cart, checkout) = finalize(db, account).await?;
    let lines: Vec<OrderLine> = cart.lines().iter().map(OrderLine::from).collect();
    order_service::create_order(
        db,
        events,
        &order_service::customer_of(account),
        lines,
        &checkout,
        OrderSource::Checkout,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_support::{seed_customer, seed_menu_item, test_db};
    use contracts::domain::a002_order::OrderStatus;
    use contracts::domain::a004_promotion::{PromotionDto, PromotionKind, UsageLimit};
    use contracts::usecases::u501_cart::AddToCartRequest;

    async fn fill_cart(db: &DatabaseConnection, events: &CartEvents, account: &Account) {
        let item = seed_menu_item(db, "Kare-Kare", 299.0).await;
        cart_service::add_item(
            db,
            events,
            &account.id,
            AddToCartRequest {
                menu_item_id: item.id,
                quantity: 2,
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_start_requires_items() {
        let (_dir, db) = test_db().await;
        let account = seed_customer(&db, "a@x.com").await;
        assert!(matches!(start(&db, &account).await, Err(AppError::EmptyCart)));
    }

    #[tokio::test]
    async fn test_kare_kare_checkout() {
        let (_dir, db) = test_db().await;
        let events = CartEvents::new();
        let account = seed_customer(&db, "a@x.com").await;
        fill_cart(&db, &events, &account).await;

        let view = start(&db, &account).await.unwrap();
        assert_eq!(view.draft.contact_number, "09123456789");
        assert_eq!(view.summary.subtotal, 598.0);
        assert_eq!(view.summary.total, 618.0);

        let mut rx = events.subscribe();
        let order = place_order(&db, &events, &account).await.unwrap();
        assert_eq!(order.total, 618.0);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.lines[0].quantity, 2);
        assert_eq!(rx.recv().await.unwrap().item_count, 0);

        assert!(cart_service::get_cart(&db, &account.id).await.unwrap().lines.is_empty());
        assert!(matches!(get_draft(&db, &account).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            place_order(&db, &events, &account).await,
            Err(AppError::EmptyCart)
        ));
    }

    #[tokio::test]
    async fn test_finalize_lists_missing_fields() {
        let (_dir, db) = test_db().await;
        let events = CartEvents::new();
        let account = seed_customer(&db, "a@x.com").await;
        fill_cart(&db, &events, &account).await;
        start(&db, &account).await.unwrap();
        update_draft(
            &db,
            &account,
            CheckoutDraftPatch {
                delivery_address: Some("  ".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        match place_order(&db, &events, &account).await {
            Err(AppError::Validation(msg)) => assert!(msg.contains("deliveryAddress")),
            other => panic!("expected validation error, got {:?}", other),
        }
        // nothing was spent
        assert_eq!(cart_service::get_cart(&db, &account.id).await.unwrap().item_count, 2);
    }

    #[tokio::test]
    async fn test_one_time_promo_is_spent_by_the_order() {
        let (_dir, db) = test_db().await;
        let events = CartEvents::new();
        let account = seed_customer(&db, "a@x.com").await;
        promotion_service::create(
            &db,
            PromotionDto {
                code: Some("WELCOME10".into()),
                kind: Some(PromotionKind::Percentage),
                value: Some(10.0),
                usage_limit: Some(UsageLimit::OneTime),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        fill_cart(&db, &events, &account).await;
        start(&db, &account).await.unwrap();
        let view = update_draft(
            &db,
            &account,
            CheckoutDraftPatch {
                promo_code: Some("welcome10".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(view.summary.discount, 59.8);
        assert_eq!(view.summary.total, 558.2);

        let order = place_order(&db, &events, &account).await.unwrap();
        assert_eq!(order.promo_code.as_deref(), Some("WELCOME10"));
        assert_eq!(order.total, 558.2);

        fill_cart(&db, &events, &account).await;
        start(&db, &account).await.unwrap();
        update_draft(
            &db,
            &account,
            CheckoutDraftPatch {
                promo_code: Some("WELCOME10".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(matches!(
            place_order(&db, &events, &account).await,
            Err(AppError::Validation(_))
        ));
    }
}
