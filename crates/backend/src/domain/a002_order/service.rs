use super::repository;
use contracts::domain::a002_order::{
    CreateOrderRequest, Order, OrderCustomer, OrderId, OrderLine, OrderStatus, OrderTracking,
    Transition,
};
use contracts::domain::common::{AggregateId, AggregateRoot};
use contracts::shared::money::{format_peso, round_cents};
use contracts::system::accounts::{Account, Role};
use contracts::usecases::u502_checkout::{CheckoutDraft, CheckoutSummary, FinalizedCheckout};
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::domain::a001_menu_item::repository as menu_repository;
use crate::domain::a004_promotion::repository as promotion_repository;
use crate::shared::data::account_store::{self, ResourceKind};
use crate::shared::data::sequence::{self, ORDER_SEQUENCE};
use crate::shared::error::{AppError, AppResult};
use crate::shared::logger;
use crate::system::accounts::repository as account_repository;
use crate::usecases::u501_cart::events::CartEvents;

/// Where an order comes from; only checkout orders spend the customer's cart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSource {
    Checkout,
    Staff,
}

/// Customer snapshot taken from the account placing the order
pub fn customer_of(account: &Account) -> OrderCustomer {
    OrderCustomer {
        id: account.id.clone(),
        email: account.email.clone(),
        name: account.name.clone(),
    }
}

/// Record a new order atomically.
///
/// In one transaction: allocate the order number, insert the order, count the promo
/// redemption and, for checkout orders, drop the cart and checkout draft. Cart
/// observers are told only after the commit.
pub async fn create_order(
    db: &DatabaseConnection,
    cart_events: &CartEvents,
    customer: &OrderCustomer,
    lines: Vec<OrderLine>,
    checkout: &FinalizedCheckout,
    source: OrderSource,
) -> AppResult<Order> {
    if lines.is_empty() {
        return Err(AppError::EmptyCart);
    }

    let txn = db.begin().await?;

    let number = sequence::next_value(&txn, ORDER_SEQUENCE).await?;
    let order = Order::place(number, customer, lines, checkout);
    repository::insert(&txn, &order).await?;

    if let Some(code) = &order.promo_code {
        if !promotion_repository::record_use(&txn, code).await? {
            txn.rollback().await?;
            return Err(AppError::Validation(format!(
                "Promo code {} can no longer be used",
                code
            )));
        }
    }

    if source == OrderSource::Checkout {
        account_store::remove(&txn, &customer.id, ResourceKind::Cart).await?;
        account_store::remove(&txn, &customer.id, ResourceKind::CheckoutDraft).await?;
    }

    txn.commit().await?;

    if source == OrderSource::Checkout {
        cart_events.publish(&customer.id, 0);
    }
    logger::log(
        db,
        &Order::full_name(),
        &format!(
            "Order {} placed by {} ({} items, total {})",
            order.code,
            order.customer_email,
            order.item_count(),
            format_peso(order.total)
        ),
    );
    Ok(order)
}

/// Order entered by staff through `POST /api/orders`.
///
/// Line prices come from the request; names are copied from the catalog. Missing
/// delivery fields fall back to the customer's profile.
pub async fn create_from_request(
    db: &DatabaseConnection,
    cart_events: &CartEvents,
    request: CreateOrderRequest,
) -> AppResult<Order> {
    if request.items.is_empty() {
        return Err(AppError::Validation(
            "An order needs at least one item".into(),
        ));
    }
    let account = account_repository::get_by_id(db, &request.customer_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Customer {}", request.customer_id)))?;

    let mut lines = Vec::with_capacity(request.items.len());
    for item in &request.items {
        if item.quantity < 1 {
            return Err(AppError::Validation(
                "Quantity must be a positive integer".into(),
            ));
        }
        if !item.price.is_finite() || item.price < 0.0 {
            return Err(AppError::Validation(
                "Price must be a non-negative number".into(),
            ));
        }
        let menu_item = menu_repository::get_by_id(db, item.menu_item_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Menu item {}", item.menu_item_id)))?;
        lines.push(OrderLine {
            menu_item_id: menu_item.id,
            name: menu_item.name,
            unit_price: item.price,
            quantity: u32::try_from(item.quantity)
                .map_err(|_| AppError::Validation("Quantity is too large".into()))?,
        });
    }
    let subtotal = round_cents(lines.iter().map(OrderLine::line_total).sum());

    let draft = CheckoutDraft {
        delivery_address: request
            .delivery_address
            .or_else(|| account.address.clone())
            .unwrap_or_default(),
        contact_number: request
            .contact_number
            .or_else(|| account.contact_number.clone())
            .unwrap_or_default(),
        payment_method: request.payment_method.unwrap_or_default(),
        special_instructions: request
            .special_instructions
            .filter(|s| !s.trim().is_empty()),
        promo_code: None,
    };
    let checkout = FinalizedCheckout::from_draft(&draft, CheckoutSummary::compute(subtotal, 0.0))
        .map_err(AppError::Validation)?;

    let customer = customer_of(&account);
    create_order(db, cart_events, &customer, lines, &checkout, OrderSource::Staff).await
}

/// Look up by UUID or by code ("ORD-000042")
pub async fn get(db: &DatabaseConnection, key: &str) -> AppResult<Order> {
    let found = match OrderId::from_string(key) {
        Ok(id) => repository::get_by_id(db, id).await?,
        Err(_) => repository::get_by_code(db, key).await?,
    };
    found.ok_or_else(|| AppError::not_found(format!("Order {}", key)))
}

/// Customers only see their own orders; someone else's order reads as missing
pub async fn get_visible_to(db: &DatabaseConnection, key: &str, viewer: &Account) -> AppResult<Order> {
    let order = get(db, key).await?;
    if viewer.role != Role::Admin && !order.belongs_to(&viewer.id) {
        return Err(AppError::not_found(format!("Order {}", key)));
    }
    Ok(order)
}

pub async fn list_all(db: &DatabaseConnection) -> AppResult<Vec<Order>> {
    Ok(repository::list_all(db).await?)
}

/// Newest first
pub async fn list_for_account(db: &DatabaseConnection, account_id: &str) -> AppResult<Vec<Order>> {
    Ok(repository::list_for_customer(db, account_id).await?)
}

/// Guarded status change; repeating the current status returns the order unchanged
pub async fn update_status(db: &DatabaseConnection, key: &str, status: OrderStatus) -> AppResult<Order> {
    let mut order = get(db, key).await?;
    let from = order.status;
    if order.apply_status(status)? == Transition::Apply {
        repository::save_status(db, &order).await?;
        logger::log(
            db,
            &Order::full_name(),
            &format!("Order {} moved from {} to {}", order.code, from, status),
        );
    }
    Ok(order)
}

/// Cancellation by the customer (own orders only) or by staff
pub async fn cancel(db: &DatabaseConnection, key: &str, viewer: &Account) -> AppResult<Order> {
    let order = get_visible_to(db, key, viewer).await?;
    update_status(db, &order.to_string_id(), OrderStatus::Cancelled).await
}

pub async fn tracking(db: &DatabaseConnection, key: &str, viewer: &Account) -> AppResult<OrderTracking> {
    let order = get_visible_to(db, key, viewer).await?;
    Ok(OrderTracking::for_order(&order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_support::{seed_customer, seed_menu_item, test_db};
    use contracts::domain::a002_order::CreateOrderItem;
    use contracts::domain::a001_menu_item::MenuItemDto;
    use contracts::domain::a004_promotion::{PromotionDto, PromotionKind, UsageLimit};
    use contracts::usecases::u501_cart::Cart;

    fn checkout(subtotal: f64) -> FinalizedCheckout {
        let draft = CheckoutDraft {
            delivery_address: "12 Mabini St".into(),
            contact_number: "09123456789".into(),
            ..Default::default()
        };
        FinalizedCheckout::from_draft(&draft, CheckoutSummary::compute(subtotal, 0.0)).unwrap()
    }

    async fn place_one(db: &DatabaseConnection, account: &Account) -> Order {
        let item = seed_menu_item(db, "Kare-Kare", 299.0).await;
        let lines = vec![OrderLine {
            menu_item_id: item.id,
            name: item.name.clone(),
            unit_price: item.price,
            quantity: 2,
        }];
        let customer = customer_of(account);
        create_order(
            db,
            &CartEvents::new(),
            &customer,
            lines,
            &checkout(598.0),
            OrderSource::Checkout,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_checkout_order_spends_cart_and_draft() {
        let (_dir, db) = test_db().await;
        let account = seed_customer(&db, "a@x.com").await;
        let mut cart = Cart::new();
        let item = seed_menu_item(&db, "Sinigang", 259.0).await;
        cart.add(&item, 1).unwrap();
        account_store::save(&db, &account.id, ResourceKind::Cart, &cart).await.unwrap();
        account_store::save(&db, &account.id, ResourceKind::CheckoutDraft, &CheckoutDraft::default())
            .await
            .unwrap();

        let order = place_one(&db, &account).await;
        assert_eq!(order.total, 618.0);
        assert_eq!(order.status, OrderStatus::Pending);

        let cart: Option<Cart> = account_store::load(&db, &account.id, ResourceKind::Cart).await.unwrap();
        let draft: Option<CheckoutDraft> =
            account_store::load(&db, &account.id, ResourceKind::CheckoutDraft).await.unwrap();
        assert!(cart.is_none());
        assert!(draft.is_none());
    }

    #[tokio::test]
    async fn test_exhausted_promo_rolls_back_whole_order() {
        let (_dir, db) = test_db().await;
        let account = seed_customer(&db, "a@x.com").await;
        let item = seed_menu_item(&db, "Sinigang", 299.0).await;
        let mut cart = Cart::new();
        cart.add(&item, 2).unwrap();
        account_store::save(&db, &account.id, ResourceKind::Cart, &cart).await.unwrap();

        crate::domain::a004_promotion::service::create(
            &db,
            PromotionDto {
                code: Some("ONCE".into()),
                description: Some("single use".into()),
                kind: Some(PromotionKind::Percentage),
                value: Some(10.0),
                usage_limit: Some(UsageLimit::Limited { max_uses: 1 }),
                status: None,
            },
        )
        .await
        .unwrap();
        // Used up by another account after this checkout was finalized
        assert!(promotion_repository::record_use(&db, "ONCE").await.unwrap());

        let mut finalized = checkout(598.0);
        finalized.promo_code = Some("ONCE".into());
        finalized.summary = CheckoutSummary::compute(598.0, 59.8);
        let lines = vec![OrderLine {
            menu_item_id: item.id,
            name: item.name.clone(),
            unit_price: item.price,
            quantity: 2,
        }];
        let result = create_order(
            &db,
            &CartEvents::new(),
            &customer_of(&account),
            lines,
            &finalized,
            OrderSource::Checkout,
        )
        .await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        assert!(list_for_account(&db, &account.id).await.unwrap().is_empty());
        let kept: Option<Cart> = account_store::load(&db, &account.id, ResourceKind::Cart).await.unwrap();
        assert_eq!(kept, Some(cart));

        let next = place_one(&db, &account).await;
        assert_eq!(next.code, "ORD-000001");
    }

    #[tokio::test]
    async fn test_codes_are_unique_and_lookup_by_either_key() {
        let (_dir, db) = test_db().await;
        let account = seed_customer(&db, "a@x.com").await;
        let first = place_one(&db, &account).await;
        let second = place_one(&db, &account).await;
        assert_ne!(first.code, second.code);
        assert_eq!(first.code, "ORD-000001");

        assert_eq!(get(&db, &first.code).await.unwrap().id, first.id);
        assert_eq!(get(&db, &first.to_string_id()).await.unwrap().id, first.id);
        assert!(matches!(get(&db, "ORD-999999").await, Err(AppError::NotFound(_))));

        let mine = list_for_account(&db, &account.id).await.unwrap();
        assert_eq!(mine[0].id, second.id);
    }

    #[tokio::test]
    async fn test_snapshot_survives_catalog_changes() {
        let (_dir, db) = test_db().await;
        let account = seed_customer(&db, "a@x.com").await;
        let order = place_one(&db, &account).await;
        let item_id = order.lines[0].menu_item_id;

        crate::domain::a001_menu_item::service::update(
            &db,
            item_id,
            MenuItemDto {
                price: Some(350.0),
                name: Some("Kare-Kare Special".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let reloaded = get(&db, &order.code).await.unwrap();
        assert_eq!(reloaded.lines[0].unit_price, 299.0);
        assert_eq!(reloaded.lines[0].name, "Kare-Kare");

        crate::domain::a001_menu_item::service::delete(&db, item_id).await.unwrap();
        let reloaded = get(&db, &order.code).await.unwrap();
        assert_eq!(reloaded.lines, order.lines);
        assert_eq!(reloaded.total, 618.0);
    }

    #[tokio::test]
    async fn test_status_guard() {
        let (_dir, db) = test_db().await;
        let account = seed_customer(&db, "a@x.com").await;
        let order = place_one(&db, &account).await;
        let key = order.code.clone();

        let confirmed = update_status(&db, &key, OrderStatus::Confirmed).await.unwrap();
        assert_eq!(confirmed.timeline.len(), 2);
        assert!(matches!(
            update_status(&db, &key, OrderStatus::Pending).await,
            Err(AppError::InvalidTransition { .. })
        ));
        update_status(&db, &key, OrderStatus::Delivered).await.unwrap();
        assert!(matches!(
            cancel(&db, &key, &account).await,
            Err(AppError::InvalidTransition { .. })
        ));
        assert_eq!(get(&db, &key).await.unwrap().status, OrderStatus::Delivered);
    }

    #[tokio::test]
    async fn test_cancel_twice_is_noop_and_foreign_orders_hidden() {
        let (_dir, db) = test_db().await;
        let owner = seed_customer(&db, "a@x.com").await;
        let other = seed_customer(&db, "b@x.com").await;
        let order = place_one(&db, &owner).await;

        assert!(matches!(
            cancel(&db, &order.code, &other).await,
            Err(AppError::NotFound(_))
        ));
        let cancelled = cancel(&db, &order.code, &owner).await.unwrap();
        let again = cancel(&db, &order.code, &owner).await.unwrap();
        assert_eq!(cancelled.timeline.len(), again.timeline.len());
        assert_eq!(again.status, OrderStatus::Cancelled);

        let tracking = tracking(&db, &order.code, &owner).await.unwrap();
        assert!(tracking.cancelled);
        assert_eq!(tracking.progress_percent, None);
    }

    #[tokio::test]
    async fn test_staff_order_uses_profile_and_request_prices() {
        let (_dir, db) = test_db().await;
        let account = seed_customer(&db, "a@x.com").await;
        let item = seed_menu_item(&db, "Chef Salad", 199.0).await;

        let request = CreateOrderRequest {
            customer_id: account.id.clone(),
            items: vec![CreateOrderItem {
                menu_item_id: item.id,
                quantity: 3,
                price: 180.0,
            }],
            delivery_address: Some("5 Rizal Ave".into()),
            contact_number: None,
            payment_method: None,
            special_instructions: None,
        };
        let order = create_from_request(&db, &CartEvents::new(), request).await.unwrap();
        assert_eq!(order.subtotal, 540.0);
        assert_eq!(order.total, 560.0);
        assert_eq!(order.contact_number, "09123456789");
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_staff_order_validation() {
        let (_dir, db) = test_db().await;
        let request = CreateOrderRequest {
            customer_id: "nobody".into(),
            items: vec![],
            delivery_address: None,
            contact_number: None,
            payment_method: None,
            special_instructions: None,
        };
        assert!(matches!(
            create_from_request(&db, &CartEvents::new(), request).await,
            Err(AppError::Validation(_))
        ));
    }
}
