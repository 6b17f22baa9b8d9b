use contracts::domain::a001_menu_item::MenuItemId;
use contracts::usecases::u501_cart::{AddToCartRequest, Cart, CartView};
use sea_orm::DatabaseConnection;

use super::events::CartEvents;
use crate::domain::a001_menu_item::repository as menu_repository;
use crate::shared::data::account_store::{self, ResourceKind};
use crate::shared::error::{AppError, AppResult};

pub async fn load(db: &DatabaseConnection, account_id: &str) -> AppResult<Cart> {
    Ok(account_store::load_or_default(db, account_id, ResourceKind::Cart).await?)
}

async fn store(db: &DatabaseConnection, events: &CartEvents, account_id: &str, cart: &Cart) -> AppResult<()> {
    if cart.is_empty() {
        account_store::remove(db, account_id, ResourceKind::Cart).await?;
    } else {
        account_store::save(db, account_id, ResourceKind::Cart, cart).await?;
    }
    events.publish(account_id, cart.item_count());
    Ok(())
}

pub async fn get_cart(db: &DatabaseConnection, account_id: &str) -> AppResult<CartView> {
    Ok(load(db, account_id).await?.view())
}

/// Add `quantity` of a live, orderable menu item; merges into an existing line
pub async fn add_item(
    db: &DatabaseConnection,
    events: &CartEvents,
    account_id: &str,
    request: AddToCartRequest,
) -> AppResult<CartView> {
    let item = menu_repository::get_by_id(db, request.menu_item_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {}", request.menu_item_id)))?;
    if !item.availability.can_order() {
        return Err(AppError::Validation(format!("{} is out of stock", item.name)));
    }

    let mut cart = load(db, account_id).await?;
    cart.add(&item, request.quantity).map_err(AppError::Validation)?;
    store(db, events, account_id, &cart).await?;
    tracing::debug!("{} added {} x {}", account_id, request.quantity, item.name);
    Ok(cart.view())
}

/// Removing a line that is not there changes nothing
pub async fn remove_item(
    db: &DatabaseConnection,
    events: &CartEvents,
    account_id: &str,
    menu_item_id: MenuItemId,
) -> AppResult<CartView> {
    let mut cart = load(db, account_id).await?;
    if cart.remove(menu_item_id) {
        store(db, events, account_id, &cart).await?;
    }
    Ok(cart.view())
}

/// Quantities below 1 remove the line
pub async fn set_quantity(
    db: &DatabaseConnection,
    events: &CartEvents,
    account_id: &str,
    menu_item_id: MenuItemId,
    quantity: i64,
) -> AppResult<CartView> {
    let mut cart = load(db, account_id).await?;
    if cart.set_quantity(menu_item_id, quantity) {
        store(db, events, account_id, &cart).await?;
    }
    Ok(cart.view())
}
