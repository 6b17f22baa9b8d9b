use super::repository;
use contracts::domain::a001_menu_item::{MenuItem, MenuItemDto, MenuItemId};
use contracts::domain::common::AggregateRoot;
use sea_orm::DatabaseConnection;

use crate::shared::error::{AppError, AppResult};
use crate::shared::logger;

pub async fn list(db: &DatabaseConnection) -> AppResult<Vec<MenuItem>> {
    Ok(repository::list_all(db).await?)
}

pub async fn get(db: &DatabaseConnection, id: MenuItemId) -> AppResult<MenuItem> {
    repository::get_by_id(db, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {}", id)))
}

pub async fn create(db: &DatabaseConnection, dto: MenuItemDto) -> AppResult<MenuItem> {
    let mut item = MenuItem::from_dto(MenuItemId(0), &dto).map_err(AppError::Validation)?;
    item.metadata.before_write();
    let item = repository::insert(db, &item).await?;
    logger::log(
        db,
        &MenuItem::full_name(),
        &format!("Menu item {} '{}' created", item.id, item.name),
    );
    Ok(item)
}

/// Patch an item; orders placed earlier keep their own copy of name and price
pub async fn update(db: &DatabaseConnection, id: MenuItemId, dto: MenuItemDto) -> AppResult<MenuItem> {
    let mut item = get(db, id).await?;
    item.apply_patch(&dto);
    item.validate().map_err(AppError::Validation)?;
    item.metadata.before_write();
    repository::update(db, &item).await?;
    logger::log(
        db,
        &MenuItem::full_name(),
        &format!("Menu item {} '{}' updated", item.id, item.name),
    );
    Ok(item)
}

pub async fn delete(db: &DatabaseConnection, id: MenuItemId) -> AppResult<()> {
    if !repository::soft_delete(db, id).await? {
        return Err(AppError::not_found(format!("Menu item {}", id)));
    }
    logger::log(db, &MenuItem::full_name(), &format!("Menu item {} deleted", id));
    Ok(())
}
