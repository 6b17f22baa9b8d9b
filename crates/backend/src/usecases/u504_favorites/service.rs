use contracts::domain::a001_menu_item::{MenuItem, MenuItemId};
use contracts::usecases::u504_favorites::{FavoriteToggled, Favorites};
use sea_orm::DatabaseConnection;

use crate::domain::a001_menu_item::repository as menu_repository;
use crate::shared::data::account_store::{self, ResourceKind};
use crate::shared::error::{AppError, AppResult};

/// Star or unstar a live menu item. Unstarring works even after the item was deleted.
pub async fn toggle(db: &DatabaseConnection, account_id: &str, menu_item_id: MenuItemId) -> AppResult<FavoriteToggled> {
    let mut favorites: Favorites =
        account_store::load_or_default(db, account_id, ResourceKind::Favorites).await?;
    if !favorites.contains(menu_item_id) && menu_repository::get_by_id(db, menu_item_id).await?.is_none() {
        return Err(AppError::not_found(format!("Menu item {}", menu_item_id)));
    }
    let favorite = favorites.toggle(menu_item_id);
    account_store::save(db, account_id, ResourceKind::Favorites, &favorites).await?;
    Ok(FavoriteToggled {
        menu_item_id,
        favorite,
    })
}

/// Current catalog entries for the starred ids; deleted items are left out
pub async fn list(db: &DatabaseConnection, account_id: &str) -> AppResult<Vec<MenuItem>> {
    let favorites: Favorites =
        account_store::load_or_default(db, account_id, ResourceKind::Favorites).await?;
    let mut items = Vec::with_capacity(favorites.ids().len());
    for id in favorites.ids() {
        if let Some(item) = menu_repository::get_by_id(db, *id).await? {
            items.push(item);
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_support::{seed_menu_item, test_db};

    #[tokio::test]
    async fn test_toggle_and_list_skip_deleted() {
        let (_dir, db) = test_db().await;
        let salad = seed_menu_item(&db, "Chef Salad", 199.0).await;
        let pasta = seed_menu_item(&db, "Spaghetti Bolognese", 249.0).await;

        assert!(toggle(&db, "a", salad.id).await.unwrap().favorite);
        assert!(toggle(&db, "a", pasta.id).await.unwrap().favorite);
        assert_eq!(list(&db, "a").await.unwrap().len(), 2);
        assert!(list(&db, "b").await.unwrap().is_empty());

        crate::domain::a001_menu_item::service::delete(&db, salad.id).await.unwrap();
        let names: Vec<String> = list(&db, "a").await.unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["Spaghetti Bolognese".to_string()]);

        assert!(!toggle(&db, "a", salad.id).await.unwrap().favorite);
        assert!(matches!(
            toggle(&db, "a", salad.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
