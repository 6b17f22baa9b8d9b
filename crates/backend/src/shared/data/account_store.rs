//! Per-account keyed state: the cart, the checkout draft and favorites.
//!
//! Each resource is one JSON document addressed by `(account_id, kind)`.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, EntityTrait, Set};
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Cart,
    CheckoutDraft,
    Favorites,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Cart => "cart",
            ResourceKind::CheckoutDraft => "checkout_draft",
            ResourceKind::Favorites => "favorites",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sys_account_state")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub account_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub kind: String,
    pub payload_json: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub async fn load<C, T>(conn: &C, account_id: &str, kind: ResourceKind) -> anyhow::Result<Option<T>>
where
    C: ConnectionTrait,
    T: DeserializeOwned,
{
    let row = Entity::find_by_id((account_id.to_string(), kind.as_str().to_string()))
        .one(conn)
        .await?;
    match row {
        Some(m) => Ok(Some(serde_json::from_str(&m.payload_json)?)),
        None => Ok(None),
    }
}

/// Load, or the resource's default when the account has none yet
pub async fn load_or_default<C, T>(conn: &C, account_id: &str, kind: ResourceKind) -> anyhow::Result<T>
where
    C: ConnectionTrait,
    T: DeserializeOwned + Default,
{
    Ok(load(conn, account_id, kind).await?.unwrap_or_default())
}

/// Insert or replace the resource
pub async fn save<C, T>(conn: &C, account_id: &str, kind: ResourceKind, value: &T) -> anyhow::Result<()>
where
    C: ConnectionTrait,
    T: Serialize,
{
    let active = ActiveModel {
        account_id: Set(account_id.to_string()),
        kind: Set(kind.as_str().to_string()),
        payload_json: Set(serde_json::to_string(value)?),
        updated_at: Set(Utc::now().to_rfc3339()),
    };
    Entity::insert(active)
        .on_conflict(
            OnConflict::columns([Column::AccountId, Column::Kind])
                .update_columns([Column::PayloadJson, Column::UpdatedAt])
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

/// Returns whether anything was stored
pub async fn remove<C: ConnectionTrait>(conn: &C, account_id: &str, kind: ResourceKind) -> anyhow::Result<bool> {
    let result = Entity::delete_many()
        .filter(Column::AccountId.eq(account_id))
        .filter(Column::Kind.eq(kind.as_str()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Drop every resource of an account
pub async fn remove_all<C: ConnectionTrait>(conn: &C, account_id: &str) -> anyhow::Result<u64> {
    let result = Entity::delete_many()
        .filter(Column::AccountId.eq(account_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_support::test_db;

    #[tokio::test]
    async fn test_resources_are_isolated_per_account_and_kind() {
        let (_dir, conn) = test_db().await;
        save(&conn, "a", ResourceKind::Cart, &vec![1, 2]).await.unwrap();
        save(&conn, "a", ResourceKind::Favorites, &vec![9]).await.unwrap();
        save(&conn, "b", ResourceKind::Cart, &vec![3]).await.unwrap();

        let a_cart: Vec<i32> = load_or_default(&conn, "a", ResourceKind::Cart).await.unwrap();
        let b_cart: Vec<i32> = load_or_default(&conn, "b", ResourceKind::Cart).await.unwrap();
        let b_favs: Vec<i32> = load_or_default(&conn, "b", ResourceKind::Favorites).await.unwrap();
        assert_eq!(a_cart, vec![1, 2]);
        assert_eq!(b_cart, vec![3]);
        assert!(b_favs.is_empty());
    }

    #[tokio::test]
    async fn test_save_replaces_and_remove_is_idempotent() {
        let (_dir, conn) = test_db().await;
        save(&conn, "a", ResourceKind::CheckoutDraft, &"first").await.unwrap();
        save(&conn, "a", ResourceKind::CheckoutDraft, &"second").await.unwrap();
        let draft: Option<String> = load(&conn, "a", ResourceKind::CheckoutDraft).await.unwrap();
        assert_eq!(draft.as_deref(), Some("second"));

        assert!(remove(&conn, "a", ResourceKind::CheckoutDraft).await.unwrap());
        assert!(!remove(&conn, "a", ResourceKind::CheckoutDraft).await.unwrap());
    }
}
