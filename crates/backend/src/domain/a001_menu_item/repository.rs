use chrono::Utc;
use contracts::domain::a001_menu_item::{Availability, MenuItem, MenuItemId};
use contracts::domain::common::EntityMetadata;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a001_menu_item")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image: Option<String>,
    pub availability: String,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for MenuItem {
    fn from(m: Model) -> Self {
        MenuItem {
            id: MenuItemId(m.id),
            name: m.name,
            description: m.description,
            price: m.price,
            category: m.category,
            image: m.image,
            availability: Availability::parse(&m.availability).unwrap_or_default(),
            metadata: EntityMetadata {
                created_at: m.created_at.unwrap_or_else(Utc::now),
                updated_at: m.updated_at.unwrap_or_else(Utc::now),
                is_deleted: m.is_deleted,
                version: m.version,
            },
        }
    }
}

/// Live (not deleted) items, oldest first
pub async fn list_all<C: ConnectionTrait>(conn: &C) -> anyhow::Result<Vec<MenuItem>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_asc(Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id<C: ConnectionTrait>(conn: &C, id: MenuItemId) -> anyhow::Result<Option<MenuItem>> {
    let result = Entity::find_by_id(id.value())
        .filter(Column::IsDeleted.eq(false))
        .one(conn)
        .await?;
    Ok(result.map(Into::into))
}

/// Case-insensitive lookup among live items
pub async fn find_by_name<C: ConnectionTrait>(conn: &C, name: &str) -> anyhow::Result<Option<MenuItem>> {
    let wanted = name.trim().to_lowercase();
    let found = list_all(conn)
        .await?
        .into_iter()
        .find(|item| item.name.to_lowercase() == wanted);
    Ok(found)
}

/// Insert and return the item with its assigned id
pub async fn insert<C: ConnectionTrait>(conn: &C, item: &MenuItem) -> anyhow::Result<MenuItem> {
    let active = ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        name: Set(item.name.clone()),
        description: Set(item.description.clone()),
        price: Set(item.price),
        category: Set(item.category.clone()),
        image: Set(item.image.clone()),
        availability: Set(item.availability.as_str().to_string()),
        is_deleted: Set(item.metadata.is_deleted),
        created_at: Set(Some(item.metadata.created_at)),
        updated_at: Set(Some(item.metadata.updated_at)),
        version: Set(item.metadata.version),
    };
    let model = active.insert(conn).await?;
    Ok(model.into())
}

pub async fn update<C: ConnectionTrait>(conn: &C, item: &MenuItem) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(item.id.value()),
        name: Set(item.name.clone()),
        description: Set(item.description.clone()),
        price: Set(item.price),
        category: Set(item.category.clone()),
        image: Set(item.image.clone()),
        availability: Set(item.availability.as_str().to_string()),
        is_deleted: Set(item.metadata.is_deleted),
        updated_at: Set(Some(item.metadata.updated_at)),
        version: Set(item.metadata.version),
        created_at: sea_orm::ActiveValue::NotSet,
    };
    active.update(conn).await?;
    Ok(())
}

/// Returns false when no live item has this id
pub async fn soft_delete<C: ConnectionTrait>(conn: &C, id: MenuItemId) -> anyhow::Result<bool> {
    let result = Entity::update_many()
        .col_expr(Column::IsDeleted, Expr::value(true))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id.value()))
        .filter(Column::IsDeleted.eq(false))
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}
