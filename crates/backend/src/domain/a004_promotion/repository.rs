use chrono::Utc;
use contracts::domain::a004_promotion::{
    Promotion, PromotionId, PromotionKind, PromotionStatus, UsageLimit,
};
use contracts::domain::common::EntityMetadata;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseBackend, EntityTrait, QueryFilter, QueryOrder, Set, Statement};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a004_promotion")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub code: String,
    pub description: String,
    pub kind: String,
    pub value: f64,
    pub usage_limit: String,
    pub usage_max: Option<i64>,
    pub status: String,
    pub times_used: i64,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Promotion {
    fn from(m: Model) -> Self {
        Promotion {
            id: PromotionId(m.id),
            code: m.code,
            description: m.description,
            kind: PromotionKind::parse(&m.kind).unwrap_or_default(),
            value: m.value,
            usage_limit: UsageLimit::from_parts(&m.usage_limit, m.usage_max).unwrap_or_default(),
            status: PromotionStatus::parse(&m.status).unwrap_or(PromotionStatus::Inactive),
            times_used: m.times_used,
            metadata: EntityMetadata {
                created_at: m.created_at.unwrap_or_else(Utc::now),
                updated_at: m.updated_at.unwrap_or_else(Utc::now),
                is_deleted: m.is_deleted,
                version: m.version,
            },
        }
    }
}

fn to_active(p: &Promotion) -> ActiveModel {
    let (usage_limit, usage_max) = p.usage_limit.to_parts();
    ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        code: Set(p.code.clone()),
        description: Set(p.description.clone()),
        kind: Set(p.kind.as_str().to_string()),
        value: Set(p.value),
        usage_limit: Set(usage_limit.to_string()),
        usage_max: Set(usage_max),
        status: Set(p.status.as_str().to_string()),
        times_used: Set(p.times_used),
        is_deleted: Set(p.metadata.is_deleted),
        created_at: Set(Some(p.metadata.created_at)),
        updated_at: Set(Some(p.metadata.updated_at)),
        version: Set(p.metadata.version),
    }
}

pub async fn list_all<C: ConnectionTrait>(conn: &C) -> anyhow::Result<Vec<Promotion>> {
    let items = Entity::find()
        .order_by_asc(Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id<C: ConnectionTrait>(conn: &C, id: PromotionId) -> anyhow::Result<Option<Promotion>> {
    Ok(Entity::find_by_id(id.value()).one(conn).await?.map(Into::into))
}

pub async fn get_by_code<C: ConnectionTrait>(conn: &C, code: &str) -> anyhow::Result<Option<Promotion>> {
    let model = Entity::find()
        .filter(Column::Code.eq(Promotion::normalize_code(code)))
        .one(conn)
        .await?;
    Ok(model.map(Into::into))
}

pub async fn insert<C: ConnectionTrait>(conn: &C, promotion: &Promotion) -> anyhow::Result<Promotion> {
    let model = to_active(promotion).insert(conn).await?;
    Ok(model.into())
}

/// Writes the editable fields; `times_used` is only changed by [`record_use`]
pub async fn update<C: ConnectionTrait>(conn: &C, promotion: &Promotion) -> anyhow::Result<()> {
    let mut active = to_active(promotion);
    active.id = Set(promotion.id.value());
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.times_used = sea_orm::ActiveValue::NotSet;
    active.update(conn).await?;
    Ok(())
}

pub async fn delete<C: ConnectionTrait>(conn: &C, id: PromotionId) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.value()).exec(conn).await?;
    Ok(result.rows_affected > 0)
}

/// Count one redemption of an active code unless its global cap is reached.
///
/// Returns false when nothing was recorded.
pub async fn record_use<C: ConnectionTrait>(conn: &C, code: &str) -> anyhow::Result<bool> {
    let result = conn
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            r#"
            UPDATE a004_promotion
            SET times_used = times_used + 1, updated_at = ?
            WHERE code = ? AND status = 'Active'
              AND (usage_limit != 'Limited' OR times_used < usage_max);
            "#,
            [Utc::now().into(), Promotion::normalize_code(code).into()],
        ))
        .await?;
    Ok(result.rows_affected() > 0)
}
