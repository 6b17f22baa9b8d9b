use anyhow::Result;
use chrono::Utc;
use contracts::domain::a003_complaint::{Complaint, ComplaintId, ComplaintStatus};
use contracts::domain::common::EntityMetadata;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a003_complaint")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub customer_id: String,
    pub customer_email: String,
    pub order_id: Option<String>,
    pub order_code: Option<String>,
    pub issue: Option<String>,
    pub description: String,
    pub image_ref: Option<String>,
    pub status: String,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Complaint {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> Result<Self> {
        let status = ComplaintStatus::parse(&m.status)
            .ok_or_else(|| anyhow::anyhow!("complaint {}: unknown status '{}'", m.code, m.status))?;
        Ok(Complaint {
            id: ComplaintId::new(Uuid::parse_str(&m.id)?),
            code: m.code,
            customer_id: m.customer_id,
            customer_email: m.customer_email,
            order_id: m.order_id,
            order_code: m.order_code,
            issue: m.issue,
            description: m.description,
            image_ref: m.image_ref,
            status,
            metadata: EntityMetadata {
                created_at: m.created_at.unwrap_or_else(Utc::now),
                updated_at: m.updated_at.unwrap_or_else(Utc::now),
                is_deleted: m.is_deleted,
                version: m.version,
            },
        })
    }
}

fn to_complaints(models: Vec<Model>) -> Result<Vec<Complaint>> {
    models.into_iter().map(Complaint::try_from).collect()
}

pub async fn insert<C: ConnectionTrait>(conn: &C, complaint: &Complaint) -> Result<()> {
    let active = ActiveModel {
        id: Set(complaint.id.value().to_string()),
        code: Set(complaint.code.clone()),
        customer_id: Set(complaint.customer_id.clone()),
        customer_email: Set(complaint.customer_email.clone()),
        order_id: Set(complaint.order_id.clone()),
        order_code: Set(complaint.order_code.clone()),
        issue: Set(complaint.issue.clone()),
        description: Set(complaint.description.clone()),
        image_ref: Set(complaint.image_ref.clone()),
        status: Set(complaint.status.as_str().to_string()),
        is_deleted: Set(false),
        created_at: Set(Some(complaint.metadata.created_at)),
        updated_at: Set(Some(complaint.metadata.updated_at)),
        version: Set(complaint.metadata.version),
    };
    Entity::insert(active).exec_without_returning(conn).await?;
    Ok(())
}

pub async fn save_status<C: ConnectionTrait>(conn: &C, complaint: &Complaint) -> Result<()> {
    let active = ActiveModel {
        id: Set(complaint.id.value().to_string()),
        status: Set(complaint.status.as_str().to_string()),
        updated_at: Set(Some(complaint.metadata.updated_at)),
        version: Set(complaint.metadata.version),
        ..Default::default()
    };
    active.update(conn).await?;
    Ok(())
}

pub async fn get_by_id<C: ConnectionTrait>(conn: &C, id: ComplaintId) -> Result<Option<Complaint>> {
    match Entity::find_by_id(id.value().to_string()).one(conn).await? {
        Some(m) => Ok(Some(m.try_into()?)),
        None => Ok(None),
    }
}

pub async fn get_by_code<C: ConnectionTrait>(conn: &C, code: &str) -> Result<Option<Complaint>> {
    let model = Entity::find()
        .filter(Column::Code.eq(code.trim().to_uppercase()))
        .one(conn)
        .await?;
    match model {
        Some(m) => Ok(Some(m.try_into()?)),
        None => Ok(None),
    }
}

/// Newest first
pub async fn list_all<C: ConnectionTrait>(conn: &C) -> Result<Vec<Complaint>> {
    let models = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Code)
        .all(conn)
        .await?;
    to_complaints(models)
}

pub async fn list_for_customer<C: ConnectionTrait>(conn: &C, customer_id: &str) -> Result<Vec<Complaint>> {
    let models = Entity::find()
        .filter(Column::CustomerId.eq(customer_id))
        .filter(Column::IsDeleted.eq(false))
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Code)
        .all(conn)
        .await?;
    to_complaints(models)
}
