use anyhow::Result;
use chrono::Utc;
use contracts::domain::a002_order::{Order, OrderId, OrderLine, OrderStatus, PaymentMethod, TimelineEntry};
use contracts::domain::common::EntityMetadata;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a002_order")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub number: i64,
    pub customer_id: String,
    pub customer_email: String,
    pub customer_name: String,
    pub lines_json: String,
    pub subtotal: f64,
    pub discount: f64,
    pub promo_code: Option<String>,
    pub delivery_fee: f64,
    pub total: f64,
    pub delivery_address: String,
    pub contact_number: String,
    pub special_instructions: Option<String>,
    pub payment_method: String,
    pub status: String,
    pub timeline_json: String,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Order {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> Result<Self> {
        let id = Uuid::parse_str(&m.id)?;
        let lines: Vec<OrderLine> = serde_json::from_str(&m.lines_json)?;
        let timeline: Vec<TimelineEntry> = serde_json::from_str(&m.timeline_json)?;
        let status = OrderStatus::parse(&m.status)
            .ok_or_else(|| anyhow::anyhow!("order {}: unknown status '{}'", m.code, m.status))?;
        let payment_method = PaymentMethod::parse(&m.payment_method).ok_or_else(|| {
            anyhow::anyhow!("order {}: unknown payment method '{}'", m.code, m.payment_method)
        })?;

        Ok(Order {
            id: OrderId::new(id),
            code: m.code,
            number: m.number,
            customer_id: m.customer_id,
            customer_email: m.customer_email,
            customer_name: m.customer_name,
            lines,
            subtotal: m.subtotal,
            discount: m.discount,
            promo_code: m.promo_code,
            delivery_fee: m.delivery_fee,
            total: m.total,
            delivery_address: m.delivery_address,
            contact_number: m.contact_number,
            special_instructions: m.special_instructions,
            payment_method,
            status,
            timeline,
            metadata: EntityMetadata {
                created_at: m.created_at.unwrap_or_else(Utc::now),
                updated_at: m.updated_at.unwrap_or_else(Utc::now),
                is_deleted: m.is_deleted,
                version: m.version,
            },
        })
    }
}

fn to_orders(models: Vec<Model>) -> Result<Vec<Order>> {
    models.into_iter().map(Order::try_from).collect()
}

pub async fn insert<C: ConnectionTrait>(conn: &C, order: &Order) -> Result<()> {
    let active = ActiveModel {
        id: Set(order.id.value().to_string()),
        code: Set(order.code.clone()),
        number: Set(order.number),
        customer_id: Set(order.customer_id.clone()),
        customer_email: Set(order.customer_email.clone()),
        customer_name: Set(order.customer_name.clone()),
        lines_json: Set(serde_json::to_string(&order.lines)?),
        subtotal: Set(order.subtotal),
        discount: Set(order.discount),
        promo_code: Set(order.promo_code.clone()),
        delivery_fee: Set(order.delivery_fee),
        total: Set(order.total),
        delivery_address: Set(order.delivery_address.clone()),
        contact_number: Set(order.contact_number.clone()),
        special_instructions: Set(order.special_instructions.clone()),
        payment_method: Set(order.payment_method.as_str().to_string()),
        status: Set(order.status.as_str().to_string()),
        timeline_json: Set(serde_json::to_string(&order.timeline)?),
        is_deleted: Set(false),
        created_at: Set(Some(order.metadata.created_at)),
        updated_at: Set(Some(order.metadata.updated_at)),
        version: Set(order.metadata.version),
    };
    Entity::insert(active).exec_without_returning(conn).await?;
    Ok(())
}

/// Persist the mutable part of an order: status and timeline
pub async fn save_status<C: ConnectionTrait>(conn: &C, order: &Order) -> Result<()> {
    let active = ActiveModel {
        id: Set(order.id.value().to_string()),
        status: Set(order.status.as_str().to_string()),
        timeline_json: Set(serde_json::to_string(&order.timeline)?),
        updated_at: Set(Some(order.metadata.updated_at)),
        version: Set(order.metadata.version),
        ..Default::default()
    };
    active.update(conn).await?;
    Ok(())
}

pub async fn get_by_id<C: ConnectionTrait>(conn: &C, id: OrderId) -> Result<Option<Order>> {
    match Entity::find_by_id(id.value().to_string()).one(conn).await? {
        Some(m) => Ok(Some(m.try_into()?)),
        None => Ok(None),
    }
}

pub async fn get_by_code<C: ConnectionTrait>(conn: &C, code: &str) -> Result<Option<Order>> {
    let model = Entity::find()
        .filter(Column::Code.eq(code.trim().to_uppercase()))
        .one(conn)
        .await?;
    match model {
        Some(m) => Ok(Some(m.try_into()?)),
        None => Ok(None),
    }
}

/// Every order, newest first
pub async fn list_all<C: ConnectionTrait>(conn: &C) -> Result<Vec<Order>> {
    let models = Entity::find()
        .order_by_desc(Column::Number)
        .all(conn)
        .await?;
    to_orders(models)
}

/// Orders of one customer, newest first
pub async fn list_for_customer<C: ConnectionTrait>(conn: &C, customer_id: &str) -> Result<Vec<Order>> {
    let models = Entity::find()
        .filter(Column::CustomerId.eq(customer_id))
        .order_by_desc(Column::Number)
        .all(conn)
        .await?;
    to_orders(models)
}

/// How many orders of this customer redeemed `promo_code`
pub async fn count_promo_uses<C: ConnectionTrait>(conn: &C, customer_id: &str, promo_code: &str) -> Result<i64> {
    let count = Entity::find()
        .filter(Column::CustomerId.eq(customer_id))
        .filter(Column::PromoCode.eq(promo_code))
        .count(conn)
        .await?;
    Ok(i64::try_from(count)?)
}
