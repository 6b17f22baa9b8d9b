use super::status::{OrderStatus, Transition, TransitionError};
use crate::domain::a001_menu_item::MenuItemId;
use crate::domain::common::{AggregateId, AggregateRoot, EntityMetadata};
use crate::usecases::u501_cart::CartLine;
use crate::usecases::u502_checkout::FinalizedCheckout;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub Uuid);

impl OrderId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for OrderId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(OrderId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Value types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "Cash on Delivery")]
    CashOnDelivery,
    #[serde(rename = "GCash")]
    GCash,
    #[serde(rename = "Credit/Debit Card")]
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "Cash on Delivery",
            PaymentMethod::GCash => "GCash",
            PaymentMethod::Card => "Credit/Debit Card",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Cash on Delivery" => Some(PaymentMethod::CashOnDelivery),
            "GCash" => Some(PaymentMethod::GCash),
            "Credit/Debit Card" => Some(PaymentMethod::Card),
            _ => None,
        }
    }
}

/// Snapshot of a dish as it was ordered; never re-read from the menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
}

impl OrderLine {
    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

impl From<&CartLine> for OrderLine {
    fn from(line: &CartLine) -> Self {
        Self {
            menu_item_id: line.menu_item_id,
            name: line.name.clone(),
            unit_price: line.price,
            quantity: line.quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub status: String,
    pub at: DateTime<Utc>,
}

/// Who placed an order, copied onto the order at creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    pub id: String,
    pub email: String,
    pub name: String,
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// A placed order. Everything but `status`/`timeline` is frozen at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Human-readable code, e.g. "ORD-000042"
    pub code: String,
    pub number: i64,
    pub customer_id: String,
    pub customer_email: String,
    pub customer_name: String,
    pub lines: Vec<OrderLine>,
    pub subtotal: f64,
    pub discount: f64,
    pub promo_code: Option<String>,
    pub delivery_fee: f64,
    pub total: f64,
    pub delivery_address: String,
    pub contact_number: String,
    pub special_instructions: Option<String>,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub timeline: Vec<TimelineEntry>,
    pub metadata: EntityMetadata,
}

impl Order {
    pub fn code_for(number: i64) -> String {
        format!("ORD-{:06}", number)
    }

    /// New order in the initial status with lines and totals copied verbatim
    pub fn place(
        number: i64,
        customer: &OrderCustomer,
        lines: Vec<OrderLine>,
        checkout: &FinalizedCheckout,
    ) -> Self {
        let metadata = EntityMetadata::new();
        let status = OrderStatus::INITIAL;
        Self {
            id: OrderId::new_v4(),
            code: Self::code_for(number),
            number,
            customer_id: customer.id.clone(),
            customer_email: customer.email.clone(),
            customer_name: customer.name.clone(),
            lines,
            subtotal: checkout.summary.subtotal,
            discount: checkout.summary.discount,
            promo_code: checkout.promo_code.clone(),
            delivery_fee: checkout.summary.delivery_fee,
            total: checkout.summary.total,
            delivery_address: checkout.delivery_address.clone(),
            contact_number: checkout.contact_number.clone(),
            special_instructions: checkout.special_instructions.clone(),
            payment_method: checkout.payment_method,
            status,
            timeline: vec![TimelineEntry {
                status: timeline_label(status).to_string(),
                at: metadata.created_at,
            }],
            metadata,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.id.as_string()
    }

    pub fn belongs_to(&self, account_id: &str) -> bool {
        self.customer_id == account_id
    }

    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, l| acc.saturating_add(l.quantity))
    }

    /// Move to `to` if the lifecycle allows it; an effective change is stamped on the timeline
    pub fn apply_status(&mut self, to: OrderStatus) -> Result<Transition, TransitionError> {
        let transition = self.status.check_transition(to)?;
        if transition == Transition::Apply {
            self.status = to;
            self.metadata.before_write();
            self.timeline.push(TimelineEntry {
                status: timeline_label(to).to_string(),
                at: self.metadata.updated_at,
            });
        }
        Ok(transition)
    }
}

fn timeline_label(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "Order Placed",
        OrderStatus::Confirmed => "Order Confirmed",
        OrderStatus::Preparing => "Preparing",
        OrderStatus::OutForDelivery => "Out for Delivery",
        OrderStatus::Delivered => "Delivered",
        OrderStatus::Cancelled => "Cancelled",
    }
}

impl AggregateRoot for Order {
    type Id = OrderId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.metadata
    }

    fn aggregate_index() -> &'static str {
        "a002"
    }

    fn collection_name() -> &'static str {
        "order"
    }

    fn element_name() -> &'static str {
        "Order"
    }

    fn list_name() -> &'static str {
        "Orders"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItem {
    pub menu_item_id: MenuItemId,
    pub quantity: i64,
    pub price: f64,
}

/// Order entered directly by staff; delivery fields default to the customer's profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer_id: String,
    pub items: Vec<CreateOrderItem>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub special_instructions: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::u502_checkout::{CheckoutDraft, CheckoutSummary};

    fn placed() -> Order {
        let draft = CheckoutDraft {
            delivery_address: "12 Mabini St".into(),
            contact_number: "09123456789".into(),
            ..Default::default()
        };
        let checkout =
            FinalizedCheckout::from_draft(&draft, CheckoutSummary::compute(598.0, 0.0)).unwrap();
        let customer = OrderCustomer {
            id: "acc-1".into(),
            email: "a@x.com".into(),
            name: "Ana".into(),
        };
        let lines = vec![OrderLine {
            menu_item_id: MenuItemId(1),
            name: "Kare-Kare".into(),
            unit_price: 299.0,
            quantity: 2,
        }];
        Order::place(7, &customer, lines, &checkout)
    }

    #[test]
    fn test_place_starts_pending_with_placed_entry() {
        let order = placed();
        assert_eq!(order.code, "ORD-000007");
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total, 618.0);
        assert_eq!(order.timeline.len(), 1);
        assert_eq!(order.timeline[0].status, "Order Placed");
        assert!(order.belongs_to("acc-1"));
    }

    #[test]
    fn test_apply_status_stamps_timeline_once() {
        let mut order = placed();
        assert_eq!(order.apply_status(OrderStatus::Confirmed), Ok(Transition::Apply));
        assert_eq!(order.apply_status(OrderStatus::Confirmed), Ok(Transition::NoOp));
        assert_eq!(order.timeline.len(), 2);
        assert_eq!(order.metadata.version, 1);
    }

    #[test]
    fn test_rejected_transition_leaves_order_untouched() {
        let mut order = placed();
        order.apply_status(OrderStatus::Delivered).unwrap();
        let before = order.clone();
        assert!(order.apply_status(OrderStatus::Cancelled).is_err());
        assert_eq!(order, before);
    }

    #[test]
    fn test_payment_method_wire_names() {
        let json = serde_json::to_string(&PaymentMethod::Card).unwrap();
        assert_eq!(json, "\"Credit/Debit Card\"");
        assert_eq!(PaymentMethod::parse("GCash"), Some(PaymentMethod::GCash));
    }
}
