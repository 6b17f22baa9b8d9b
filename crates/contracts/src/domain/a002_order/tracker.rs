//! Customer-facing progress derived from an order's status and creation time.

use super::aggregate::Order;
use super::status::OrderStatus;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Lower bound of the delivery estimate, in minutes after placement
pub const ETA_MIN_MINUTES: i64 = 30;
/// Upper bound of the delivery estimate, in minutes after placement
pub const ETA_MAX_MINUTES: i64 = 45;

/// Captions of the four-stage tracker, in order
pub const STAGES: [&str; 4] = ["Confirmed", "Preparing", "On the way", "Delivered"];

/// Progress bar value; `None` for cancelled orders, which are off the scale
pub fn progress_percent(status: OrderStatus) -> Option<u8> {
    match status {
        OrderStatus::Pending => Some(10),
        OrderStatus::Confirmed => Some(25),
        OrderStatus::Preparing => Some(50),
        OrderStatus::OutForDelivery => Some(75),
        OrderStatus::Delivered => Some(100),
        OrderStatus::Cancelled => None,
    }
}

/// Furthest tracker stage reached (1..=4).
///
/// A stage counts as reached once its own status or any later one on the
/// forward chain has been set. `None` while pending, before the first stage, and
/// for cancelled orders.
pub fn step_index(status: OrderStatus) -> Option<u8> {
    match status {
        OrderStatus::Pending => None,
        OrderStatus::Confirmed => Some(1),
        OrderStatus::Preparing => Some(2),
        OrderStatus::OutForDelivery => Some(3),
        OrderStatus::Delivered => Some(4),
        OrderStatus::Cancelled => None,
    }
}

/// Estimated delivery window, always recomputed from the creation timestamp
pub fn estimated_delivery(created_at: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    (
        created_at + Duration::minutes(ETA_MIN_MINUTES),
        created_at + Duration::minutes(ETA_MAX_MINUTES),
    )
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerStage {
    pub label: String,
    pub reached: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTracking {
    pub order_id: String,
    pub code: String,
    pub status: OrderStatus,
    pub cancelled: bool,
    pub progress_percent: Option<u8>,
    pub step_index: Option<u8>,
    pub stages: Vec<TrackerStage>,
    pub estimated_delivery_from: DateTime<Utc>,
    pub estimated_delivery_to: DateTime<Utc>,
}

impl OrderTracking {
    pub fn for_order(order: &Order) -> Self {
        let reached = step_index(order.status).unwrap_or(0);
        let (from, to) = estimated_delivery(order.metadata.created_at);
        Self {
            order_id: order.id.0.to_string(),
            code: order.code.clone(),
            status: order.status,
            cancelled: order.status == OrderStatus::Cancelled,
            progress_percent: progress_percent(order.status),
            step_index: step_index(order.status),
            stages: STAGES
                .iter()
                .zip(1u8..)
                .map(|(label, n)| TrackerStage {
                    label: (*label).to_string(),
                    reached: n <= reached,
                })
                .collect(),
            estimated_delivery_from: from,
            estimated_delivery_to: to,
        }
    }
}
