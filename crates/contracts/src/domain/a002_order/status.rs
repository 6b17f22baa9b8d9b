use serde::{Deserialize, Serialize};

/// Lifecycle of an order.
///
/// The forward chain is `Pending → Confirmed → Preparing → Out for Delivery → Delivered`;
/// `Cancelled` is a terminal side branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    #[serde(rename = "Out for Delivery")]
    OutForDelivery,
    Delivered,
    Cancelled,
}

/// Result of checking a requested status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The status changes
    Apply,
    /// The order already has the requested status
    NoOp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionError {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cannot move order from '{}' to '{}'",
            self.from.as_str(),
            self.to.as_str()
        )
    }
}

impl std::error::Error for TransitionError {}

impl OrderStatus {
    /// Status a freshly placed order starts in
    pub const INITIAL: OrderStatus = OrderStatus::Pending;

    pub const FORWARD_CHAIN: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::OutForDelivery => "Out for Delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(OrderStatus::Pending),
            "Confirmed" => Some(OrderStatus::Confirmed),
            "Preparing" => Some(OrderStatus::Preparing),
            "Out for Delivery" => Some(OrderStatus::OutForDelivery),
            "Delivered" => Some(OrderStatus::Delivered),
            "Cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// Position on the forward chain; `None` for `Cancelled`
    pub fn rank(&self) -> Option<usize> {
        Self::FORWARD_CHAIN.iter().position(|s| s == self)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Guard for `(current, requested)` pairs.
    ///
    /// Allowed: strictly forward moves along the chain (skips included) and
    /// `Cancelled` from any non-terminal state. Requesting the current status is
    /// a no-op. Everything else is rejected.
    pub fn check_transition(self, to: OrderStatus) -> Result<Transition, TransitionError> {
        if self == to {
            return Ok(Transition::NoOp);
        }
        let err = TransitionError { from: self, to };
        if self.is_terminal() {
            return Err(err);
        }
        if to == OrderStatus::Cancelled {
            return Ok(Transition::Apply);
        }
        match (self.rank(), to.rank()) {
            (Some(from), Some(target)) if target > from => Ok(Transition::Apply),
            _ => Err(err),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
