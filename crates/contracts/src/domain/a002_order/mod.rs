pub mod aggregate;
pub mod status;
pub mod tracker;

pub use aggregate::{
    CreateOrderItem, CreateOrderRequest, Order, OrderCustomer, OrderId, OrderLine, PaymentMethod,
    TimelineEntry, UpdateOrderStatusRequest,
};
pub use status::{OrderStatus, Transition, TransitionError};
pub use tracker::OrderTracking;
