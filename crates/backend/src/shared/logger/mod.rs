pub mod repository;

use repository::log_event_internal;
use sea_orm::DatabaseConnection;

/// Record a business event in the audit log without waiting for the write
///
/// ```ignore
/// logger::log(&state.db, "a002_order", "Order ORD-000042 placed");
/// ```
pub fn log(db: &DatabaseConnection, category: &str, message: &str) {
    log_event_internal(db.clone(), "server", category, message);
}
