use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::shared::config::Config;
use crate::usecases::u501_cart::events::CartEvents;

/// Shared handles passed to every handler through axum `State`
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub cart_events: CartEvents,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        Self {
            db,
            cart_events: CartEvents::new(),
            config: Arc::new(config),
        }
    }
}
