pub mod executor;
pub mod menu_api_client;

pub use executor::ImportExecutor;
pub use menu_api_client::{FetchOutcome, HttpMenuSource, MenuSource};
