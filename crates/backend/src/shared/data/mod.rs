pub mod account_store;
pub mod db;
pub mod sequence;
