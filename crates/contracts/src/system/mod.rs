pub mod accounts;
pub mod auth;
