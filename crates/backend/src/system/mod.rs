pub mod accounts;
pub mod auth;
pub mod handlers;
pub mod initialization;
pub mod middleware;
pub mod seed;
pub mod tracing;
