pub mod extractor;
pub mod middleware;
pub mod password;
pub mod session;
