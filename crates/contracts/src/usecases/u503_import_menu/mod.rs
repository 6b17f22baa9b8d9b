pub mod request;
pub mod response;

pub use request::{ImportMenuRequest, RemoteMenuItem};
pub use response::{ImportMenuResponse, ImportOutcome};
