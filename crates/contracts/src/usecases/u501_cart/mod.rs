pub mod cart;
pub mod events;
pub mod request;

pub use cart::{Cart, CartLine, CartView};
pub use events::CartChanged;
pub use request::{AddToCartRequest, SetQuantityRequest};
