pub mod aggregate;

pub use aggregate::{Availability, MenuItem, MenuItemDto, MenuItemId};
