pub mod favorites;

pub use favorites::{FavoriteToggled, Favorites};
