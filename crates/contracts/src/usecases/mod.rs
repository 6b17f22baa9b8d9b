pub mod u501_cart;
pub mod u502_checkout;
pub mod u503_import_menu;
pub mod u504_favorites;
