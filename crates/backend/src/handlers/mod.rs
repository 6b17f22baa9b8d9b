pub mod a001_menu_item;
pub mod a002_order;
pub mod a003_complaint;
pub mod a004_promotion;
pub mod logs;
pub mod u501_cart;
pub mod u502_checkout;
pub mod u503_import_menu;
pub mod u504_favorites;
