pub mod a001_menu_item;
pub mod a002_order;
pub mod a003_complaint;
pub mod a004_promotion;
