use crate::domain::a001_menu_item::{MenuItem, MenuItemId};
use crate::shared::money::round_cents;
use serde::{Deserialize, Serialize};

/// One selected dish, with name/price/image copied at the time it was added
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub price: f64,
    pub image: Option<String>,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Cart of one account.
///
/// Invariants: at most one line per menu item, every quantity is at least 1,
/// lines keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, id: MenuItemId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.menu_item_id == id)
    }

    /// Add `quantity` of `item`; an existing line is incremented instead of duplicated.
    pub fn add(&mut self, item: &MenuItem, quantity: i64) -> Result<(), String> {
        let quantity = positive_quantity(quantity)?;
        match self.lines.iter_mut().find(|l| l.menu_item_id == item.id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(quantity);
            }
            None => self.lines.push(CartLine {
                menu_item_id: item.id,
                name: item.name.clone(),
                price: item.price,
                image: item.image.clone(),
                quantity,
            }),
        }
        Ok(())
    }

    /// Returns whether a line was removed; removing an absent line is a no-op.
    pub fn remove(&mut self, id: MenuItemId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.menu_item_id != id);
        before != self.lines.len()
    }

    /// Quantities below 1 remove the line. Returns whether the cart changed.
    pub fn set_quantity(&mut self, id: MenuItemId, quantity: i64) -> bool {
        if quantity < 1 {
            return self.remove(id);
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.lines.iter_mut().find(|l| l.menu_item_id == id) {
            Some(line) if line.quantity != quantity => {
                line.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn subtotal(&self) -> f64 {
        round_cents(self.lines.iter().map(CartLine::line_total).sum())
    }

    /// Number of units across all lines (what a cart badge shows)
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, l| acc.saturating_add(l.quantity))
    }

    pub fn view(&self) -> CartView {
        CartView {
            lines: self.lines.clone(),
            subtotal: self.subtotal(),
            item_count: self.item_count(),
        }
    }
}

fn positive_quantity(quantity: i64) -> Result<u32, String> {
    if quantity < 1 {
        return Err("Quantity must be a positive integer".into());
    }
    u32::try_from(quantity).map_err(|_| "Quantity is too large".to_string())
}

/// Cart as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub subtotal: f64,
    pub item_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_menu_item::MenuItemDto;

    fn item(id: i32, name: &str, price: f64) -> MenuItem {
        MenuItem::from_dto(
            MenuItemId(id),
            &MenuItemDto {
                name: Some(name.into()),
                price: Some(price),
                category: Some("Main Course".into()),
                ..Default::default()
            },
        )
        .unwrap()
    }

    fn assert_invariants(cart: &Cart) {
        let mut ids: Vec<_> = cart.lines().iter().map(|l| l.menu_item_id).collect();
        let n = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), n, "duplicate lines in {cart:?}");
        assert!(cart.lines().iter().all(|l| l.quantity >= 1));
    }

    #[test]
    fn test_kare_kare_subtotal() {
        let mut cart = Cart::new();
        cart.add(&item(1, "Kare-Kare", 299.0), 2).unwrap();
        assert_eq!(cart.subtotal(), 598.0);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_adding_same_item_increments_line() {
        let mut cart = Cart::new();
        let sinigang = item(2, "Sinigang", 250.0);
        cart.add(&sinigang, 1).unwrap();
        cart.add(&sinigang, 3).unwrap();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line(MenuItemId(2)).unwrap().quantity, 4);
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        let mut cart = Cart::new();
        assert!(cart.add(&item(1, "Adobo", 180.0), 0).is_err());
        assert!(cart.add(&item(1, "Adobo", 180.0), -2).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_below_one_removes() {
        let mut cart = Cart::new();
        cart.add(&item(1, "Adobo", 180.0), 2).unwrap();
        assert!(cart.set_quantity(MenuItemId(1), 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_absent_line_is_noop() {
        let mut cart = Cart::new();
        assert!(!cart.remove(MenuItemId(9)));
        assert!(!cart.set_quantity(MenuItemId(9), 3));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = Cart::new();
        cart.add(&item(3, "Halo-Halo", 120.0), 1).unwrap();
        cart.add(&item(1, "Adobo", 180.0), 1).unwrap();
        cart.add(&item(3, "Halo-Halo", 120.0), 1).unwrap();
        let ids: Vec<_> = cart.lines().iter().map(|l| l.menu_item_id.0).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_mixed_operation_sequence_keeps_invariants() {
        let menu = [item(1, "Adobo", 180.0), item(2, "Sinigang", 250.0), item(3, "Lumpia", 90.0)];
        let mut cart = Cart::new();
        // deterministic pseudo-random walk over add/remove/set
        let mut seed: u64 = 7;
        for _ in 0..500 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let pick = &menu[(seed >> 33) as usize % menu.len()];
            let qty = ((seed >> 40) % 5) as i64 - 1;
            match (seed >> 20) % 3 {
                0 => {
                    let _ = cart.add(pick, qty);
                }
                1 => {
                    cart.remove(pick.id);
                }
                _ => {
                    cart.set_quantity(pick.id, qty);
                }
            }
            assert_invariants(&cart);
        }
    }

    #[test]
    fn test_line_snapshot_survives_catalog_price_change() {
        let mut adobo = item(1, "Adobo", 180.0);
        let mut cart = Cart::new();
        cart.add(&adobo, 1).unwrap();
        adobo.price = 999.0;
        assert_eq!(cart.line(MenuItemId(1)).unwrap().price, 180.0);
    }
}
