use crate::domain::a001_menu_item::MenuItemId;
use serde::{Deserialize, Serialize};

/// Menu items an account has starred, in the order they were starred
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorites {
    ids: Vec<MenuItemId>,
}

impl Favorites {
    pub fn ids(&self) -> &[MenuItemId] {
        &self.ids
    }

    pub fn contains(&self, id: MenuItemId) -> bool {
        self.ids.contains(&id)
    }

    /// Returns whether the item is a favorite afterwards
    pub fn toggle(&mut self, id: MenuItemId) -> bool {
        if self.contains(id) {
            self.ids.retain(|i| *i != id);
            false
        } else {
            self.ids.push(id);
            true
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteToggled {
    pub menu_item_id: MenuItemId,
    pub favorite: bool,
}
