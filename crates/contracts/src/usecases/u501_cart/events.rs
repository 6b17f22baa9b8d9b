use serde::{Deserialize, Serialize};

/// Published after every change of an account's cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartChanged {
    pub account_id: String,
    pub item_count: u32,
}
