//! Cart line items.

use serde::{Deserialize, Serialize};

use super::DishId;

/// One cart line: a dish and how many of it.
///
/// The quantity is always positive; zero-quantity lines are removed by the
/// cart rather than stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub dish_id: DishId,
    pub quantity: u32,
}
