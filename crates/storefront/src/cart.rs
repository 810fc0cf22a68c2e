//! Visitor cart.
//!
//! The cart is a list of `(dish, quantity)` entries kept in the visitor's
//! session, separate from the domain store. It holds at most one entry per
//! dish and never stores a quantity of zero.
//!
//! Availability is not checked here; it is a display flag on the dish.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use bistro_core::{CartItem, Dish, DishId, Price};

use crate::store::SiteState;
use crate::storage::keys;

/// Ordered cart entries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

/// A cart entry joined to its dish.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine<'a> {
    pub dish: &'a Dish,
    pub quantity: u32,
    pub line_total: Price,
}

impl Cart {
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add `quantity` of a dish, merging with an existing entry.
    ///
    /// A quantity of zero changes nothing.
    pub fn add(&mut self, dish_id: &DishId, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.items.iter_mut().find(|item| &item.dish_id == dish_id) {
            Some(item) => item.quantity = item.quantity.saturating_add(quantity),
            None => self.items.push(CartItem {
                dish_id: dish_id.clone(),
                quantity,
            }),
        }
    }

    /// Set the quantity of an entry. Zero or below removes it.
    ///
    /// Dishes that are not in the cart are ignored.
    pub fn update_quantity(&mut self, dish_id: &DishId, quantity: i64) {
        let Ok(quantity) = u32::try_from(quantity.max(0)) else {
            // Above u32::MAX: clamp rather than drop the line.
            self.set_existing(dish_id, u32::MAX);
            return;
        };
        if quantity == 0 {
            self.remove(dish_id);
        } else {
            self.set_existing(dish_id, quantity);
        }
    }

    fn set_existing(&mut self, dish_id: &DishId, quantity: u32) {
        if let Some(item) = self.items.iter_mut().find(|item| &item.dish_id == dish_id) {
            item.quantity = quantity;
        }
    }

    pub fn remove(&mut self, dish_id: &DishId) {
        self.items.retain(|item| &item.dish_id != dish_id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn quantity_of(&self, dish_id: &DishId) -> u32 {
        self.items
            .iter()
            .find(|item| &item.dish_id == dish_id)
            .map_or(0, |item| item.quantity)
    }

    /// Total number of units across all entries.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |sum, item| sum.saturating_add(item.quantity))
    }

    /// Priced lines. Entries whose dish no longer exists are skipped.
    #[must_use]
    pub fn lines<'a>(&self, state: &'a SiteState) -> Vec<CartLine<'a>> {
        self.items
            .iter()
            .filter_map(|item| {
                let dish = state.dish(&item.dish_id)?;
                Some(CartLine {
                    dish,
                    quantity: item.quantity,
                    line_total: dish.price.times(item.quantity),
                })
            })
            .collect()
    }

    #[must_use]
    pub fn total(&self, state: &SiteState) -> Price {
        self.lines(state).iter().map(|line| line.line_total).sum()
    }
}

/// The cart stored in a visitor session.
pub struct CartSession<'s> {
    session: &'s Session,
}

impl<'s> CartSession<'s> {
    #[must_use]
    pub const fn new(session: &'s Session) -> Self {
        Self { session }
    }

    /// Load the cart. A missing or unreadable entry yields an empty cart.
    pub async fn load(&self) -> Cart {
        match self.session.get::<Cart>(keys::CART).await {
            Ok(cart) => cart.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Failed to read cart from session: {e}");
                Cart::default()
            }
        }
    }

    /// Store the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn save(&self, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
        self.session.insert(keys::CART, cart).await
    }

    /// Load, apply `f`, then save.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn update(
        &self,
        f: impl FnOnce(&mut Cart) + Send,
    ) -> Result<Cart, tower_sessions::session::Error> {
        let mut cart = self.load().await;
        f(&mut cart);
        self.save(&cart).await?;
        Ok(cart)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::defaults;

    fn id(s: &str) -> DishId {
        DishId::new(s)
    }

    #[test]
    fn test_add_twice_merges() {
        let mut cart = Cart::default();
        cart.add(&id("dish-1"), 1);
        cart.add(&id("dish-1"), 2);
        assert_eq!(
            cart.items(),
            &[CartItem {
                dish_id: id("dish-1"),
                quantity: 3
            }]
        );
    }

    #[test]
    fn test_update_to_zero_removes() {
        let mut cart = Cart::default();
        cart.add(&id("dish-1"), 4);
        cart.update_quantity(&id("dish-1"), 0);
        assert_eq!(cart.quantity_of(&id("dish-1")), 0);
        assert!(cart.is_empty());

        cart.add(&id("dish-2"), 1);
        cart.update_quantity(&id("dish-2"), -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_is_absolute_and_ignores_missing() {
        let mut cart = Cart::default();
        cart.add(&id("dish-1"), 4);
        cart.update_quantity(&id("dish-1"), 2);
        cart.update_quantity(&id("dish-9"), 5);
        assert_eq!(cart.quantity_of(&id("dish-1")), 2);
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_invariants_hold_over_mixed_sequence() {
        let mut cart = Cart::default();
        let ids = ["a", "b", "c"];
        for step in 0..60_i64 {
            let dish = id(ids[usize::try_from(step).unwrap() % ids.len()]);
            match step % 5 {
                0 | 1 => cart.add(&dish, u32::try_from(step % 3).unwrap()),
                2 => cart.update_quantity(&dish, step % 4 - 1),
                3 => cart.remove(&dish),
                _ => cart.update_quantity(&dish, step),
            }
            let mut seen = std::collections::HashSet::new();
            for item in cart.items() {
                assert!(item.quantity > 0);
                assert!(seen.insert(item.dish_id.clone()));
            }
        }
    }

    #[test]
    fn test_lines_skip_missing_dishes_and_total() {
        let state = defaults::site_state();
        let mut cart = Cart::default();
        cart.add(&id("dish-1"), 2);
        cart.add(&id("gone"), 1);
        cart.add(&id("dish-6"), 1);

        let lines = cart.lines(&state);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line_total, Price::from_cents(1500));
        assert_eq!(cart.total(&state), Price::from_cents(1950));
        assert_eq!(cart.total_quantity(), 4);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::default();
        cart.add(&id("dish-1"), 1);
        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let mut cart = Cart::default();
        cart.add(&id("dish-1"), 2);
        assert_eq!(
            serde_json::to_value(&cart).unwrap(),
            serde_json::json!([{"dishId": "dish-1", "quantity": 2}])
        );
    }
}
