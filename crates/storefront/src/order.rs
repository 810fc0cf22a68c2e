//! Order handoff to a messaging app.
//!
//! Checkout does not take payment or record the order. It formats the cart
//! into a text message and returns a `wa.me` link that opens a chat with
//! the restaurant, pre-filled with that message. Whether the message is
//! ever sent is outside the system's knowledge.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use bistro_core::Price;

use crate::cart::Cart;
use crate::store::SiteState;
use crate::validation::{MIN_PHONE_DIGITS, ValidationErrors, phone_digits};

const MAX_NOTES_LEN: usize = 500;

/// How the customer receives the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fulfillment {
    Delivery,
    Pickup,
}

/// Customer details submitted at checkout.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub customer_name: String,
    pub phone: String,
    pub fulfillment: Fulfillment,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl OrderRequest {
    /// Check required fields. Delivery orders need an address.
    ///
    /// # Errors
    ///
    /// Returns every problem found.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("customerName", &self.customer_name, "Name");
        errors.max_len("customerName", &self.customer_name, 100);

        if self.phone.trim().is_empty() {
            errors.add("phone", "Phone is required");
        } else if phone_digits(&self.phone).len() < MIN_PHONE_DIGITS {
            errors.add("phone", "Enter a valid phone number");
        }

        if self.fulfillment == Fulfillment::Delivery {
            errors.require(
                "address",
                self.address.as_deref().unwrap_or_default(),
                "Address",
            );
        }
        if let Some(notes) = &self.notes {
            errors.max_len("notes", notes, MAX_NOTES_LEN);
        }
        errors.into_result()
    }
}

/// A ready-to-open order message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderHandoff {
    pub message: String,
    pub url: String,
    pub total: Price,
}

/// Build the order message and link.
///
/// # Errors
///
/// Returns validation errors for missing customer fields or an empty cart.
pub fn build_handoff(
    request: &OrderRequest,
    cart: &Cart,
    state: &SiteState,
) -> Result<OrderHandoff, ValidationErrors> {
    let mut errors = request.validate().err().unwrap_or_default();
    let lines = cart.lines(state);
    if lines.is_empty() {
        errors.add("cart", "Your cart is empty");
    }
    errors.into_result()?;

    let content = &state.site_content;
    let labels = &content.cart;
    let symbol = content.currency_symbol.as_str();
    let total = cart.total(state);

    let mut message = String::new();
    let _ = writeln!(message, "{}", labels.order_greeting);
    let _ = writeln!(message);
    let _ = writeln!(message, "Name: {}", request.customer_name.trim());
    let _ = writeln!(message, "Phone: {}", request.phone.trim());
    match request.fulfillment {
        Fulfillment::Delivery => {
            let _ = writeln!(message, "{}", labels.delivery_label);
            if let Some(address) = request.address.as_deref() {
                let _ = writeln!(message, "Address: {}", address.trim());
            }
        }
        Fulfillment::Pickup => {
            let _ = writeln!(message, "{}", labels.pickup_label);
        }
    }
    if let Some(notes) = request.notes.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        let _ = writeln!(message, "Notes: {notes}");
    }
    let _ = writeln!(message);
    for line in &lines {
        let _ = writeln!(
            message,
            "{} x {} - {}",
            line.quantity,
            line.dish.name,
            line.line_total.display(symbol)
        );
    }
    let _ = writeln!(message);
    let _ = write!(message, "{}: {}", labels.total_label, total.display(symbol));

    let url = whatsapp_link(&content.contact.whatsapp, &message);
    Ok(OrderHandoff {
        message,
        url,
        total,
    })
}

/// A `wa.me` link to `number` pre-filled with `message`.
///
/// Only the digits of `number` are used. Without any digits the link opens
/// the app's contact picker instead of a specific chat.
#[must_use]
pub fn whatsapp_link(number: &str, message: &str) -> String {
    let digits = phone_digits(number);
    format!(
        "https://wa.me/{digits}?text={}",
        urlencoding::encode(message)
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bistro_core::DishId;

    use super::*;
    use crate::store::defaults;

    fn request(fulfillment: Fulfillment) -> OrderRequest {
        OrderRequest {
            customer_name: "Sam".into(),
            phone: "+1 555 123 4567".into(),
            fulfillment,
            address: None,
            notes: None,
        }
    }

    fn cart() -> Cart {
        let mut cart = Cart::default();
        cart.add(&DishId::new("dish-1"), 2);
        cart.add(&DishId::new("dish-6"), 1);
        cart
    }

    #[test]
    fn test_pickup_message() {
        let state = defaults::site_state();
        let handoff = build_handoff(&request(Fulfillment::Pickup), &cart(), &state).unwrap();
        assert_eq!(
            handoff.message,
            "Hello! I would like to place an order:\n\
             \n\
             Name: Sam\n\
             Phone: +1 555 123 4567\n\
             Pickup\n\
             \n\
             2 x Bruschetta - $15.00\n\
             1 x Fresh Lemonade - $4.50\n\
             \n\
             Total: $19.50"
        );
        assert_eq!(handoff.total, Price::from_cents(1950));
        assert!(handoff.url.starts_with("https://wa.me/15550102030?text=Hello%21%20I"));
    }

    #[test]
    fn test_delivery_requires_address() {
        let state = defaults::site_state();
        let err = build_handoff(&request(Fulfillment::Delivery), &cart(), &state).unwrap_err();
        assert_eq!(err.errors()[0].field, "address");

        let mut with_address = request(Fulfillment::Delivery);
        with_address.address = Some("4 Elm Road".into());
        with_address.notes = Some("Ring twice".into());
        let handoff = build_handoff(&with_address, &cart(), &state).unwrap();
        assert!(handoff.message.contains("Delivery\nAddress: 4 Elm Road\nNotes: Ring twice\n"));
    }

    #[test]
    fn test_empty_cart_and_bad_phone_are_reported_together() {
        let state = defaults::site_state();
        let mut bad = request(Fulfillment::Pickup);
        bad.phone = "12".into();
        let err = build_handoff(&bad, &Cart::default(), &state).unwrap_err();
        let fields: Vec<_> = err.errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["phone", "cart"]);
    }

    #[test]
    fn test_link_without_number() {
        assert_eq!(whatsapp_link("", "hi there"), "https://wa.me/?text=hi%20there");
    }
}
