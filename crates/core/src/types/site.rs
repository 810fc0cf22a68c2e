//! Editable site copy.
//!
//! `SiteContent` is a freeform document rather than a relational entity. The
//! admin panel replaces it wholesale. Every field carries a default so a
//! stored document written before a field existed still loads.

use serde::{Deserialize, Serialize};

/// All editable copy for the public site.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteContent {
    pub restaurant_name: String,
    pub tagline: String,
    pub currency_symbol: String,
    pub hero: HeroSection,
    pub about: AboutSection,
    pub contact: ContactDetails,
    pub cart: CartLabels,
    pub announcement: AnnouncementBar,
    pub features: Vec<FeatureCallout>,
    pub newsletter: NewsletterCopy,
}

/// The full-width banner at the top of the home page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroSection {
    pub title: String,
    pub subtitle: String,
    pub background_image: String,
    pub overlay_color: String,
    /// Overlay opacity between 0 and 1.
    pub overlay_opacity: f64,
    pub text_color: String,
    pub title_font_size: u16,
    pub subtitle_font_size: u16,
    pub cta_label: String,
}

impl Default for HeroSection {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            background_image: String::new(),
            overlay_color: "#000000".to_string(),
            overlay_opacity: 0.5,
            text_color: "#ffffff".to_string(),
            title_font_size: 48,
            subtitle_font_size: 20,
            cta_label: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AboutSection {
    pub title: String,
    pub body: String,
    pub image: String,
}

/// How guests reach the restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactDetails {
    pub phone: String,
    /// Messaging number that receives order handoffs (any formatting).
    pub whatsapp: String,
    pub email: String,
    pub address: String,
    pub opening_hours: String,
}

/// Labels used across the cart and checkout flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CartLabels {
    pub title: String,
    pub empty_message: String,
    pub checkout_button: String,
    pub delivery_label: String,
    pub pickup_label: String,
    pub order_greeting: String,
    pub total_label: String,
}

impl Default for CartLabels {
    fn default() -> Self {
        Self {
            title: "Your order".to_string(),
            empty_message: "Your cart is empty".to_string(),
            checkout_button: "Send order".to_string(),
            delivery_label: "Delivery".to_string(),
            pickup_label: "Pickup".to_string(),
            order_greeting: "Hello! I would like to place an order:".to_string(),
            total_label: "Total".to_string(),
        }
    }
}

/// Thin banner shown above the navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnnouncementBar {
    pub enabled: bool,
    pub text: String,
    pub background_color: String,
    pub text_color: String,
}

impl Default for AnnouncementBar {
    fn default() -> Self {
        Self {
            enabled: false,
            text: String::new(),
            background_color: "#111827".to_string(),
            text_color: "#ffffff".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureCallout {
    pub icon: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewsletterCopy {
    pub title: String,
    pub description: String,
    pub button_label: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let content: SiteContent =
            serde_json::from_str(r#"{"restaurantName":"Chez Nous","hero":{"title":"Bonjour"}}"#)
                .unwrap();
        assert_eq!(content.restaurant_name, "Chez Nous");
        assert_eq!(content.hero.title, "Bonjour");
        assert!((content.hero.overlay_opacity - 0.5).abs() < f64::EPSILON);
        assert_eq!(content.cart, CartLabels::default());
    }

    #[test]
    fn test_camel_case_keys() {
        let value = serde_json::to_value(SiteContent::default()).unwrap();
        assert!(value.get("currencySymbol").is_some());
        assert!(value["hero"].get("overlayOpacity").is_some());
        assert!(value["contact"].get("openingHours").is_some());
    }
}
