//! Theme and branding settings.

use serde::{Deserialize, Serialize};

use super::CategoryId;

/// Look-and-feel settings chosen in the admin panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignSettings {
    pub theme: String,
    pub heading_font: String,
    pub body_font: String,
    pub logo_icon: String,
    pub logo_color: String,
    pub logo_image: Option<String>,
    /// Rendered logo width in pixels.
    pub logo_width: u32,
    pub favicon: Option<String>,
    /// Category highlighted in the navigation and on the home page.
    pub featured_category_id: Option<CategoryId>,
}

impl Default for DesignSettings {
    fn default() -> Self {
        Self {
            theme: "classic".to_string(),
            heading_font: "Playfair Display".to_string(),
            body_font: "Inter".to_string(),
            logo_icon: "utensils".to_string(),
            logo_color: "#b45309".to_string(),
            logo_image: None,
            logo_width: 120,
            favicon: None,
            featured_category_id: None,
        }
    }
}
