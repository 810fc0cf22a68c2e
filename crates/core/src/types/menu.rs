//! Menu entities: dishes and the categories they are filed under.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{CategoryId, DishId, Price, Slug};

/// Badges an admin can attach to a dish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DishTag {
    Recommended,
    Spicy,
    Vegetarian,
    New,
}

impl DishTag {
    /// Every tag, in display order.
    pub const ALL: [Self; 4] = [Self::Recommended, Self::Spicy, Self::Vegetarian, Self::New];

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Recommended => "Recommended",
            Self::Spicy => "Spicy",
            Self::Vegetarian => "Vegetarian",
            Self::New => "New",
        }
    }
}

/// A menu item.
///
/// `category_id` is a plain reference: deleting the category leaves it
/// dangling, and lookups for it simply find nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    pub id: DishId,
    pub name: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    /// Image references in display order; the first one is the cover.
    #[serde(default)]
    pub images: Vec<String>,
    pub category_id: CategoryId,
    #[serde(default = "available_by_default")]
    pub available: bool,
    #[serde(default)]
    pub tags: BTreeSet<DishTag>,
}

const fn available_by_default() -> bool {
    true
}

impl Dish {
    /// The cover image reference, if the dish has any images.
    #[must_use]
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    #[must_use]
    pub fn has_tag(&self, tag: DishTag) -> bool {
        self.tags.contains(&tag)
    }
}

/// A menu section such as "Starters" or "Drinks".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: Slug,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
}

impl Category {
    /// Create a category with a fresh ID and a slug derived from `name`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            id: CategoryId::generate(),
            slug: Slug::from_name(&name),
            name,
            description: description.into(),
            image: image.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_dish_defaults_when_fields_missing() {
        let json = r#"{"id":"d1","name":"Soup","price":"4.50","categoryId":"c1"}"#;
        let dish: Dish = serde_json::from_str(json).unwrap();
        assert!(dish.available);
        assert!(dish.images.is_empty());
        assert!(dish.tags.is_empty());
        assert_eq!(dish.cover_image(), None);
    }

    #[test]
    fn test_tags_serialize_lowercase_as_set() {
        let json = r#"{"id":"d1","name":"Curry","price":9,"categoryId":"c1","tags":["spicy","recommended","spicy"]}"#;
        let dish: Dish = serde_json::from_str(json).unwrap();
        assert_eq!(dish.tags.len(), 2);
        assert!(dish.has_tag(DishTag::Spicy));
        let out = serde_json::to_value(&dish).unwrap();
        assert_eq!(out["tags"], serde_json::json!(["recommended", "spicy"]));
    }

    #[test]
    fn test_category_new_derives_slug() {
        let category = Category::new("Hot Drinks", "", "");
        assert_eq!(category.slug.as_str(), "hot-drinks");
        assert!(!category.id.as_str().is_empty());
    }
}
