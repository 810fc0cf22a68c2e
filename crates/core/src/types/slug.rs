//! URL-safe slugs derived from display names.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A URL-safe slug: lowercase ASCII letters and digits separated by single
/// hyphens.
///
/// Slugs are derived from names and are not guaranteed to be unique; two
/// categories called "Drinks" share the slug `drinks`.
///
/// ```
/// use bistro_core::Slug;
///
/// assert_eq!(Slug::from_name("Soups & Starters").as_str(), "soups-starters");
/// assert_eq!(Slug::from_name("  Chef's   Specials! ").as_str(), "chef-s-specials");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Slug used when a name has no ASCII letters or digits.
    pub const FALLBACK: &'static str = "untitled";

    /// Derive a slug from a display name.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let mut slug = String::with_capacity(name.len());
        let mut pending_hyphen = false;

        for c in name.chars() {
            if c.is_ascii_alphanumeric() {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push(c.to_ascii_lowercase());
            } else {
                pending_hyphen = true;
            }
        }

        if slug.is_empty() {
            slug.push_str(Self::FALLBACK);
        }
        Self(slug)
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Slug {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_name() {
        assert_eq!(Slug::from_name("Desserts").as_str(), "desserts");
    }

    #[test]
    fn test_collapses_separators() {
        assert_eq!(Slug::from_name("Wood -- Fired  Pizza").as_str(), "wood-fired-pizza");
    }

    #[test]
    fn test_trims_edges() {
        assert_eq!(Slug::from_name("--Grill--").as_str(), "grill");
    }

    #[test]
    fn test_drops_non_ascii() {
        assert_eq!(Slug::from_name("Café Crème").as_str(), "caf-cr-me");
    }

    #[test]
    fn test_empty_falls_back() {
        assert_eq!(Slug::from_name("!!!").as_str(), Slug::FALLBACK);
        assert_eq!(Slug::from_name("").as_str(), Slug::FALLBACK);
    }

    #[test]
    fn test_not_unique() {
        assert_eq!(Slug::from_name("Drinks"), Slug::from_name("drinks"));
    }
}
