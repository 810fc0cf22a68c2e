//! Mutations accepted by the domain store.

use serde::{Deserialize, Serialize};

use bistro_core::{
    Category, CategoryId, DesignSettings, Dish, DishId, GalleryImage, GalleryImageId,
    SiteContent, Testimonial, TestimonialId,
};

use super::SiteState;

/// A single state mutation.
///
/// Serialized as an internally tagged object, e.g.
/// `{"type": "DELETE_DISH", "id": "1718030400123-0"}`. Any tag not listed
/// here deserializes to [`Action::Unknown`], which the store ignores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Replace the entire state.
    SetState { state: Box<SiteState> },
    UpdateSiteContent { content: Box<SiteContent> },
    AddDish { dish: Dish },
    UpdateDish { dish: Dish },
    DeleteDish { id: DishId },
    AddCategory { category: Category },
    UpdateCategory { category: Category },
    DeleteCategory { id: CategoryId },
    AddGalleryImage { image: GalleryImage },
    DeleteGalleryImage { id: GalleryImageId },
    AddTestimonial { testimonial: Testimonial },
    UpdateTestimonial { testimonial: Testimonial },
    DeleteTestimonial { id: TestimonialId },
    UpdateDesign { design: DesignSettings },
    /// Fallback for unrecognised tags.
    #[serde(other)]
    Unknown,
}

impl Action {
    /// Tag name for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SetState { .. } => "SET_STATE",
            Self::UpdateSiteContent { .. } => "UPDATE_SITE_CONTENT",
            Self::AddDish { .. } => "ADD_DISH",
            Self::UpdateDish { .. } => "UPDATE_DISH",
            Self::DeleteDish { .. } => "DELETE_DISH",
            Self::AddCategory { .. } => "ADD_CATEGORY",
            Self::UpdateCategory { .. } => "UPDATE_CATEGORY",
            Self::DeleteCategory { .. } => "DELETE_CATEGORY",
            Self::AddGalleryImage { .. } => "ADD_GALLERY_IMAGE",
            Self::DeleteGalleryImage { .. } => "DELETE_GALLERY_IMAGE",
            Self::AddTestimonial { .. } => "ADD_TESTIMONIAL",
            Self::UpdateTestimonial { .. } => "UPDATE_TESTIMONIAL",
            Self::DeleteTestimonial { .. } => "DELETE_TESTIMONIAL",
            Self::UpdateDesign { .. } => "UPDATE_DESIGN",
            Self::Unknown => "UNKNOWN",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tag_deserializes_to_unknown() {
        let action: Action =
            serde_json::from_str(r#"{"type":"SET_THEME_COLOR","color":"red"}"#).unwrap();
        assert_eq!(action, Action::Unknown);
    }

    #[test]
    fn test_tagged_shape() {
        let action = Action::DeleteDish {
            id: DishId::new("d1"),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json, serde_json::json!({"type": "DELETE_DISH", "id": "d1"}));
        assert_eq!(action.kind(), "DELETE_DISH");
    }

    #[test]
    fn test_parse_add_category() {
        let action: Action = serde_json::from_str(
            r#"{"type":"ADD_CATEGORY","category":{"id":"c9","name":"Tapas","slug":"tapas"}}"#,
        )
        .unwrap();
        match action {
            Action::AddCategory { category } => assert_eq!(category.slug.as_str(), "tapas"),
            other => panic!("unexpected action {other:?}"),
        }
    }
}
