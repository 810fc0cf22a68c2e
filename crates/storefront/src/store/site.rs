//! The aggregate state held by the domain store.

use serde::{Deserialize, Serialize};

use bistro_core::{
    Category, CategoryId, DesignSettings, Dish, DishId, GalleryImage, GalleryImageId,
    SiteContent, Testimonial, TestimonialId,
};

use crate::collection::find_by_id;

/// Everything the public site renders from: six independently persisted
/// slices.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteState {
    pub site_content: SiteContent,
    pub dishes: Vec<Dish>,
    pub categories: Vec<Category>,
    pub gallery: Vec<GalleryImage>,
    pub testimonials: Vec<Testimonial>,
    pub design: DesignSettings,
}

impl SiteState {
    #[must_use]
    pub fn dish(&self, id: &DishId) -> Option<&Dish> {
        find_by_id(&self.dishes, id)
    }

    #[must_use]
    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        find_by_id(&self.categories, id)
    }

    /// The category a dish is filed under.
    ///
    /// Returns `None` when the category was deleted after the dish was
    /// created; such dishes are kept as-is.
    #[must_use]
    pub fn category_for(&self, dish: &Dish) -> Option<&Category> {
        self.category(&dish.category_id)
    }

    /// First category whose slug matches. Slugs are not unique.
    #[must_use]
    pub fn category_by_slug(&self, slug: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.slug == *slug)
    }

    /// Dishes filed under `category_id`, in menu order.
    pub fn dishes_in<'a>(&'a self, category_id: &'a CategoryId) -> impl Iterator<Item = &'a Dish> {
        self.dishes
            .iter()
            .filter(move |dish| &dish.category_id == category_id)
    }

    /// The category highlighted by the design settings, if it still exists.
    #[must_use]
    pub fn featured_category(&self) -> Option<&Category> {
        self.design
            .featured_category_id
            .as_ref()
            .and_then(|id| self.category(id))
    }

    #[must_use]
    pub fn testimonial(&self, id: &TestimonialId) -> Option<&Testimonial> {
        find_by_id(&self.testimonials, id)
    }

    #[must_use]
    pub fn gallery_image(&self, id: &GalleryImageId) -> Option<&GalleryImage> {
        find_by_id(&self.gallery, id)
    }

    /// Every image reference held anywhere in the state.
    pub fn image_references(&self) -> impl Iterator<Item = &str> {
        let content = [
            self.site_content.hero.background_image.as_str(),
            self.site_content.about.image.as_str(),
        ];
        let design = [&self.design.logo_image, &self.design.favicon]
            .into_iter()
            .filter_map(|image| image.as_deref());

        let dishes = self
            .dishes
            .iter()
            .flat_map(|dish| dish.images.iter().map(String::as_str));

        content
            .into_iter()
            .chain(design)
            .chain(dishes)
            .chain(self.categories.iter().map(|c| c.image.as_str()))
            .chain(self.gallery.iter().map(|g| g.image.as_str()))
    }

    /// Whether any dish, category, gallery photo, content section or design
    /// setting still uses `reference`.
    #[must_use]
    pub fn references_image(&self, reference: &str) -> bool {
        self.image_references().any(|r| r == reference)
    }
}
