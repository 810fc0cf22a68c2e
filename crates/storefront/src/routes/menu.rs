//! Public catalog route handlers.
//!
//! Everything here reads the domain store and returns JSON with image
//! references resolved to loadable URLs.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use bistro_core::{
    Category, CategoryId, DesignSettings, Dish, DishId, DishTag, GalleryImage, Price, SiteContent,
    Testimonial,
};

use crate::error::{AppError, Result};
use crate::images::{ImageStore, ObjectStorage};
use crate::state::AppState;
use crate::store::SiteState;

/// Category as shown to visitors.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image: String,
}

impl CategoryView {
    pub fn new<B: ObjectStorage>(category: &Category, images: &ImageStore<B>) -> Self {
        Self {
            id: category.id.clone(),
            name: category.name.clone(),
            slug: category.slug.to_string(),
            description: category.description.clone(),
            image: images.resolve(&category.image),
        }
    }
}

/// Name and slug of the category a dish belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryLink {
    pub name: String,
    pub slug: String,
}

/// Dish as shown to visitors.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DishView {
    pub id: DishId,
    pub name: String,
    pub short_description: String,
    pub description: String,
    pub price: Price,
    pub price_display: String,
    pub images: Vec<String>,
    pub category_id: CategoryId,
    /// `None` when the category no longer exists.
    pub category: Option<CategoryLink>,
    pub available: bool,
    pub tags: Vec<DishTag>,
}

impl DishView {
    pub fn new<B: ObjectStorage>(dish: &Dish, state: &SiteState, images: &ImageStore<B>) -> Self {
        let symbol = &state.site_content.currency_symbol;
        Self {
            id: dish.id.clone(),
            name: dish.name.clone(),
            short_description: dish.short_description.clone(),
            description: dish.description.clone(),
            price: dish.price,
            price_display: dish.price.display(symbol),
            images: if dish.images.is_empty() {
                vec![images.resolve("")]
            } else {
                dish.images.iter().map(|r| images.resolve(r)).collect()
            },
            category_id: dish.category_id.clone(),
            category: state.category_for(dish).map(|c| CategoryLink {
                name: c.name.clone(),
                slug: c.slug.to_string(),
            }),
            available: dish.available,
            tags: dish.tags.iter().copied().collect(),
        }
    }
}

/// Site copy and design settings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteView {
    pub site_content: SiteContent,
    pub design: DesignSettings,
    pub featured_category: Option<CategoryView>,
}

/// Full menu.
#[derive(Debug, Serialize)]
pub struct MenuView {
    pub categories: Vec<CategoryView>,
    pub dishes: Vec<DishView>,
}

/// One category with its dishes.
#[derive(Debug, Serialize)]
pub struct CategoryPage {
    pub category: CategoryView,
    pub dishes: Vec<DishView>,
}

/// Site copy and design with image references resolved.
#[instrument(skip(state))]
pub async fn site(State(state): State<AppState>) -> Json<SiteView> {
    let store = state.store().read().await;
    let current = store.state();
    let images = state.images();

    let mut site_content = current.site_content.clone();
    site_content.hero.background_image = images.resolve(&site_content.hero.background_image);
    site_content.about.image = images.resolve(&site_content.about.image);

    let mut design = current.design.clone();
    design.logo_image = design.logo_image.as_deref().map(|r| images.resolve(r));
    design.favicon = design.favicon.as_deref().map(|r| images.resolve(r));

    Json(SiteView {
        site_content,
        design,
        featured_category: current
            .featured_category()
            .map(|c| CategoryView::new(c, images)),
    })
}

/// All categories and dishes.
#[instrument(skip(state))]
pub async fn menu(State(state): State<AppState>) -> Json<MenuView> {
    let store = state.store().read().await;
    let current = store.state();
    let images = state.images();

    Json(MenuView {
        categories: current
            .categories
            .iter()
            .map(|c| CategoryView::new(c, images))
            .collect(),
        dishes: current
            .dishes
            .iter()
            .map(|d| DishView::new(d, current, images))
            .collect(),
    })
}

/// One category by slug.
#[instrument(skip(state))]
pub async fn category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CategoryPage>> {
    let store = state.store().read().await;
    let current = store.state();
    let images = state.images();

    let category = current
        .category_by_slug(&slug)
        .ok_or_else(|| AppError::NotFound("Category".to_string()))?;

    Ok(Json(CategoryPage {
        category: CategoryView::new(category, images),
        dishes: current
            .dishes_in(&category.id)
            .map(|d| DishView::new(d, current, images))
            .collect(),
    }))
}

/// One dish by ID.
#[instrument(skip(state))]
pub async fn dish(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<DishView>> {
    let store = state.store().read().await;
    let current = store.state();

    let dish = current
        .dish(&DishId::new(id))
        .ok_or_else(|| AppError::NotFound("Dish".to_string()))?;

    Ok(Json(DishView::new(dish, current, state.images())))
}

/// Gallery images.
#[instrument(skip(state))]
pub async fn gallery(State(state): State<AppState>) -> Json<Vec<GalleryImage>> {
    let store = state.store().read().await;
    let images = state.images();

    Json(
        store
            .state()
            .gallery
            .iter()
            .map(|g| GalleryImage {
                image: images.resolve(&g.image),
                ..g.clone()
            })
            .collect(),
    )
}

/// Guest testimonials.
#[instrument(skip(state))]
pub async fn testimonials(State(state): State<AppState>) -> Json<Vec<Testimonial>> {
    let store = state.store().read().await;
    Json(store.state().testimonials.clone())
}
