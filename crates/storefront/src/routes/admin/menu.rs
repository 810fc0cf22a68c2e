//! Dish, category, testimonial and gallery management.
//!
//! Deleting a category keeps its dishes; they show without a category
//! until reassigned. Uploaded images are deleted once no record uses them.

use std::collections::BTreeSet;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use bistro_core::{
    Category, CategoryId, Dish, DishId, DishTag, GalleryImage, GalleryImageId, Price, Slug,
    Testimonial, TestimonialId,
};

use super::{AdminResponse, apply, release_images};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireAdmin;
use crate::state::AppState;
use crate::store::Action;
use crate::validation::ValidationErrors;

const MAX_NAME_LEN: usize = 120;

type Created<T> = (StatusCode, Json<AdminResponse<T>>);

// =============================================================================
// Dishes
// =============================================================================

/// Dish fields accepted from the editor.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishInput {
    pub name: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    /// Keys, URLs or inline data URLs; inline data is uploaded.
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

impl DishInput {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name, "Name");
        errors.max_len("name", &self.name, MAX_NAME_LEN);
        errors.require("categoryId", self.category_id.as_str(), "Category");
        errors.into_result()
    }

    fn into_dish(self, id: DishId) -> Dish {
        Dish {
            id,
            name: self.name.trim().to_string(),
            short_description: self.short_description,
            description: self.description,
            price: self.price,
            images: self.images,
            category_id: self.category_id,
            available: self.available,
            tags: self.tags,
        }
    }
}

#[instrument(skip_all)]
pub async fn dishes(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Json<AdminResponse<Vec<Dish>>> {
    let dishes = state.store().read().await.state().dishes.clone();
    Json(AdminResponse::new(dishes))
}

/// Create a dish, uploading any inline images first.
#[instrument(skip_all)]
pub async fn create_dish(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(input): Json<DishInput>,
) -> Result<Created<Dish>> {
    input.validate()?;
    let mut dish = input.into_dish(DishId::generate());
    add_breadcrumb("admin", "Create dish", Some(&[("id", dish.id.as_str())]));

    state.images().store_all(&mut dish.images).await?;
    let persistence = apply(&state, Action::AddDish { dish: dish.clone() }).await;

    tracing::info!(id = %dish.id, name = %dish.name, "Dish created");
    Ok((
        StatusCode::CREATED,
        Json(AdminResponse::persisted(dish, &persistence)),
    ))
}

/// Replace a dish. Images dropped from the dish are deleted.
#[instrument(skip_all, fields(id = %id))]
pub async fn update_dish(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
    Json(input): Json<DishInput>,
) -> Result<Json<AdminResponse<Dish>>> {
    let id = DishId::new(id);
    input.validate()?;
    add_breadcrumb("admin", "Update dish", Some(&[("id", id.as_str())]));

    let previous = state
        .store()
        .read()
        .await
        .state()
        .dish(&id)
        .map(|dish| dish.images.clone())
        .ok_or_else(|| AppError::NotFound("Dish".to_string()))?;

    let mut dish = input.into_dish(id);
    state.images().store_all(&mut dish.images).await?;
    let persistence = apply(&state, Action::UpdateDish { dish: dish.clone() }).await;

    release_images(&state, previous).await;

    Ok(Json(AdminResponse::persisted(dish, &persistence)))
}

/// Delete a dish and its uploaded images.
#[instrument(skip_all, fields(id = %id))]
pub async fn delete_dish(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<AdminResponse<DishId>>> {
    let id = DishId::new(id);
    add_breadcrumb("admin", "Delete dish", Some(&[("id", id.as_str())]));

    let images = state
        .store()
        .read()
        .await
        .state()
        .dish(&id)
        .map(|dish| dish.images.clone())
        .ok_or_else(|| AppError::NotFound("Dish".to_string()))?;

    let persistence = apply(&state, Action::DeleteDish { id: id.clone() }).await;
    release_images(&state, images).await;

    Ok(Json(AdminResponse::persisted(id, &persistence)))
}

// =============================================================================
// Categories
// =============================================================================

/// Category fields accepted from the editor. The slug is derived from the
/// name.
#[derive(Debug, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
}

impl CategoryInput {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name, "Name");
        errors.max_len("name", &self.name, MAX_NAME_LEN);
        errors.into_result()
    }

    fn into_category(self, id: CategoryId) -> Category {
        let name = self.name.trim().to_string();
        Category {
            id,
            slug: Slug::from_name(&name),
            name,
            description: self.description,
            image: self.image,
        }
    }
}

#[instrument(skip_all)]
pub async fn categories(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Json<AdminResponse<Vec<Category>>> {
    let categories = state.store().read().await.state().categories.clone();
    Json(AdminResponse::new(categories))
}

#[instrument(skip_all)]
pub async fn create_category(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(input): Json<CategoryInput>,
) -> Result<Created<Category>> {
    input.validate()?;
    let mut category = input.into_category(CategoryId::generate());
    add_breadcrumb(
        "admin",
        "Create category",
        Some(&[("id", category.id.as_str())]),
    );

    category.image = state.images().store(&category.image).await?;
    let persistence = apply(
        &state,
        Action::AddCategory {
            category: category.clone(),
        },
    )
    .await;

    tracing::info!(id = %category.id, slug = %category.slug, "Category created");
    Ok((
        StatusCode::CREATED,
        Json(AdminResponse::persisted(category, &persistence)),
    ))
}

#[instrument(skip_all, fields(id = %id))]
pub async fn update_category(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
    Json(input): Json<CategoryInput>,
) -> Result<Json<AdminResponse<Category>>> {
    let id = CategoryId::new(id);
    input.validate()?;
    add_breadcrumb("admin", "Update category", Some(&[("id", id.as_str())]));

    let previous = state
        .store()
        .read()
        .await
        .state()
        .category(&id)
        .map(|category| category.image.clone())
        .ok_or_else(|| AppError::NotFound("Category".to_string()))?;

    let mut category = input.into_category(id);
    category.image = state.images().store(&category.image).await?;
    let persistence = apply(
        &state,
        Action::UpdateCategory {
            category: category.clone(),
        },
    )
    .await;

    release_images(&state, vec![previous]).await;

    Ok(Json(AdminResponse::persisted(category, &persistence)))
}

/// Delete a category. Its dishes are kept.
#[instrument(skip_all, fields(id = %id))]
pub async fn delete_category(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<AdminResponse<CategoryId>>> {
    let id = CategoryId::new(id);
    add_breadcrumb("admin", "Delete category", Some(&[("id", id.as_str())]));

    let image = state
        .store()
        .read()
        .await
        .state()
        .category(&id)
        .map(|category| category.image.clone())
        .ok_or_else(|| AppError::NotFound("Category".to_string()))?;

    let persistence = apply(&state, Action::DeleteCategory { id: id.clone() }).await;
    release_images(&state, vec![image]).await;

    Ok(Json(AdminResponse::persisted(id, &persistence)))
}

// =============================================================================
// Testimonials
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct TestimonialInput {
    pub author: String,
    pub quote: String,
}

impl TestimonialInput {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("author", &self.author, "Author");
        errors.require("quote", &self.quote, "Quote");
        errors.into_result()
    }

    fn into_testimonial(self, id: TestimonialId) -> Testimonial {
        Testimonial {
            id,
            author: self.author.trim().to_string(),
            quote: self.quote.trim().to_string(),
        }
    }
}

#[instrument(skip_all)]
pub async fn testimonials(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Json<AdminResponse<Vec<Testimonial>>> {
    let testimonials = state.store().read().await.state().testimonials.clone();
    Json(AdminResponse::new(testimonials))
}

#[instrument(skip_all)]
pub async fn create_testimonial(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(input): Json<TestimonialInput>,
) -> Result<Created<Testimonial>> {
    input.validate()?;
    let testimonial = input.into_testimonial(TestimonialId::generate());
    add_breadcrumb("admin", "Create testimonial", None);

    let persistence = apply(
        &state,
        Action::AddTestimonial {
            testimonial: testimonial.clone(),
        },
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(AdminResponse::persisted(testimonial, &persistence)),
    ))
}

#[instrument(skip_all, fields(id = %id))]
pub async fn update_testimonial(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
    Json(input): Json<TestimonialInput>,
) -> Result<Json<AdminResponse<Testimonial>>> {
    let id = TestimonialId::new(id);
    input.validate()?;
    add_breadcrumb("admin", "Update testimonial", Some(&[("id", id.as_str())]));

    if state.store().read().await.state().testimonial(&id).is_none() {
        return Err(AppError::NotFound("Testimonial".to_string()));
    }

    let testimonial = input.into_testimonial(id);
    let persistence = apply(
        &state,
        Action::UpdateTestimonial {
            testimonial: testimonial.clone(),
        },
    )
    .await;

    Ok(Json(AdminResponse::persisted(testimonial, &persistence)))
}

#[instrument(skip_all, fields(id = %id))]
pub async fn delete_testimonial(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<AdminResponse<TestimonialId>>> {
    let id = TestimonialId::new(id);
    add_breadcrumb("admin", "Delete testimonial", Some(&[("id", id.as_str())]));

    if state.store().read().await.state().testimonial(&id).is_none() {
        return Err(AppError::NotFound("Testimonial".to_string()));
    }

    let persistence = apply(&state, Action::DeleteTestimonial { id: id.clone() }).await;
    Ok(Json(AdminResponse::persisted(id, &persistence)))
}

// =============================================================================
// Gallery
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct GalleryInput {
    pub image: String,
    #[serde(default)]
    pub alt: String,
}

#[instrument(skip_all)]
pub async fn gallery(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Json<AdminResponse<Vec<GalleryImage>>> {
    let gallery = state.store().read().await.state().gallery.clone();
    Json(AdminResponse::new(gallery))
}

/// Add a gallery photo. The image is required.
#[instrument(skip_all)]
pub async fn add_gallery_image(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(input): Json<GalleryInput>,
) -> Result<Created<GalleryImage>> {
    let mut errors = ValidationErrors::new();
    errors.require("image", &input.image, "Image");
    errors.into_result()?;
    add_breadcrumb("admin", "Add gallery image", None);

    let image = GalleryImage {
        id: GalleryImageId::generate(),
        image: state.images().store(&input.image).await?,
        alt: input.alt,
    };
    let persistence = apply(
        &state,
        Action::AddGalleryImage {
            image: image.clone(),
        },
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(AdminResponse::persisted(image, &persistence)),
    ))
}

/// Remove a gallery photo and its uploaded image.
#[instrument(skip_all, fields(id = %id))]
pub async fn delete_gallery_image(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<AdminResponse<GalleryImageId>>> {
    let id = GalleryImageId::new(id);
    add_breadcrumb("admin", "Delete gallery image", Some(&[("id", id.as_str())]));

    let image = state
        .store()
        .read()
        .await
        .state()
        .gallery_image(&id)
        .map(|g| g.image.clone())
        .ok_or_else(|| AppError::NotFound("Gallery image".to_string()))?;

    let persistence = apply(&state, Action::DeleteGalleryImage { id: id.clone() }).await;
    release_images(&state, vec![image]).await;

    Ok(Json(AdminResponse::persisted(id, &persistence)))
}
