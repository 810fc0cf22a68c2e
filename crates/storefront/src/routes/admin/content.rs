//! Site content and design editing.
//!
//! Both are replaced as a whole. Inline images in the submitted document
//! are uploaded first; replaced images that nothing else references are
//! deleted after the change is applied.

use axum::{Json, extract::State};
use tracing::instrument;

use bistro_core::{DesignSettings, SiteContent};

use super::{AdminResponse, apply, release_images};
use crate::error::{Result, add_breadcrumb};
use crate::middleware::RequireAdmin;
use crate::state::AppState;
use crate::store::Action;

fn content_images(content: SiteContent) -> Vec<String> {
    vec![content.hero.background_image, content.about.image]
}

fn design_images(design: DesignSettings) -> Vec<String> {
    [design.logo_image, design.favicon]
        .into_iter()
        .flatten()
        .collect()
}

/// Current site content with raw image references.
#[instrument(skip_all)]
pub async fn site_content(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Json<AdminResponse<SiteContent>> {
    let content = state.store().read().await.state().site_content.clone();
    Json(AdminResponse::new(content))
}

/// Replace the site content.
#[instrument(skip_all)]
pub async fn update_site_content(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(mut content): Json<SiteContent>,
) -> Result<Json<AdminResponse<SiteContent>>> {
    add_breadcrumb("admin", "Update site content", None);

    let previous = state.store().read().await.state().site_content.clone();

    let images = state.images();
    let background = images.store(&content.hero.background_image).await?;
    content.hero.background_image = background;
    let about = images.store(&content.about.image).await?;
    content.about.image = about;

    let persistence = apply(
        &state,
        Action::UpdateSiteContent {
            content: Box::new(content.clone()),
        },
    )
    .await;

    release_images(&state, content_images(previous)).await;

    Ok(Json(AdminResponse::persisted(content, &persistence)))
}

/// Current design settings with raw image references.
#[instrument(skip_all)]
pub async fn design(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Json<AdminResponse<DesignSettings>> {
    let design = state.store().read().await.state().design.clone();
    Json(AdminResponse::new(design))
}

/// Replace the design settings.
#[instrument(skip_all)]
pub async fn update_design(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(mut design): Json<DesignSettings>,
) -> Result<Json<AdminResponse<DesignSettings>>> {
    add_breadcrumb("admin", "Update design", None);

    let previous = state.store().read().await.state().design.clone();

    let images = state.images();
    if let Some(logo) = design.logo_image.take() {
        design.logo_image = Some(images.store(&logo).await?);
    }
    if let Some(favicon) = design.favicon.take() {
        design.favicon = Some(images.store(&favicon).await?);
    }

    let persistence = apply(
        &state,
        Action::UpdateDesign {
            design: design.clone(),
        },
    )
    .await;

    release_images(&state, design_images(previous)).await;

    Ok(Json(AdminResponse::persisted(design, &persistence)))
}
