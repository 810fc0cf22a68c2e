//! Cart and checkout route handlers.
//!
//! The cart lives in the visitor session. Every change loads it, applies
//! the change, and writes it back before responding.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use bistro_core::{DishId, Price};

use crate::cart::{Cart, CartSession};
use crate::error::{AppError, Result};
use crate::order::{OrderHandoff, OrderRequest, build_handoff};
use crate::state::AppState;

/// One priced cart line.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub dish_id: DishId,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub unit_price: Price,
    pub line_total: Price,
    pub available: bool,
}

/// Cart display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub total_quantity: u32,
    pub total: Price,
    pub total_display: String,
}

impl CartView {
    async fn build(state: &AppState, cart: &Cart) -> Self {
        let store = state.store().read().await;
        let current = store.state();
        let images = state.images();

        let items: Vec<_> = cart
            .lines(current)
            .into_iter()
            .map(|line| CartLineView {
                dish_id: line.dish.id.clone(),
                name: line.dish.name.clone(),
                image: images.resolve(line.dish.cover_image().unwrap_or_default()),
                quantity: line.quantity,
                unit_price: line.dish.price,
                line_total: line.line_total,
                available: line.dish.available,
            })
            .collect();
        let total = cart.total(current);

        Self {
            total_quantity: items.iter().map(|item| item.quantity).sum(),
            total_display: total.display(&current.site_content.currency_symbol),
            items,
            total,
        }
    }
}

/// Add-to-cart request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart {
    pub dish_id: DishId,
    #[serde(default = "one")]
    pub quantity: u32,
}

const fn one() -> u32 {
    1
}

/// Quantity update request. Zero or below removes the line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCart {
    pub dish_id: DishId,
    pub quantity: i64,
}

/// Remove-from-cart request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCart {
    pub dish_id: DishId,
}

/// Show the cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Json<CartView> {
    let cart = CartSession::new(&session).load().await;
    Json(CartView::build(&state, &cart).await)
}

/// Add a dish to the cart.
///
/// Unknown dishes are rejected. Unavailable dishes are accepted; the line
/// carries the flag for display.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddToCart>,
) -> Result<Json<CartView>> {
    if state.store().read().await.state().dish(&request.dish_id).is_none() {
        return Err(AppError::NotFound("Dish".to_string()));
    }

    let cart = CartSession::new(&session)
        .update(|cart| cart.add(&request.dish_id, request.quantity))
        .await?;
    Ok(Json(CartView::build(&state, &cart).await))
}

/// Set the quantity of a cart line.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<UpdateCart>,
) -> Result<Json<CartView>> {
    let cart = CartSession::new(&session)
        .update(|cart| cart.update_quantity(&request.dish_id, request.quantity))
        .await?;
    Ok(Json(CartView::build(&state, &cart).await))
}

/// Remove a cart line.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<RemoveFromCart>,
) -> Result<Json<CartView>> {
    let cart = CartSession::new(&session)
        .update(|cart| cart.remove(&request.dish_id))
        .await?;
    Ok(Json(CartView::build(&state, &cart).await))
}

/// Empty the cart.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let cart = CartSession::new(&session).update(Cart::clear).await?;
    Ok(Json(CartView::build(&state, &cart).await))
}

/// Turn the cart into a messaging handoff link and empty the cart.
#[instrument(skip(state, session, request), fields(fulfillment = ?request.fulfillment))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<OrderRequest>,
) -> Result<Json<OrderHandoff>> {
    let carts = CartSession::new(&session);
    let cart = carts.load().await;

    let handoff = {
        let store = state.store().read().await;
        build_handoff(&request, &cart, store.state())?
    };

    carts.save(&Cart::default()).await?;
    tracing::info!(
        items = cart.total_quantity(),
        total = %handoff.total,
        "Order handed off"
    );
    Ok(Json(handoff))
}
