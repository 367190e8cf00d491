//! Cart route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use pazar_core::{Price, Product, ProductId};

use crate::state::AppState;
use crate::store::{Cart, CartEntry, Intent};

/// Cart line display data.
#[derive(Debug, Serialize)]
pub struct CartItemView {
    pub product: Product,
    pub quantity: u32,
    pub line_total: Price,
    pub line_total_display: String,
}

/// Cart display data.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: Price,
    pub total_display: String,
    pub item_count: u64,
}

impl From<&CartEntry> for CartItemView {
    fn from(entry: &CartEntry) -> Self {
        let line_total = entry.line_total();
        Self {
            product: entry.product.clone(),
            quantity: entry.quantity,
            line_total,
            line_total_display: line_total.display(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.entries().iter().map(CartItemView::from).collect(),
            total: cart.total(),
            total_display: cart.total().display(),
            item_count: cart.item_count(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub product_id: ProductId,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct RemoveRequest {
    pub product_id: ProductId,
}

async fn apply(state: &AppState, intent: Intent) -> Json<CartView> {
    let mut store = state.store().write().await;
    store.dispatch(intent);
    Json(CartView::from(store.cart()))
}

#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    Json(CartView::from(state.store().read().await.cart()))
}

/// Add one unit of the posted product snapshot.
#[instrument(skip(state, product), fields(product_id = %product.id))]
pub async fn add(State(state): State<AppState>, Json(product): Json<Product>) -> Json<CartView> {
    apply(&state, Intent::AddToCart(product)).await
}

#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Json(request): Json<UpdateQuantityRequest>,
) -> Json<CartView> {
    apply(
        &state,
        Intent::UpdateQuantity {
            id: request.product_id,
            quantity: request.quantity,
        },
    )
    .await
}

#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(request): Json<RemoveRequest>,
) -> Json<CartView> {
    apply(&state, Intent::RemoveFromCart(request.product_id)).await
}

#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Json<CartView> {
    apply(&state, Intent::ClearCart).await
}

#[instrument(skip(state))]
pub async fn increment(State(state): State<AppState>, Path(id): Path<i32>) -> Json<CartView> {
    apply(&state, Intent::IncrementQuantity(ProductId::new(id))).await
}

#[instrument(skip(state))]
pub async fn decrement(State(state): State<AppState>, Path(id): Path<i32>) -> Json<CartView> {
    apply(&state, Intent::DecrementQuantity(ProductId::new(id))).await
}
