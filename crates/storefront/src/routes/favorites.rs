//! Favorites route handlers.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use pazar_core::{Product, ProductId};

use crate::state::AppState;
use crate::store::{Favorites, Intent};

#[derive(Debug, Serialize)]
pub struct FavoritesView {
    pub items: Vec<Product>,
    pub count: usize,
}

impl From<&Favorites> for FavoritesView {
    fn from(favorites: &Favorites) -> Self {
        Self {
            items: favorites.items().to_vec(),
            count: favorites.len(),
        }
    }
}

/// Result of a toggle: whether the product is now a favorite.
#[derive(Debug, Serialize)]
pub struct ToggleView {
    pub product_id: ProductId,
    pub favorite: bool,
    #[serde(flatten)]
    pub favorites: FavoritesView,
}

#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<FavoritesView> {
    Json(FavoritesView::from(state.store().read().await.favorites()))
}

#[instrument(skip(state, product), fields(product_id = %product.id))]
pub async fn toggle(
    State(state): State<AppState>,
    Json(product): Json<Product>,
) -> Json<ToggleView> {
    let product_id = product.id;
    let mut store = state.store().write().await;
    store.dispatch(Intent::ToggleFavorite(product));

    let favorites = store.favorites();
    Json(ToggleView {
        product_id,
        favorite: favorites.is_favorite(product_id),
        favorites: FavoritesView::from(favorites),
    })
}

#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Json<FavoritesView> {
    let mut store = state.store().write().await;
    store.dispatch(Intent::ClearFavorites);
    Json(FavoritesView::from(store.favorites()))
}
