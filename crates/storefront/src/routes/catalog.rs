//! Category, filter, and product listing handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use pazar_core::{Category, CategoryId, FilterId, Product};

use crate::catalog::{fetch_category_products, mapper};
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::store::{FilterOption, Intent};

/// Optional search text.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Filter screen state for one category.
#[derive(Debug, Serialize)]
pub struct FiltersView {
    pub category: CategoryId,
    pub options: Vec<FilterOption>,
}

/// Product listing for one category.
#[derive(Debug, Serialize)]
pub struct ProductsView {
    pub category: Category,
    pub applied_filters: Vec<FilterOption>,
    pub products: Vec<Product>,
}

/// List categories, narrowed by `q`.
#[instrument(skip(state))]
pub async fn categories(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<Category>> {
    Json(state.table().search(&query.q))
}

/// Reseed the filter screen for a category.
#[instrument(skip(state))]
pub async fn open_filters(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Json<FiltersView> {
    let category = CategoryId::new(id);
    let selection = state.table().filter_selection(category);
    let options = selection.options().to_vec();

    state.store().write().await.dispatch(Intent::OpenFilters {
        category,
        selection,
    });

    Json(FiltersView { category, options })
}

/// Toggle one option on an open filter screen.
#[instrument(skip(state))]
pub async fn toggle_filter(
    State(state): State<AppState>,
    Path((id, filter)): Path<(i32, i32)>,
) -> Result<Json<FiltersView>> {
    let category = CategoryId::new(id);
    let mut store = state.store().write().await;
    store.dispatch(Intent::ToggleFilter {
        category,
        filter: FilterId::new(filter),
    });

    let options = store
        .filter_selection(category)
        .map(|s| s.options().to_vec())
        .ok_or_else(|| filters_not_open(category))?;

    Ok(Json(FiltersView { category, options }))
}

/// Make the current selection the active filter set.
#[instrument(skip(state))]
pub async fn apply_filters(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<FilterOption>>> {
    let category = CategoryId::new(id);
    let mut store = state.store().write().await;
    if store.filter_selection(category).is_none() {
        return Err(filters_not_open(category));
    }

    store.dispatch(Intent::ApplyFilters(category));
    Ok(Json(store.applied_filters(category).to_vec()))
}

fn filters_not_open(category: CategoryId) -> AppError {
    AppError::NotFound(format!("filters for category {category} are not open"))
}

/// Fetch a category's products under its applied filters.
///
/// Calling again after a failure retries the same endpoints.
#[instrument(skip(state))]
pub async fn products(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ProductsView>> {
    let category = CategoryId::new(id);
    // Snapshot the filters so the lock is not held across upstream calls.
    let applied_filters = state.store().read().await.applied_filters(category).to_vec();

    let products =
        fetch_category_products(state.catalog(), state.table(), category, &applied_filters)
            .await?;
    let products = if query.q.trim().is_empty() {
        products
    } else {
        mapper::search_products(&products, &query.q)
    };

    Ok(Json(ProductsView {
        category: state.table().category_or_fallback(category),
        applied_filters,
        products,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{Method, StatusCode};

    use crate::routes::app;
    use crate::routes::test_support::{send, state};

    #[tokio::test]
    async fn test_categories_search() {
        let app = app(state());
        let (status, body) = send(&app, Method::GET, "/categories", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 6);

        let (_, body) = send(&app, Method::GET, "/categories?q=giyim", None).await;
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Üst Giyim", "Alt Giyim"]);
    }

    #[tokio::test]
    async fn test_filter_flow() {
        let app = app(state());

        let (status, body) = send(&app, Method::POST, "/categories/1/filters", None).await;
        assert_eq!(status, StatusCode::OK);
        let options = body["options"].as_array().unwrap();
        assert_eq!(options.len(), 3);
        assert_eq!(options[0]["name"], "Tümü");
        assert_eq!(options[0]["selected"], true);

        let (status, body) = send(
            &app,
            Method::POST,
            "/categories/1/filters/1/toggle",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["options"][0]["selected"], false);
        assert_eq!(body["options"][1]["selected"], true);

        let (_, applied) = send(&app, Method::POST, "/categories/1/filters/apply", None).await;
        let applied = applied.as_array().unwrap();
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0]["name"], "Telefonlar");
    }

    #[tokio::test]
    async fn test_toggle_without_open_filters() {
        let app = app(state());
        let (status, _) = send(
            &app,
            Method::POST,
            "/categories/2/filters/1/toggle",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_apply_without_open_filters() {
        let app = app(state());
        let (status, body) = send(&app, Method::POST, "/categories/2/filters/apply", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("not open"));

        // opening the screen first makes apply succeed
        let (status, _) = send(&app, Method::POST, "/categories/2/filters", None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, applied) = send(&app, Method::POST, "/categories/2/filters/apply", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(applied.as_array().unwrap().len(), 1);
        assert_eq!(applied[0]["name"], "Tümü");
    }
}
