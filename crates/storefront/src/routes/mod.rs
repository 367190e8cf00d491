//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                 - Health check
//!
//! # Catalog
//! GET  /categories?q=                          - Category list, optionally searched
//! POST /categories/{id}/filters                - Open (reseed) the filter screen
//! POST /categories/{id}/filters/{filter}/toggle
//! POST /categories/{id}/filters/apply          - Returns the applied options
//! GET  /categories/{id}/products?q=            - Products under the applied filters
//!
//! # Cart
//! GET  /cart
//! POST /cart/add | /cart/update | /cart/remove | /cart/clear
//! POST /cart/{id}/increment | /cart/{id}/decrement
//!
//! # Favorites
//! GET  /favorites
//! POST /favorites/toggle | /favorites/clear
//!
//! # Auth
//! POST /auth/login | /auth/register | /auth/logout
//! GET  /auth/me
//!
//! # Payment
//! POST /payment                                - Mocked card payment
//! ```
//!
//! Every mutation responds with the new state slice it touched.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod favorites;
pub mod payment;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::categories))
        .route("/{id}/filters", post(catalog::open_filters))
        .route("/{id}/filters/apply", post(catalog::apply_filters))
        .route("/{id}/filters/{filter}/toggle", post(catalog::toggle_filter))
        .route("/{id}/products", get(catalog::products))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/{id}/increment", post(cart::increment))
        .route("/{id}/decrement", post(cart::decrement))
}

/// Create the favorites routes router.
pub fn favorites_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(favorites::show))
        .route("/toggle", post(favorites::toggle))
        .route("/clear", post(favorites::clear))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/categories", catalog_routes())
        .nest("/cart", cart_routes())
        .nest("/favorites", favorites_routes())
        .nest("/auth", auth_routes())
        .route("/payment", post(payment::pay))
}

/// The full application with state and request tracing attached.
pub fn app(state: AppState) -> Router {
    routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_support {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::StorefrontConfig;
    use crate::state::AppState;

    /// State with default upstreams. Tests using it must not hit the network.
    pub(crate) fn state() -> AppState {
        AppState::new(StorefrontConfig::from_lookup(|_| None).unwrap()).unwrap()
    }

    pub(crate) async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub(crate) fn product_json(id: i32, price: &str) -> Value {
        serde_json::json!({
            "id": id,
            "title": format!("Product {id}"),
            "price": price,
            "description": "",
            "images": [format!("https://cdn.example.com/{id}.png")],
            "category": { "id": 1, "name": "Elektronik" }
        })
    }
}
