//! End-to-end test harness for the Pazar storefront.
//!
//! [`FakeUpstream`] serves a small `dummyjson.com` style catalog and a
//! `reqres.in` style auth API on an ephemeral port. [`TestContext`] starts
//! the real storefront router against it on another ephemeral port and
//! hands back an HTTP client.
//!
//! ```rust,ignore
//! let upstream = FakeUpstream::start().await;
//! let ctx = TestContext::start(&upstream).await;
//! let resp = ctx.get("/health").await;
//! assert_eq!(resp.status(), 200);
//! ```

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};

use pazar_storefront::config::StorefrontConfig;
use pazar_storefront::routes;
use pazar_storefront::state::AppState;

/// The only account the fake auth API accepts, as on `reqres.in`.
pub const KNOWN_EMAIL: &str = "eve.holt@reqres.in";
/// Token issued for [`KNOWN_EMAIL`].
pub const KNOWN_TOKEN: &str = "QpwL5tke4Pnpja7X4";

struct FakeState {
    pages: HashMap<String, Vec<Value>>,
    failing: Mutex<HashSet<String>>,
    requests: Mutex<Vec<String>>,
}

/// In-process fake of the catalog and auth APIs.
#[derive(Clone)]
pub struct FakeUpstream {
    addr: SocketAddr,
    state: Arc<FakeState>,
}

fn product(id: i32, title: &str, price: f64, images: Value) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": format!("{title} description"),
        "price": price,
        "images": images,
        "thumbnail": format!("https://cdn.dummyjson.com/{id}/thumbnail.png"),
    })
}

fn fixture_pages() -> HashMap<String, Vec<Value>> {
    let mut pages = HashMap::new();
    pages.insert(
        "smartphones".to_string(),
        vec![
            product(1, "iPhone 9", 549.0, json!(["https://cdn.dummyjson.com/1/1.jpg"])),
            product(2, "iPhone X", 899.0, json!(["https://cdn.dummyjson.com/2/1.jpg"])),
        ],
    );
    pages.insert(
        "laptops".to_string(),
        vec![
            product(6, "MacBook Pro", 1749.0, json!(["https://cdn.dummyjson.com/6/1.png"])),
            product(7, "Samsung Galaxy Book", 1499.0, json!([])),
        ],
    );
    pages.insert(
        "groceries".to_string(),
        vec![
            product(16, "Apple", 9.99, json!("https://cdn.dummyjson.com/16/1.png")),
            product(17, "Bad Record", -1.0, json!(["https://cdn.dummyjson.com/17/1.png"])),
            json!({
                "id": 18,
                "title": "Soap",
                "description": null,
                "price": 2.5,
                "images": null,
                "thumbnail": "https://cdn.dummyjson.com/18/thumbnail.png",
            }),
            json!({ "id": null, "title": "Broken", "price": 1.0 }),
        ],
    );
    pages.insert(
        "fragrances".to_string(),
        vec![product(11, "Perfume Oil", 13.0, json!(["https://cdn.dummyjson.com/11/1.jpg"]))],
    );
    pages.insert(
        "skincare".to_string(),
        vec![product(13, "Hyaluronic Serum", 19.0, json!(["https://cdn.dummyjson.com/13/1.jpg"]))],
    );
    pages
}

#[derive(Deserialize)]
struct LimitQuery {
    limit: Option<usize>,
}

#[derive(Deserialize)]
struct AuthBody {
    email: Option<String>,
    password: Option<String>,
}

impl FakeUpstream {
    /// Bind to an ephemeral port and start serving.
    pub async fn start() -> Self {
        let state = Arc::new(FakeState {
            pages: fixture_pages(),
            failing: Mutex::new(HashSet::new()),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/products", get(all_products))
            .route("/products/category/{slug}", get(category_products))
            .route("/api/login", post(login))
            .route("/api/register", post(register))
            .with_state(Arc::clone(&state));

        let addr = serve(app).await;
        Self { addr, state }
    }

    #[must_use]
    pub fn catalog_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    #[must_use]
    pub fn auth_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Make a catalog category answer HTTP 500 until [`Self::recover`].
    pub fn fail(&self, slug: &str) {
        lock(&self.state.failing).insert(slug.to_string());
    }

    pub fn recover(&self, slug: &str) {
        lock(&self.state.failing).remove(slug);
    }

    /// Catalog paths requested so far, sorted.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        let mut requests = lock(&self.state.requests).clone();
        requests.sort();
        requests
    }

    pub fn reset_requests(&self) {
        lock(&self.state.requests).clear();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

async fn all_products(
    State(state): State<Arc<FakeState>>,
    Query(query): Query<LimitQuery>,
) -> Json<Value> {
    let limit = query.limit.unwrap_or(30);
    lock(&state.requests).push(format!("all?limit={limit}"));

    let mut slugs: Vec<&String> = state.pages.keys().collect();
    slugs.sort();
    let products: Vec<Value> = slugs
        .into_iter()
        .flat_map(|slug| state.pages.get(slug).cloned().unwrap_or_default())
        .take(limit)
        .collect();
    Json(json!({ "products": products, "limit": limit }))
}

async fn category_products(
    State(state): State<Arc<FakeState>>,
    Path(slug): Path<String>,
) -> Response {
    lock(&state.requests).push(slug.clone());

    if lock(&state.failing).contains(&slug) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "upstream exploded" })),
        )
            .into_response();
    }

    let products = state.pages.get(&slug).cloned().unwrap_or_default();
    Json(json!({ "products": products, "total": products.len() })).into_response()
}

async fn login(Json(body): Json<AuthBody>) -> Response {
    match (body.email.as_deref(), body.password.as_deref()) {
        (Some(KNOWN_EMAIL), Some(_)) => Json(json!({ "token": KNOWN_TOKEN })).into_response(),
        (Some(_), None) => missing_password(),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "user not found" })),
        )
            .into_response(),
    }
}

async fn register(Json(body): Json<AuthBody>) -> Response {
    match (body.email.as_deref(), body.password.as_deref()) {
        (Some(KNOWN_EMAIL), Some(_)) => {
            Json(json!({ "id": 4, "token": KNOWN_TOKEN })).into_response()
        }
        (Some(_), None) => missing_password(),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Note: Only defined users succeed registration" })),
        )
            .into_response(),
    }
}

fn missing_password() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "Missing password" })),
    )
        .into_response()
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server error");
    });
    addr
}

/// A local URL with nothing listening behind it.
pub async fn closed_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    drop(listener);
    format!("http://{addr}")
}

/// A running storefront wired to a [`FakeUpstream`].
pub struct TestContext {
    pub client: reqwest::Client,
    pub base_url: String,
}

impl TestContext {
    /// Start the storefront with a fallback page size of 3.
    pub async fn start(upstream: &FakeUpstream) -> Self {
        Self::start_with(upstream.catalog_url(), upstream.auth_url()).await
    }

    /// Start the storefront against explicit upstream URLs.
    pub async fn start_with(catalog_url: String, auth_url: String) -> Self {
        let vars: HashMap<&str, String> = HashMap::from([
            ("CATALOG_BASE_URL", catalog_url),
            ("AUTH_BASE_URL", auth_url),
            ("DEFAULT_PRODUCT_LIMIT", "3".to_string()),
        ]);
        let config = StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
            .expect("Failed to build test configuration");
        let state = AppState::new(config).expect("Failed to build application state");

        let addr = serve(routes::app(state)).await;
        Self {
            client: reqwest::Client::new(),
            base_url: format!("http://{addr}"),
        }
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("GET request failed")
    }

    pub async fn post(&self, path: &str, body: Option<Value>) -> reqwest::Response {
        let request = self.client.post(format!("{}{path}", self.base_url));
        let request = match body {
            Some(body) => request.json(&body),
            None => request,
        };
        request.send().await.expect("POST request failed")
    }

    /// POST and decode the JSON body along with the status.
    pub async fn post_json(&self, path: &str, body: Option<Value>) -> (u16, Value) {
        let response = self.post(path, body).await;
        let status = response.status().as_u16();
        let value = response.json().await.expect("Response was not JSON");
        (status, value)
    }

    /// GET and decode the JSON body along with the status.
    pub async fn get_json(&self, path: &str) -> (u16, Value) {
        let response = self.get(path).await;
        let status = response.status().as_u16();
        let value = response.json().await.expect("Response was not JSON");
        (status, value)
    }
}
