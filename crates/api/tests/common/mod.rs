use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tower::ServiceExt;

use shelf_api::config::ServerConfig;
use shelf_api::invalidation::InvalidationBus;
use shelf_api::router::build_app_router;
use shelf_api::state::AppState;
use shelf_core::sort_code::SortCode;
use shelf_db::models::product::CreateProduct;
use shelf_db::repositories::ProductRepo;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        default_sort: SortCode::ReleaseDate,
        default_page_size: 24,
        max_page_size: 100,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_bus(pool, Arc::new(InvalidationBus::default()))
}

/// Like [`build_test_app`] but with a caller-owned invalidation bus so
/// tests can subscribe to published events.
pub fn build_test_app_with_bus(pool: PgPool, invalidations: Arc<InvalidationBus>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        invalidations,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body into parsed JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

/// Create an active product in the given category. `price_cents` drives
/// the cheapest/highest price orderings deterministically.
pub async fn seed_product(pool: &PgPool, category_id: i64, name: &str, price_cents: i64) -> i64 {
    let product = ProductRepo::create(
        pool,
        &CreateProduct {
            name: name.to_string(),
            price: Some(Decimal::new(price_cents, 2)),
            stock: Some(0),
            popularity: Some(0),
            release_date: None,
        },
    )
    .await
    .unwrap();
    ProductRepo::assign_category(pool, product.id, category_id)
        .await
        .unwrap();
    product.id
}
