pub mod categories;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /categories/{id}/products             merged listing window (GET)
/// /categories/{id}/products/order       apply drag-and-drop reorder (PUT)
/// /categories/{id}/pinned/{row_id}      release a pinned slot (DELETE)
/// /categories/{id}/sort-settings        get, upsert settings (GET, PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/categories", categories::router())
}
