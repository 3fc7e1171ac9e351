//! Route definitions for category listings and sort settings.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::{listing, settings};
use crate::state::AppState;

/// Category routes mounted at `/categories`.
///
/// ```text
/// GET    /{id}/products              -> get_category_products
/// PUT    /{id}/products/order        -> save_category_order
/// DELETE /{id}/pinned/{row_id}       -> unpin_product
/// GET    /{id}/sort-settings         -> get_sort_settings
/// PUT    /{id}/sort-settings         -> put_sort_settings
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/products", get(listing::get_category_products))
        .route("/{id}/products/order", put(listing::save_category_order))
        .route("/{id}/pinned/{row_id}", delete(listing::unpin_product))
        .route(
            "/{id}/sort-settings",
            get(settings::get_sort_settings).put(settings::put_sort_settings),
        )
}
