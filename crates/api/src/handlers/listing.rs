//! Handlers for category listing windows and drag-and-drop reordering.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use shelf_core::sort_code::SortCode;
use shelf_core::types::{DbId, Position};

use crate::error::{AppError, AppResult};
use crate::listing::{ListingService, MoveRequest};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the listing window endpoint.
#[derive(Debug, Deserialize)]
pub struct ListingParams {
    pub offset: Option<Position>,
    pub limit: Option<Position>,
    /// Numeric sort code overriding the category's base ordering.
    pub sort_by: Option<i16>,
}

/// Request body for the reorder endpoint.
#[derive(Debug, Deserialize)]
pub struct SaveOrderRequest {
    pub moves: Vec<MoveRequest>,
    /// Sort code the grid was displaying when the drag happened. Falls
    /// back to the category's base ordering when absent.
    pub sort_by: Option<i16>,
}

/// GET /api/v1/categories/{id}/products
///
/// One page of the category's merged sequence: pinned products at their
/// exact slots, fallback products in comparator order everywhere else.
pub async fn get_category_products(
    State(state): State<AppState>,
    Path(category_id): Path<DbId>,
    Query(params): Query<ListingParams>,
) -> AppResult<impl IntoResponse> {
    let offset = params.offset.unwrap_or(0);
    if offset < 0 {
        return Err(AppError::BadRequest("offset must not be negative".into()));
    }

    let limit = params
        .limit
        .unwrap_or(state.config.default_page_size)
        .clamp(1, state.config.max_page_size);

    let sort_override = params
        .sort_by
        .map(SortCode::from_code)
        .transpose()
        .map_err(AppError::Core)?;

    let window =
        ListingService::get_window(&state, category_id, offset, limit, sort_override).await?;

    Ok(Json(DataResponse { data: window }))
}

/// PUT /api/v1/categories/{id}/products/order
///
/// Apply a batch of drag-and-drop moves to the category's custom order.
pub async fn save_category_order(
    State(state): State<AppState>,
    Path(category_id): Path<DbId>,
    Json(input): Json<SaveOrderRequest>,
) -> AppResult<impl IntoResponse> {
    let sort_override = input
        .sort_by
        .map(SortCode::from_code)
        .transpose()
        .map_err(AppError::Core)?;

    let summary =
        ListingService::save_order(&state, category_id, &input.moves, sort_override).await?;

    Ok(Json(DataResponse { data: summary }))
}

/// DELETE /api/v1/categories/{id}/pinned/{row_id}
///
/// Release a pinned slot. Deleting a row that is already gone is a
/// success; the end state is the same either way.
pub async fn unpin_product(
    State(state): State<AppState>,
    Path((category_id, row_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    ListingService::unpin(&state, category_id, row_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
