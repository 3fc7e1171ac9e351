//! Handlers for per-category sort settings.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use shelf_core::sort_code::SortCode;
use shelf_core::types::DbId;
use shelf_db::models::settings::UpsertCategorySortSettings;
use shelf_db::repositories::CategorySortSettingsRepo;

use crate::error::{AppError, AppResult};
use crate::listing::ListingService;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/categories/{id}/sort-settings
///
/// Effective settings for the category: defaults applied, linked category
/// resolved to a pin source. Never 404s; a category without a settings row
/// reports the defaults with `has_own_settings: false`.
pub async fn get_sort_settings(
    State(state): State<AppState>,
    Path(category_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let resolved = ListingService::resolve_settings(&state, category_id).await?;

    Ok(Json(DataResponse { data: resolved }))
}

/// PUT /api/v1/categories/{id}/sort-settings
///
/// Create or replace the category's settings row. `base_sort` must be 0
/// (inherit the global default) or a known sort code.
pub async fn put_sort_settings(
    State(state): State<AppState>,
    Path(category_id): Path<DbId>,
    Json(input): Json<UpsertCategorySortSettings>,
) -> AppResult<impl IntoResponse> {
    if input.base_sort != 0 {
        SortCode::from_code(input.base_sort).map_err(AppError::Core)?;
    }
    if input.linked_category_id == Some(category_id) {
        return Err(AppError::BadRequest(
            "a category cannot link to itself".into(),
        ));
    }

    let row = CategorySortSettingsRepo::upsert(&state.pool, category_id, &input).await?;

    tracing::info!(
        category_id,
        base_sort = row.base_sort,
        show_by_default = row.show_by_default,
        "Category sort settings saved",
    );

    Ok(Json(DataResponse { data: row }))
}
