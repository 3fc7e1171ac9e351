//! Category sort settings entity model and DTO.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use shelf_core::types::{DbId, Timestamp};

/// A row from the `category_sort_settings` table.
///
/// `base_sort == 0` means "inherit the global default ordering".
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategorySortSettingsRow {
    pub category_id: DbId,
    pub base_sort: i16,
    pub show_by_default: bool,
    pub linked_category_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or replacing a category's sort settings.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertCategorySortSettings {
    pub base_sort: i16,
    pub show_by_default: bool,
    pub linked_category_id: Option<DbId>,
}
