//! Repository for the `category_sort_settings` table.

use sqlx::PgPool;
use shelf_core::types::DbId;

use crate::models::settings::{CategorySortSettingsRow, UpsertCategorySortSettings};

/// Column list for the `category_sort_settings` table.
const COLUMNS: &str =
    "category_id, base_sort, show_by_default, linked_category_id, created_at, updated_at";

/// Provides lookup and upsert for per-category sort configuration.
pub struct CategorySortSettingsRepo;

impl CategorySortSettingsRepo {
    /// Find the settings row for a category, if one exists.
    pub async fn find(
        pool: &PgPool,
        category_id: DbId,
    ) -> Result<Option<CategorySortSettingsRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM category_sort_settings WHERE category_id = $1");
        sqlx::query_as::<_, CategorySortSettingsRow>(&query)
            .bind(category_id)
            .fetch_optional(pool)
            .await
    }

    /// Create or replace a category's settings row.
    pub async fn upsert(
        pool: &PgPool,
        category_id: DbId,
        input: &UpsertCategorySortSettings,
    ) -> Result<CategorySortSettingsRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO category_sort_settings \
                (category_id, base_sort, show_by_default, linked_category_id) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (category_id) DO UPDATE SET \
                base_sort = EXCLUDED.base_sort, \
                show_by_default = EXCLUDED.show_by_default, \
                linked_category_id = EXCLUDED.linked_category_id, \
                updated_at = now() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CategorySortSettingsRow>(&query)
            .bind(category_id)
            .bind(input.base_sort)
            .bind(input.show_by_default)
            .bind(input.linked_category_id)
            .fetch_one(pool)
            .await
    }
}
