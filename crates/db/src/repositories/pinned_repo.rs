//! Repository for the `pinned_positions` table.

use sqlx::PgPool;
use shelf_core::reconcile::PinUpsert;
use shelf_core::types::{DbId, Position};

use crate::models::pinned::PinnedPosition;

/// Column list for the `pinned_positions` table.
const COLUMNS: &str = "id, category_id, product_id, position, created_at, updated_at";

/// Column list qualified for JOIN queries.
const PP_COLUMNS: &str =
    "pp.id, pp.category_id, pp.product_id, pp.position, pp.created_at, pp.updated_at";

/// CRUD and diff application for pinned product positions.
pub struct PinnedPositionRepo;

impl PinnedPositionRepo {
    /// List pin rows whose product still exists and is active, ordered by
    /// position.
    pub async fn list_live(
        pool: &PgPool,
        category_id: DbId,
    ) -> Result<Vec<PinnedPosition>, sqlx::Error> {
        let query = format!(
            "SELECT {PP_COLUMNS} FROM pinned_positions pp \
             JOIN products p ON p.id = pp.product_id AND p.is_active \
             WHERE pp.category_id = $1 \
             ORDER BY pp.position"
        );
        sqlx::query_as::<_, PinnedPosition>(&query)
            .bind(category_id)
            .fetch_all(pool)
            .await
    }

    /// Highest persisted position across all rows, stale ones included.
    ///
    /// Stale rows still occupy positions until the gap repair removes
    /// them, so they count toward the append boundary.
    pub async fn max_position(
        pool: &PgPool,
        category_id: DbId,
    ) -> Result<Option<Position>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<Position>>(
            "SELECT MAX(position) FROM pinned_positions WHERE category_id = $1",
        )
        .bind(category_id)
        .fetch_one(pool)
        .await
    }

    /// Lowest position among rows whose product was deleted or
    /// deactivated, if any. This marks where the position sequence has a
    /// hole to close.
    pub async fn find_deleted_marker(
        pool: &PgPool,
        category_id: DbId,
    ) -> Result<Option<Position>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<Position>>(
            "SELECT MIN(pp.position) FROM pinned_positions pp \
             LEFT JOIN products p ON p.id = pp.product_id AND p.is_active \
             WHERE pp.category_id = $1 AND p.id IS NULL",
        )
        .bind(category_id)
        .fetch_one(pool)
        .await
    }

    /// Ids of rows whose product was deleted or deactivated.
    pub async fn orphaned_row_ids(
        pool: &PgPool,
        category_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT pp.id FROM pinned_positions pp \
             LEFT JOIN products p ON p.id = pp.product_id AND p.is_active \
             WHERE pp.category_id = $1 AND p.id IS NULL \
             ORDER BY pp.id",
        )
        .bind(category_id)
        .fetch_all(pool)
        .await
    }

    /// Apply a reconcile diff atomically: upsert every changed pin row and
    /// delete stale rows, in one transaction.
    ///
    /// The upsert keys on `(category_id, product_id)`, so re-pinning a
    /// product moves it instead of duplicating it.
    pub async fn persist_diff(
        pool: &PgPool,
        category_id: DbId,
        upserts: &[PinUpsert],
        deletions: &[DbId],
    ) -> Result<(), sqlx::Error> {
        tracing::debug!(
            category_id,
            upserts = upserts.len(),
            deletions = deletions.len(),
            "Applying pin diff"
        );

        let mut tx = pool.begin().await?;

        if !deletions.is_empty() {
            sqlx::query("DELETE FROM pinned_positions WHERE category_id = $1 AND id = ANY($2)")
                .bind(category_id)
                .bind(deletions)
                .execute(&mut *tx)
                .await?;
        }

        if !upserts.is_empty() {
            let product_ids: Vec<DbId> = upserts.iter().map(|u| u.product_id).collect();
            let positions: Vec<Position> = upserts.iter().map(|u| u.position).collect();

            sqlx::query(
                "INSERT INTO pinned_positions (category_id, product_id, position) \
                 SELECT $1, u.product_id, u.position \
                 FROM UNNEST($2::bigint[], $3::int[]) AS u (product_id, position) \
                 ON CONFLICT (category_id, product_id) DO UPDATE \
                 SET position = EXCLUDED.position, updated_at = now()",
            )
            .bind(category_id)
            .bind(&product_ids)
            .bind(&positions)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Drop every stale row left behind by deleted or deactivated
    /// products, clearing the category's deletion marker. Safety net for
    /// orphans that appeared after the reconcile snapshot was taken.
    pub async fn reset_deleted_marker(
        pool: &PgPool,
        category_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM pinned_positions pp \
             WHERE pp.category_id = $1 AND NOT EXISTS \
                (SELECT 1 FROM products p WHERE p.id = pp.product_id AND p.is_active)",
        )
        .bind(category_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Remove a single pin row. Returns `false` when no such row exists,
    /// which callers treat as success (the unpin already happened).
    pub async fn unpin(
        pool: &PgPool,
        category_id: DbId,
        row_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pinned_positions WHERE category_id = $1 AND id = $2")
            .bind(category_id)
            .bind(row_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find a pin row by id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PinnedPosition>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pinned_positions WHERE id = $1");
        sqlx::query_as::<_, PinnedPosition>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
