//! Pinned position entity model.

use serde::Serialize;
use sqlx::FromRow;
use shelf_core::types::{DbId, Timestamp};

/// A row from the `pinned_positions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PinnedPosition {
    pub id: DbId,
    pub category_id: DbId,
    pub product_id: DbId,
    pub position: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
