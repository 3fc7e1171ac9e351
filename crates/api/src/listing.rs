//! Listing service: ties settings resolution, window merging and
//! drag-and-drop reconciliation together over the repositories.
//!
//! Handlers call into [`ListingService`] instead of the repositories
//! directly so the read path and the write path share one view of how a
//! category's merged sequence is produced.

use serde::{Deserialize, Serialize};
use shelf_core::ordering::{self, PinnedSlot};
use shelf_core::reconcile::{self, CategorySnapshot, MoveOperation};
use shelf_core::settings::{self, CategorySettings, ResolvedSortSettings};
use shelf_core::sort_code::SortCode;
use shelf_core::types::{DbId, Position};
use shelf_db::models::pinned::PinnedPosition;
use shelf_db::repositories::{CategorySortSettingsRepo, PinnedPositionRepo, ProductRepo};

use crate::error::AppResult;
use crate::invalidation::ListingEvent;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// One placed product in a listing response.
#[derive(Debug, Serialize)]
pub struct ListingItem {
    pub product_id: DbId,
    pub position: Position,
    pub pinned: bool,
    /// Backing pin row id, present only for pinned items. Clients pass it
    /// back to the unpin endpoint.
    pub row_id: Option<DbId>,
}

/// A page of the merged category sequence.
#[derive(Debug, Serialize)]
pub struct ListingWindow {
    pub category_id: DbId,
    pub offset: Position,
    pub limit: Position,
    /// Pinned slots plus remaining fallback candidates, independent of
    /// the window.
    pub total: i64,
    pub sort: SortCode,
    pub show_by_default: bool,
    pub items: Vec<ListingItem>,
}

fn default_pinned() -> bool {
    true
}

/// One drag-and-drop instruction as sent by the admin grid.
#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub product_id: DbId,
    pub old_position: Position,
    pub new_position: Position,
    /// Dropping a product locks it in place unless the client opts out.
    #[serde(default = "default_pinned")]
    pub pinned: bool,
}

/// Result summary of a reorder request.
#[derive(Debug, Default, Serialize)]
pub struct SaveOrderSummary {
    pub upserted: usize,
    pub deleted: usize,
    pub invalidated_product_ids: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

fn to_slots(rows: Vec<PinnedPosition>) -> Vec<PinnedSlot> {
    rows.into_iter()
        .map(|r| PinnedSlot {
            row_id: r.id,
            product_id: r.product_id,
            position: r.position,
            pinned: true,
        })
        .collect()
}

/// Stateless facade over the ordering engine and the repositories.
pub struct ListingService;

impl ListingService {
    /// Effective sort settings for a category (defaults applied, linked
    /// category resolved).
    pub async fn resolve_settings(
        state: &AppState,
        category_id: DbId,
    ) -> AppResult<ResolvedSortSettings> {
        let row = CategorySortSettingsRepo::find(&state.pool, category_id)
            .await?
            .map(|r| CategorySettings {
                category_id: r.category_id,
                base_sort: r.base_sort,
                show_by_default: r.show_by_default,
                linked_category_id: r.linked_category_id,
            });

        Ok(settings::resolve(
            category_id,
            row.as_ref(),
            state.config.default_sort,
        )?)
    }

    /// Produce one page of the merged category sequence.
    ///
    /// Pinned rows come from the category's pin source (itself, unless
    /// linked); fallback candidates come from the category's own product
    /// set in `sort` order. A pending deleted-product gap is closed
    /// transiently so the page is always dense; the stored rows are
    /// repaired on the next write.
    pub async fn get_window(
        state: &AppState,
        category_id: DbId,
        offset: Position,
        limit: Position,
        sort_override: Option<SortCode>,
    ) -> AppResult<ListingWindow> {
        let resolved = Self::resolve_settings(state, category_id).await?;
        let sort = sort_override.unwrap_or(resolved.base_sort);
        let source = resolved.pin_source_category_id;

        let mut slots = to_slots(PinnedPositionRepo::list_live(&state.pool, source).await?);
        if let Some(marker) = PinnedPositionRepo::find_deleted_marker(&state.pool, source).await? {
            ordering::close_deleted_gap(&mut slots, marker);
        }

        let claimed = ordering::claimed_product_ids(&slots);
        let (cand_offset, cand_limit) = ordering::candidate_window(&slots, offset, limit);
        let candidates = ProductRepo::candidates(
            &state.pool,
            category_id,
            sort,
            &claimed,
            cand_offset,
            cand_limit,
        )
        .await?;

        let items = ordering::merge_window(&slots, &candidates, offset, limit)
            .into_iter()
            .map(|p| ListingItem {
                product_id: p.product_id,
                position: p.position,
                pinned: p.pinned,
                row_id: p.row_id,
            })
            .collect();

        let total =
            slots.len() as i64 + ProductRepo::count_candidates(&state.pool, category_id, &claimed).await?;

        Ok(ListingWindow {
            category_id,
            offset,
            limit,
            total,
            sort,
            show_by_default: resolved.show_by_default,
            items,
        })
    }

    /// Apply a drag-and-drop reorder.
    ///
    /// Rebuilds only the affected window, persists the resulting pin diff
    /// atomically, and publishes an invalidation event per product whose
    /// absolute position changed. The window is rebuilt under the sort the
    /// client was viewing when one is given, so the reconcile sees the
    /// same layout the user dragged.
    pub async fn save_order(
        state: &AppState,
        category_id: DbId,
        requests: &[MoveRequest],
        sort_override: Option<SortCode>,
    ) -> AppResult<SaveOrderSummary> {
        let resolved = Self::resolve_settings(state, category_id).await?;
        let sort = sort_override.unwrap_or(resolved.base_sort);
        let source = resolved.pin_source_category_id;

        let moves: Vec<MoveOperation> = requests
            .iter()
            .map(|r| MoveOperation {
                product_id: r.product_id,
                old_position: r.old_position,
                new_position: r.new_position,
                pinned: r.pinned,
                row_id: None,
            })
            .collect();
        let moves = reconcile::validate_moves(&moves)?;
        if moves.is_empty() {
            return Ok(SaveOrderSummary::default());
        }

        let max_pinned = PinnedPositionRepo::max_position(&state.pool, source).await?;
        let marker = PinnedPositionRepo::find_deleted_marker(&state.pool, source).await?;
        let orphans = if marker.is_some() {
            PinnedPositionRepo::orphaned_row_ids(&state.pool, source).await?
        } else {
            Vec::new()
        };

        let Some(bounds) = reconcile::affected_window(&moves, max_pinned, marker) else {
            return Ok(SaveOrderSummary::default());
        };

        let pinned = to_slots(PinnedPositionRepo::list_live(&state.pool, source).await?);

        // The candidate stream must be windowed against the same dense view
        // the reconcile rebuilds, so close the gap before counting slots.
        let mut repaired = pinned.clone();
        if let Some(marker) = marker {
            ordering::close_deleted_gap(&mut repaired, marker);
        }
        let claimed = ordering::claimed_product_ids(&repaired);
        let (cand_offset, cand_limit) =
            ordering::candidate_window(&repaired, bounds.offset, bounds.length);
        let candidates = ProductRepo::candidates(
            &state.pool,
            category_id,
            sort,
            &claimed,
            cand_offset,
            cand_limit,
        )
        .await?;

        let snapshot = CategorySnapshot {
            pinned: &pinned,
            candidates: &candidates,
            deleted_marker: marker,
            orphaned_row_ids: &orphans,
        };
        let outcome = reconcile::reconcile(&snapshot, &moves, bounds)?;

        PinnedPositionRepo::persist_diff(&state.pool, source, &outcome.upserts, &outcome.deletions)
            .await?;

        // Orphans that appeared between snapshot and write are cleared too.
        PinnedPositionRepo::reset_deleted_marker(&state.pool, source).await?;

        for &product_id in &outcome.invalidated_product_ids {
            state
                .invalidations
                .publish(ListingEvent::position_changed(category_id, product_id));
        }

        tracing::info!(
            category_id,
            moves = moves.len(),
            upserted = outcome.upserts.len(),
            deleted = outcome.deletions.len(),
            invalidated = outcome.invalidated_product_ids.len(),
            "Category order saved",
        );

        Ok(SaveOrderSummary {
            upserted: outcome.upserts.len(),
            deleted: outcome.deletions.len(),
            invalidated_product_ids: outcome.invalidated_product_ids,
        })
    }

    /// Remove a pin row. Missing rows are treated as already unpinned.
    ///
    /// Returns `true` when a row was actually removed.
    pub async fn unpin(state: &AppState, category_id: DbId, row_id: DbId) -> AppResult<bool> {
        let resolved = Self::resolve_settings(state, category_id).await?;
        let source = resolved.pin_source_category_id;

        let row = PinnedPositionRepo::find_by_id(&state.pool, row_id).await?;
        let removed = PinnedPositionRepo::unpin(&state.pool, source, row_id).await?;

        if removed {
            if let Some(row) = row {
                state
                    .invalidations
                    .publish(ListingEvent::unpinned(category_id, row.product_id));
            }
            tracing::info!(category_id, row_id, "Pin row removed");
        }

        Ok(removed)
    }
}
