//! Drag-and-drop reconciliation: the listing write path.
//!
//! A reorder operation arrives as a list of moves performed on a visible
//! page of the category, not on the whole catalog. Reconciliation computes
//! the smallest window of absolute positions that the moves (and any
//! pending deleted-product gap) can affect, rebuilds that window from the
//! persisted state, splices the moved products in, renumbers the rest, and
//! emits a persistable diff. Positions outside the window are provably
//! unaffected and never touched, which bounds the cost to the window size.

use std::collections::{HashMap, HashSet};

use crate::error::CoreError;
use crate::ordering::{self, PinnedSlot, ProductRef};
use crate::types::{DbId, Position};

/// Highest position accepted from clients. Orders of magnitude above any
/// real category, and small enough that window arithmetic stays within
/// `Position` range.
pub const MAX_POSITION: Position = 1_000_000;

/// One drag-and-drop instruction from the admin UI.
#[derive(Debug, Clone)]
pub struct MoveOperation {
    pub product_id: DbId,
    pub old_position: Position,
    pub new_position: Position,
    /// Lock flag to persist. Unpinned moves occupy their slot for this
    /// reconcile only and fall back to the default ordering afterwards.
    pub pinned: bool,
    /// Existing pin row id, when the product was already pinned.
    pub row_id: Option<DbId>,
}

/// The window of absolute positions a reconcile must recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBounds {
    pub offset: Position,
    pub length: Position,
}

impl WindowBounds {
    pub fn end(self) -> Position {
        self.offset + self.length
    }
}

/// Everything the algorithm needs to know about the category, captured as
/// an immutable snapshot before any mutation.
#[derive(Debug, Clone)]
pub struct CategorySnapshot<'a> {
    /// Live pinned rows (deleted products already filtered out), with
    /// their persisted positions.
    pub pinned: &'a [PinnedSlot],
    /// Fallback candidates for the affected window, in comparator order,
    /// windowed via [`ordering::candidate_window`].
    pub candidates: &'a [DbId],
    /// Smallest persisted position whose product no longer exists, if any.
    pub deleted_marker: Option<Position>,
    /// Pin rows referencing deleted products; scheduled for deletion.
    pub orphaned_row_ids: &'a [DbId],
}

/// A single row to upsert: the product is locked at this position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinUpsert {
    pub product_id: DbId,
    pub position: Position,
}

/// The persistable result of a reconcile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Rows to write (pinned slots only; unpinned slots stay implicit).
    pub upserts: Vec<PinUpsert>,
    /// Pin row ids to delete (orphaned deleted-product rows).
    pub deletions: Vec<DbId>,
    /// Products whose absolute position changed, for cache invalidation.
    pub invalidated_product_ids: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a move list and drop ignorable entries.
///
/// A `product_id` of zero is dropped silently (the UI sends placeholder
/// rows for empty grid cells). Negative ids, negative positions, or
/// positions past [`MAX_POSITION`] reject the whole request before
/// anything touches the store. When the same product is moved twice, the
/// later instruction wins.
pub fn validate_moves(moves: &[MoveOperation]) -> Result<Vec<MoveOperation>, CoreError> {
    for mv in moves {
        if mv.product_id < 0 {
            return Err(CoreError::Validation(format!(
                "move references negative product id {}",
                mv.product_id
            )));
        }
        if mv.new_position < 0 || mv.old_position < 0 {
            return Err(CoreError::Validation(format!(
                "move for product {} has a negative position",
                mv.product_id
            )));
        }
        if mv.new_position > MAX_POSITION || mv.old_position > MAX_POSITION {
            return Err(CoreError::Validation(format!(
                "move for product {} exceeds the position ceiling {MAX_POSITION}",
                mv.product_id
            )));
        }
    }

    // Last instruction per product wins.
    let mut by_product: HashMap<DbId, usize> = HashMap::new();
    let mut kept: Vec<MoveOperation> = Vec::new();
    for mv in moves.iter().filter(|m| m.product_id > 0) {
        match by_product.get(&mv.product_id) {
            Some(&idx) => kept[idx] = mv.clone(),
            None => {
                by_product.insert(mv.product_id, kept.len());
                kept.push(mv.clone());
            }
        }
    }

    Ok(kept)
}

// ---------------------------------------------------------------------------
// Affected window
// ---------------------------------------------------------------------------

/// Compute the window of positions a move list can affect.
///
/// The window starts at the lowest touched position, clamped so it never
/// exceeds one past the current maximum pinned position (appending past
/// the end is allowed), and lowered to the deleted-product marker when one
/// exists. It ends at the highest touched position, extended to the last
/// pinned position when a gap repair is pending.
///
/// Returns `None` for an empty move list.
pub fn affected_window(
    moves: &[MoveOperation],
    max_pinned: Option<Position>,
    deleted_marker: Option<Position>,
) -> Option<WindowBounds> {
    let lowest = moves
        .iter()
        .map(|m| m.new_position.min(m.old_position))
        .min()?;
    let highest = moves
        .iter()
        .map(|m| m.new_position.max(m.old_position))
        .max()?;

    let append_cap = max_pinned.map_or(0, |max| max + 1);
    let mut offset = lowest.min(append_cap);
    if let Some(marker) = deleted_marker {
        offset = offset.min(marker);
    }

    let mut end = highest;
    if deleted_marker.is_some() {
        end = end.max(max_pinned.unwrap_or(end));
    }

    Some(WindowBounds {
        offset,
        length: end - offset + 1,
    })
}

// ---------------------------------------------------------------------------
// Splice + compact
// ---------------------------------------------------------------------------

/// Apply moves to a rebuilt window and renumber everything else.
///
/// Moved products claim their target slot (later moves win collisions);
/// every other product keeps its relative order and flows onto the first
/// free slot at or after `offset`. The result is a dense permutation of
/// the window with the same cardinality as the input.
pub fn apply_moves(
    window: Vec<ProductRef>,
    moves: &[MoveOperation],
    offset: Position,
) -> Vec<ProductRef> {
    let mut claimed: HashMap<Position, ProductRef> = HashMap::new();
    let moved_ids: HashSet<DbId> = moves.iter().map(|m| m.product_id).collect();

    for mv in moves {
        // Carry over the row id from the rebuilt window when the move
        // itself does not know it.
        let row_id = mv.row_id.or_else(|| {
            window
                .iter()
                .find(|p| p.product_id == mv.product_id)
                .and_then(|p| p.row_id)
        });
        claimed.insert(
            mv.new_position,
            ProductRef {
                product_id: mv.product_id,
                position: mv.new_position,
                pinned: mv.pinned,
                row_id,
            },
        );
    }

    let mut next_free = offset;
    let mut result: Vec<ProductRef> = claimed.values().cloned().collect();

    for product in window {
        if moved_ids.contains(&product.product_id) {
            continue;
        }
        while claimed.contains_key(&next_free) {
            next_free += 1;
        }
        claimed.insert(
            next_free,
            ProductRef {
                position: next_free,
                ..product.clone()
            },
        );
        result.push(ProductRef {
            position: next_free,
            ..product
        });
        next_free += 1;
    }

    result.sort_by_key(|p| p.position);
    result
}

// ---------------------------------------------------------------------------
// Reconcile
// ---------------------------------------------------------------------------

/// Run the full reconciliation over a category snapshot.
///
/// `moves` must already be validated via [`validate_moves`] and `snapshot`
/// fetched for the bounds returned by [`affected_window`]. The outcome
/// contains only rows that must change; positions outside the window are
/// untouched.
pub fn reconcile(
    snapshot: &CategorySnapshot<'_>,
    moves: &[MoveOperation],
    bounds: WindowBounds,
) -> Result<ReconcileOutcome, CoreError> {
    if moves.is_empty() {
        return Ok(ReconcileOutcome::default());
    }

    // Positions as currently persisted, for change detection.
    let persisted: HashMap<DbId, Position> = snapshot
        .pinned
        .iter()
        .map(|s| (s.product_id, s.position))
        .collect();

    // Close the deleted-product gap before rebuilding the window so the
    // splice sees the same dense sequence the admin grid displayed.
    let mut slots = snapshot.pinned.to_vec();
    if let Some(marker) = snapshot.deleted_marker {
        ordering::close_deleted_gap(&mut slots, marker);
    }

    let window = ordering::merge_window(&slots, snapshot.candidates, bounds.offset, bounds.length);

    // Merged positions are the "before" view for fallback products, which
    // have no persisted position of their own.
    let mut before: HashMap<DbId, Position> = window.iter().map(|p| (p.product_id, p.position)).collect();
    for (&product_id, &position) in &persisted {
        before.insert(product_id, position);
    }

    let after = apply_moves(window, moves, bounds.offset);

    let mut invalidated: Vec<DbId> = after
        .iter()
        .filter(|p| before.get(&p.product_id) != Some(&p.position))
        .map(|p| p.product_id)
        .collect();
    invalidated.sort_unstable();
    invalidated.dedup();

    let upserts = after
        .iter()
        .filter(|p| p.pinned && p.product_id > 0)
        .map(|p| PinUpsert {
            product_id: p.product_id,
            position: p.position,
        })
        .collect();

    Ok(ReconcileOutcome {
        upserts,
        deletions: snapshot.orphaned_row_ids.to_vec(),
        invalidated_product_ids: invalidated,
    })
}
