//! Window merge for the listing read path.
//!
//! A category's merged sequence interleaves two sources: pinned slots
//! claiming exact absolute positions, and a fallback candidate stream
//! supplying every remaining slot in comparator order. The merge walks the
//! requested window position by position, so its cost is bounded by the
//! window size rather than the category size.

use std::collections::HashMap;

use crate::types::{DbId, Position};

/// A live pinned row: a product claiming an exact absolute position.
///
/// `pinned == false` marks a transient slot occupied during a move but not
/// locked; such rows are never persisted beyond the reconcile that created
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedSlot {
    pub row_id: DbId,
    pub product_id: DbId,
    pub position: Position,
    pub pinned: bool,
}

/// One placed product in a merged window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRef {
    pub product_id: DbId,
    pub position: Position,
    pub pinned: bool,
    /// Id of the backing pin row, when one exists.
    pub row_id: Option<DbId>,
}

/// Close the hole left by a deleted pinned product.
///
/// Every slot at or after `marker` shifts down by exactly one so that no
/// position value is skipped. The deleted product's own row is already
/// absent from `slots` (it no longer joins against the live catalog); its
/// stored row is removed separately.
pub fn close_deleted_gap(slots: &mut [PinnedSlot], marker: Position) {
    for slot in slots.iter_mut() {
        if slot.position >= marker {
            slot.position -= 1;
        }
    }
}

/// Product ids already claimed by pinned slots.
///
/// These must be excluded from the fallback candidate query so the merge
/// never emits a product twice.
pub fn claimed_product_ids(slots: &[PinnedSlot]) -> Vec<DbId> {
    slots.iter().map(|s| s.product_id).collect()
}

/// Translate a window over the merged sequence into a window over the
/// fallback candidate stream.
///
/// Candidates only occupy slots not claimed by a pinned product, so the
/// candidate offset drops by one for every pinned slot before `offset` and
/// the candidate limit by one for every pinned slot inside the window.
pub fn candidate_window(slots: &[PinnedSlot], offset: Position, limit: Position) -> (i64, i64) {
    let end = offset.saturating_add(limit);
    let before = slots.iter().filter(|s| s.position < offset).count() as i64;
    let within = slots
        .iter()
        .filter(|s| s.position >= offset && s.position < end)
        .count() as i64;

    (
        (i64::from(offset) - before).max(0),
        (i64::from(limit) - within).max(0),
    )
}

/// Merge pinned slots with fallback candidates over `[offset, offset+limit)`.
///
/// At each position a pinned slot wins its exact slot regardless of
/// fallback rank; otherwise the next candidate fills in. `candidates` must
/// already be windowed via [`candidate_window`] and exclude
/// [`claimed_product_ids`]. The walk stops once both sources are
/// exhausted, so an `offset` past the end of the sequence yields an empty
/// window.
pub fn merge_window(
    slots: &[PinnedSlot],
    candidates: &[DbId],
    offset: Position,
    limit: Position,
) -> Vec<ProductRef> {
    let by_position: HashMap<Position, &PinnedSlot> =
        slots.iter().map(|s| (s.position, s)).collect();
    let last_pinned = slots.iter().map(|s| s.position).max();

    let mut next_candidate = candidates.iter();
    let mut merged = Vec::new();

    let end = offset.saturating_add(limit);
    for position in offset..end {
        if let Some(slot) = by_position.get(&position) {
            merged.push(ProductRef {
                product_id: slot.product_id,
                position,
                pinned: slot.pinned,
                row_id: Some(slot.row_id),
            });
        } else if let Some(&product_id) = next_candidate.next() {
            merged.push(ProductRef {
                product_id,
                position,
                pinned: false,
                row_id: None,
            });
        } else if last_pinned.map_or(true, |last| position > last) {
            break;
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pin(row_id: DbId, product_id: DbId, position: Position) -> PinnedSlot {
        PinnedSlot {
            row_id,
            product_id,
            position,
            pinned: true,
        }
    }

    fn ids(merged: &[ProductRef]) -> Vec<DbId> {
        merged.iter().map(|p| p.product_id).collect()
    }

    // -----------------------------------------------------------------------
    // Basic merge
    // -----------------------------------------------------------------------

    #[test]
    fn pins_win_their_exact_slots() {
        // A@0, B@1, C@2 pinned; D, E from the fallback stream.
        let slots = [pin(1, 100, 0), pin(2, 101, 1), pin(3, 102, 2)];
        let merged = merge_window(&slots, &[103, 104], 0, 5);

        assert_eq!(ids(&merged), vec![100, 101, 102, 103, 104]);
        assert_eq!(
            merged.iter().map(|p| p.position).collect::<Vec<_>>(),
            vec![0, 1, 2, 3, 4]
        );
    }

    #[test]
    fn candidates_fill_slots_between_pins() {
        let slots = [pin(1, 100, 0), pin(2, 101, 3)];
        let merged = merge_window(&slots, &[200, 201, 202], 0, 5);

        assert_eq!(ids(&merged), vec![100, 200, 201, 101, 202]);
    }

    #[test]
    fn window_contains_no_duplicates() {
        let slots = [pin(1, 100, 1)];
        let merged = merge_window(&slots, &[200, 201], 0, 4);

        let mut seen = ids(&merged);
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), merged.len());
    }

    // -----------------------------------------------------------------------
    // Windowing
    // -----------------------------------------------------------------------

    #[test]
    fn offset_window_starts_mid_sequence() {
        let slots = [pin(1, 100, 0), pin(2, 101, 1), pin(3, 102, 2)];
        // Positions 2..5: C pinned, then candidates.
        let merged = merge_window(&slots, &[103, 104], 2, 3);

        assert_eq!(ids(&merged), vec![102, 103, 104]);
        assert_eq!(merged[0].position, 2);
    }

    #[test]
    fn offset_past_end_yields_empty_window() {
        let slots = [pin(1, 100, 0)];
        assert!(merge_window(&slots, &[], 10, 5).is_empty());
    }

    #[test]
    fn exhausted_candidates_stop_before_limit() {
        let slots = [pin(1, 100, 0)];
        let merged = merge_window(&slots, &[200], 0, 10);

        assert_eq!(ids(&merged), vec![100, 200]);
    }

    #[test]
    fn pin_beyond_candidate_supply_is_still_emitted() {
        let slots = [pin(1, 100, 3)];
        let merged = merge_window(&slots, &[200], 0, 5);

        // Candidate at 0, then the pin at its exact slot.
        assert_eq!(ids(&merged), vec![200, 100]);
        assert_eq!(merged[1].position, 3);
    }

    // -----------------------------------------------------------------------
    // candidate_window
    // -----------------------------------------------------------------------

    #[test]
    fn candidate_window_full_range() {
        let slots = [pin(1, 100, 0), pin(2, 101, 1)];
        assert_eq!(candidate_window(&slots, 0, 5), (0, 3));
    }

    #[test]
    fn candidate_window_skips_pins_before_offset() {
        let slots = [pin(1, 100, 0), pin(2, 101, 1), pin(3, 102, 4)];
        // Window 2..6 holds one pin (at 4); two pins sit before it.
        assert_eq!(candidate_window(&slots, 2, 4), (0, 3));
    }

    #[test]
    fn candidate_window_never_goes_negative() {
        let slots = [pin(1, 100, 0), pin(2, 101, 1), pin(3, 102, 2)];
        assert_eq!(candidate_window(&slots, 1, 2), (0, 0));
    }

    // -----------------------------------------------------------------------
    // Deleted gap repair
    // -----------------------------------------------------------------------

    #[test]
    fn gap_repair_shifts_trailing_slots_down() {
        // Pin at 1 was deleted from the catalog; 0 stays, 2 and 3 shift.
        let mut slots = [pin(1, 100, 0), pin(3, 102, 2), pin(4, 103, 3)];
        close_deleted_gap(&mut slots, 1);

        assert_eq!(slots[0].position, 0);
        assert_eq!(slots[1].position, 1);
        assert_eq!(slots[2].position, 2);
    }

    #[test]
    fn gap_repair_leaves_earlier_slots_untouched() {
        let mut slots = [pin(1, 100, 0), pin(2, 101, 1)];
        close_deleted_gap(&mut slots, 5);

        assert_eq!(slots[0].position, 0);
        assert_eq!(slots[1].position, 1);
    }

    // -----------------------------------------------------------------------
    // claimed_product_ids
    // -----------------------------------------------------------------------

    #[test]
    fn claimed_ids_cover_every_slot() {
        let slots = [pin(1, 100, 0), pin(2, 101, 7)];
        assert_eq!(claimed_product_ids(&slots), vec![100, 101]);
    }
}
