//! Per-category sort settings resolution.
//!
//! A category may carry its own settings row selecting a base fallback
//! ordering, exposing the custom order as the default storefront view, or
//! linking another category whose pinned rows should be mirrored. Absent
//! rows resolve to defaults and never error.

use serde::Serialize;

use crate::error::CoreError;
use crate::sort_code::SortCode;
use crate::types::DbId;

/// Raw settings row as persisted (`base_sort == 0` means "inherit the
/// global default").
#[derive(Debug, Clone)]
pub struct CategorySettings {
    pub category_id: DbId,
    pub base_sort: i16,
    pub show_by_default: bool,
    pub linked_category_id: Option<DbId>,
}

/// Effective settings for a category after applying defaults and links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSortSettings {
    pub category_id: DbId,
    /// The fallback ordering applied to non-pinned products.
    pub base_sort: SortCode,
    /// Whether the custom order is the storefront's default view.
    pub show_by_default: bool,
    /// Category whose pinned rows drive the ordering. Differs from
    /// `category_id` only for linked ("mirrored") listings.
    pub pin_source_category_id: DbId,
    /// Whether an explicit settings row exists for this category.
    pub has_own_settings: bool,
}

/// Resolve the effective sort settings for a category.
///
/// Precedence rule: the category's own `base_sort` wins whenever it is
/// positive; otherwise the global default applies. A linked category
/// redirects only where pinned rows are read from; `base_sort` and
/// `show_by_default` always remain the category's own.
///
/// Link resolution follows exactly one hop and does not detect cycles;
/// callers are responsible for not persisting circular links. A category
/// linked to itself degenerates to its own rows.
pub fn resolve(
    category_id: DbId,
    row: Option<&CategorySettings>,
    global_default: SortCode,
) -> Result<ResolvedSortSettings, CoreError> {
    let Some(row) = row else {
        return Ok(ResolvedSortSettings {
            category_id,
            base_sort: global_default,
            show_by_default: false,
            pin_source_category_id: category_id,
            has_own_settings: false,
        });
    };

    let base_sort = if row.base_sort > 0 {
        SortCode::from_code(row.base_sort)?
    } else {
        global_default
    };

    Ok(ResolvedSortSettings {
        category_id,
        base_sort,
        show_by_default: row.show_by_default,
        pin_source_category_id: row.linked_category_id.unwrap_or(category_id),
        has_own_settings: true,
    })
}
