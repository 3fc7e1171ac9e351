//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod pinned_repo;
pub mod product_repo;
pub mod settings_repo;

pub use pinned_repo::PinnedPositionRepo;
pub use product_repo::ProductRepo;
pub use settings_repo::CategorySortSettingsRepo;
