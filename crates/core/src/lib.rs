//! Domain logic for per-category custom product ordering.
//!
//! This crate has zero internal deps and performs no I/O so it can be used
//! by the repository/API layers and by any future CLI or worker tooling.
//!
//! - [`sort_code`]: the registry of named fallback orderings.
//! - [`settings`]: per-category sort settings resolution.
//! - [`ordering`]: the read path, merging pinned slots with the fallback
//!   candidate stream into one dense windowed sequence.
//! - [`reconcile`]: the write path, turning drag-and-drop moves into a
//!   minimal persistable position diff.

pub mod error;
pub mod ordering;
pub mod reconcile;
pub mod settings;
pub mod sort_code;
pub mod types;

pub use error::CoreError;
pub use sort_code::SortCode;
