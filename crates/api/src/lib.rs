//! Shelf API server library.
//!
//! Exposes the core building blocks (config, state, error handling,
//! routes, the listing service and the invalidation bus) so integration
//! tests and the binary entrypoint can both access them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod invalidation;
pub mod listing;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
