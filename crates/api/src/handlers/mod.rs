//! HTTP handler modules, one per resource group.

pub mod listing;
pub mod settings;
