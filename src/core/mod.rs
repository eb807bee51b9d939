// LicUsage - core/mod.rs
//
// Core business logic layer: record model, block extraction, tabular view,
// compliance check, export.
// Must NOT depend on: ui, platform, app.

pub mod compliance;
pub mod export;
pub mod extractor;
pub mod model;
pub mod table;
