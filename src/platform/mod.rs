// LicUsage - platform/mod.rs
//
// Platform abstraction layer: config directories, config.toml, file reads.
// Must NOT depend on: app, ui.

pub mod config;
pub mod fs;
