// LicUsage - app/mod.rs
//
// Application layer: document pipeline and desktop-shell state.
// Dependencies: core, platform.
// Must NOT depend on: ui.

pub mod load;
pub mod state;
