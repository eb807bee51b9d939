// LicUsage - ui/theme.rs
//
// Colour scheme and layout constants.
// No dependencies on app state or business logic.

use egui::Color32;

/// Verdict colours for the compliance window.
pub const COMPLIANT: Color32 = Color32::from_rgb(34, 197, 94); // Green 500
pub const NON_COMPLIANT: Color32 = Color32::from_rgb(248, 113, 113); // Red 400

/// Placeholder colour for Used/Total cells that could not be coerced.
pub const MISSING_VALUE: Color32 = Color32::from_rgb(107, 114, 128); // Gray 500

/// Error banner text.
pub const ERROR_TEXT: Color32 = Color32::from_rgb(253, 186, 116); // Orange 300

/// Layout constants.
pub const TABLE_FONT_SIZE: f32 = 12.5;
pub const CELL_SPACING: [f32; 2] = [16.0, 4.0];
