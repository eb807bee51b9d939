// LicUsage - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LicUsage";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "LicUsage";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Extraction grammar
// =============================================================================

/// Command whose output carries the license resource usage table.
pub const DEFAULT_COMMAND: &str = "display license resource usage";

/// Keyword of the output filter that follows the command (`| inc ...`).
pub const FILTER_KEYWORD: &str = "inc";

/// License control item identifiers accepted in the `| inc` filter.
pub const DEFAULT_LICENSE_ITEMS: &[&str] = &["LCR9S9KNBSL0Q", "LCR9S9KNEVN0P", "LCR9S9KNL3V0P"];

/// Column header tokens, in order, that introduce the data rows.
pub const COLUMN_HEADER: [&str; 3] = ["FeatureName", "ConfigureItemName", "ResourceUsage"];

/// Minimum run of `-` characters that makes a line a dashed rule.
pub const MIN_RULE_DASHES: usize = 5;

/// Data rows captured per site block.
pub const ROWS_PER_BLOCK: usize = 3;

/// Whitespace-separated tokens expected on every data row.
pub const TOKENS_PER_ROW: usize = 3;

/// Separator between the used and total halves of a ResourceUsage value.
pub const USAGE_SEPARATOR: char = '/';

// =============================================================================
// Input limits
// =============================================================================

/// Hard upper bound on the size of a single input document.
pub const MAX_INPUT_FILE_SIZE: u64 = 256 * 1024 * 1024; // 256 MiB

/// Maximum length of a log line included in debug output and error messages.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Compliance
// =============================================================================

/// Distinct ConfigureItemName values a compliant site must report.
pub const DEFAULT_EXPECTED_CONFIGURE_ITEMS: usize = 3;

/// Minimum distinct ResourceUsage values a compliant site must report.
pub const DEFAULT_MIN_RESOURCE_USAGES: usize = 1;

/// Upper bound accepted from config for either compliance threshold.
pub const MAX_COMPLIANCE_THRESHOLD: usize = 1_000;

// =============================================================================
// Export
// =============================================================================

/// Worksheet name used for the spreadsheet export.
pub const SHEET_NAME: &str = "License Resource Usage Data";

/// Suggested file name for the spreadsheet export.
pub const DEFAULT_XLSX_FILE_NAME: &str = "License Resource Usage.xlsx";

/// Suggested file name for the CSV export.
pub const DEFAULT_CSV_FILE_NAME: &str = "License Resource Usage.csv";

/// Suggested file name for the JSON report export.
pub const DEFAULT_JSON_FILE_NAME: &str = "License Resource Usage.json";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
