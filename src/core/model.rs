// LicUsage - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

// =============================================================================
// Usage Record (normalised output of extraction)
// =============================================================================

/// One row of a site's license resource usage table.
///
/// Every matched site block yields exactly three of these, in the order the
/// rows appear in the log. `used` and `total` are the two halves of
/// `resource_usage` coerced to numbers; either is `None` when its half is
/// not numeric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageRecord {
    /// Network element / host label taken from the `<...>` prompt.
    #[serde(rename = "Site")]
    pub site: String,

    #[serde(rename = "FeatureName")]
    pub feature_name: String,

    #[serde(rename = "ConfigureItemName")]
    pub configure_item_name: String,

    /// Raw `<used>/<total>` text exactly as it appears in the log.
    #[serde(rename = "ResourceUsage")]
    pub resource_usage: String,

    #[serde(rename = "Used")]
    pub used: Option<f64>,

    #[serde(rename = "Total")]
    pub total: Option<f64>,
}

impl UsageRecord {
    /// Build a record from the three tokens of a data row, normalising the
    /// usage fraction.
    pub fn from_tokens(
        site: &str,
        feature_name: &str,
        configure_item_name: &str,
        resource_usage: &str,
    ) -> Self {
        let (used, total) = split_usage(resource_usage);
        Self {
            site: site.to_string(),
            feature_name: feature_name.to_string(),
            configure_item_name: configure_item_name.to_string(),
            resource_usage: resource_usage.to_string(),
            used,
            total,
        }
    }
}

/// Split a `<used>/<total>` value at its first `/` and coerce each half.
///
/// Coercion is lenient: a half that does not parse as a finite number
/// becomes `None` without affecting the other half. A value with no `/`
/// has no total.
pub fn split_usage(raw: &str) -> (Option<f64>, Option<f64>) {
    match raw.split_once(crate::util::constants::USAGE_SEPARATOR) {
        Some((used, total)) => (coerce_number(used), coerce_number(total)),
        None => (coerce_number(raw), None),
    }
}

/// Parse a numeric field, returning `None` for anything that is not a
/// finite number.
pub fn coerce_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// =============================================================================
// Compliance results
// =============================================================================

/// Distinct-value counts for one site, plus the verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteCompliance {
    pub site: String,

    /// Number of records attributed to the site (a multiple of 3).
    pub records: usize,

    pub distinct_configure_items: usize,

    pub distinct_resource_usages: usize,

    pub compliant: bool,
}

/// Per-site compliance results ordered by site label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComplianceSummary {
    pub sites: Vec<SiteCompliance>,
}

impl ComplianceSummary {
    /// Labels of the sites that fail the check, in site order.
    pub fn non_compliant(&self) -> Vec<&str> {
        self.sites
            .iter()
            .filter(|s| !s.compliant)
            .map(|s| s.site.as_str())
            .collect()
    }

    /// True when every site passes. Vacuously true with no sites.
    pub fn all_compliant(&self) -> bool {
        self.sites.iter().all(|s| s.compliant)
    }
}

// =============================================================================
// Report (what the shell renders and exports)
// =============================================================================

/// Records and compliance results for one document.
#[derive(Debug, Clone, Serialize)]
pub struct UsageReport {
    /// Document the records came from, when it was read from disk.
    pub source_file: Option<PathBuf>,

    pub generated_at: DateTime<Utc>,

    pub records: Vec<UsageRecord>,

    pub compliance: ComplianceSummary,
}

impl UsageReport {
    pub fn new(
        source_file: Option<PathBuf>,
        records: Vec<UsageRecord>,
        compliance: ComplianceSummary,
    ) -> Self {
        Self {
            source_file,
            generated_at: Utc::now(),
            records,
            compliance,
        }
    }

    /// Number of site blocks the records came from.
    pub fn block_count(&self) -> usize {
        self.records.len() / crate::util::constants::ROWS_PER_BLOCK
    }
}
