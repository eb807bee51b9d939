// LicUsage - app/load.rs
//
// Document pipeline: read -> extract -> check -> report.
// Shared by the batch CLI and the GUI so both shells produce identical
// reports for the same file.

use crate::core::compliance::{self, ComplianceRules};
use crate::core::extractor::{self, ExtractorConfig};
use crate::core::model::UsageReport;
use crate::platform::config::AppConfig;
use crate::platform::fs;
use crate::util::error::Result;
use std::path::{Path, PathBuf};

/// Run the extractor and compliance check over already-decoded text.
pub fn build_report(
    source: Option<PathBuf>,
    text: &str,
    extractor_config: &ExtractorConfig,
    rules: &ComplianceRules,
) -> Result<UsageReport> {
    let records = extractor::extract_with(text, extractor_config)?;
    let summary = compliance::check(&records, rules);
    Ok(UsageReport::new(source, records, summary))
}

/// Read a document from disk and build its report.
pub fn load_report(path: &Path, config: &AppConfig) -> Result<UsageReport> {
    let _span = tracing::info_span!("load_report", path = %path.display()).entered();

    let text = fs::read_document(path)?;
    let report = build_report(
        Some(path.to_path_buf()),
        &text,
        &config.extractor,
        &config.compliance,
    )?;

    tracing::info!(
        blocks = report.block_count(),
        records = report.records.len(),
        non_compliant = report.compliance.non_compliant().len(),
        "Document processed"
    );
    Ok(report)
}
