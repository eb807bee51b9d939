// LicUsage - app/state.rs
//
// Application state for the desktop shell. Holds the current report,
// status line, and dialog flags. Owned by the eframe::App implementation.

use crate::core::export::{self, ExportFormat};
use crate::core::model::UsageReport;
use crate::platform::config::AppConfig;
use std::path::{Path, PathBuf};

/// Top-level application state.
#[derive(Debug)]
pub struct AppState {
    /// Validated configuration.
    pub config: AppConfig,

    /// Report for the currently loaded document.
    pub report: Option<UsageReport>,

    /// Document to load on the next frame (CLI argument, file picker, or drop).
    pub pending_load: Option<PathBuf>,

    /// Status message for the status bar.
    pub status_message: String,

    /// Error from the most recent load or export, shown until dismissed.
    pub last_error: Option<String>,

    /// Non-fatal config warnings gathered at startup.
    pub warnings: Vec<String>,

    /// Whether to show the compliance window.
    pub show_compliance: bool,

    /// Whether debug mode is enabled.
    pub debug_mode: bool,
}

impl AppState {
    pub fn new(config: AppConfig, warnings: Vec<String>, debug_mode: bool) -> Self {
        Self {
            config,
            report: None,
            pending_load: None,
            status_message: "Ready. Open a log file to begin.".to_string(),
            last_error: None,
            warnings,
            show_compliance: false,
            debug_mode,
        }
    }

    /// Load a document, replacing the current report on success.
    ///
    /// On failure the previous report is cleared: a document that fails
    /// extraction must not leave stale rows on screen.
    pub fn load(&mut self, path: &Path) {
        match crate::app::load::load_report(path, &self.config) {
            Ok(report) => {
                self.status_message = format!(
                    "Loaded {}: {} site block(s), {} record(s).",
                    path.display(),
                    report.block_count(),
                    report.records.len()
                );
                self.show_compliance = !report.compliance.all_compliant();
                self.report = Some(report);
                self.last_error = None;
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to load document");
                self.report = None;
                self.show_compliance = false;
                self.status_message = "Load failed.".to_string();
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// Handle a pending load request, if any.
    pub fn process_pending(&mut self) {
        if let Some(path) = self.pending_load.take() {
            self.load(&path);
        }
    }

    /// Write the current report to `dest` in the given format.
    pub fn export_to(&mut self, format: ExportFormat, dest: &Path) {
        let Some(report) = self.report.as_ref() else {
            self.status_message = "Nothing to export.".to_string();
            return;
        };
        let result = std::fs::File::create(dest)
            .map_err(|e| format!("Cannot create file: {e}"))
            .and_then(|f| export::export(format, report, f, dest).map_err(|e| e.to_string()));
        match result {
            Ok(n) => {
                self.status_message =
                    format!("Exported {n} record(s) to {} ({}).", dest.display(), format.label());
            }
            Err(msg) => {
                self.status_message = format!("{} export failed.", format.label());
                self.last_error = Some(msg);
            }
        }
    }

    /// Status-bar text for pending config warnings, if there are any.
    pub fn warning_badge(&self) -> Option<String> {
        match self.warnings.len() {
            0 => None,
            1 => Some("1 config warning".to_string()),
            n => Some(format!("{n} config warnings")),
        }
    }

    pub fn record_count(&self) -> usize {
        self.report.as_ref().map_or(0, |r| r.records.len())
    }

    /// Clear the current report and reset to initial state.
    pub fn clear(&mut self) {
        self.report = None;
        self.pending_load = None;
        self.last_error = None;
        self.show_compliance = false;
        self.status_message = "Ready.".to_string();
    }
}
