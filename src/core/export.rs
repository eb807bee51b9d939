// LicUsage - core/export.rs
//
// Spreadsheet, CSV, and JSON export of extracted records.
// Core layer: writes to any Write trait object; the path is carried only
// for error context.

use crate::core::model::{UsageRecord, UsageReport};
use crate::core::table::{CellValue, UsageTable, COLUMNS};
use crate::util::constants;
use crate::util::error::ExportError;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::io::Write;
use std::path::Path;

/// Supported export file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// Suggested file name for save dialogs.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => constants::DEFAULT_XLSX_FILE_NAME,
            ExportFormat::Csv => constants::DEFAULT_CSV_FILE_NAME,
            ExportFormat::Json => constants::DEFAULT_JSON_FILE_NAME,
        }
    }

    /// Human-readable label for menus and status messages.
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "Excel",
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
        }
    }

    /// Infer the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        ext.parse().ok()
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!(
                "unknown export format '{other}' (expected xlsx, csv or json)"
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Write a report in the given format. Returns the number of records written.
pub fn export<W: Write>(
    format: ExportFormat,
    report: &UsageReport,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let count = match format {
        ExportFormat::Xlsx => export_xlsx(&report.records, writer, export_path)?,
        ExportFormat::Csv => export_csv(&report.records, writer, export_path)?,
        ExportFormat::Json => export_json(report, writer, export_path)?,
    };
    tracing::info!(
        path = %export_path.display(),
        format = %format,
        records = count,
        "Export written"
    );
    Ok(count)
}

/// Build the workbook in memory: one sheet, a bold header row, one row per
/// record. Missing numbers are left as blank cells.
pub fn xlsx_bytes(records: &[UsageRecord]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(constants::SHEET_NAME)?;

    for (col, name) in COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header_format)?;
    }

    let table = UsageTable::new(records);
    for (i, row) in table.rows().enumerate() {
        let row_num = (i + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                CellValue::Text(s) => {
                    worksheet.write_string(row_num, col as u16, *s)?;
                }
                CellValue::Number(n) => {
                    worksheet.write_number(row_num, col as u16, *n)?;
                }
                CellValue::Empty => {}
            }
        }
    }
    worksheet.autofit();

    workbook.save_to_buffer()
}

/// Export records as an `.xlsx` workbook.
pub fn export_xlsx<W: Write>(
    records: &[UsageRecord],
    mut writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let bytes = xlsx_bytes(records).map_err(|e| ExportError::Xlsx {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    writer
        .write_all(&bytes)
        .and_then(|_| writer.flush())
        .map_err(|e| ExportError::Io {
            path: export_path.to_path_buf(),
            source: e,
        })?;
    Ok(records.len())
}

/// Export records as CSV with the same columns as the spreadsheet.
pub fn export_csv<W: Write>(
    records: &[UsageRecord],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let csv_err = |e| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    csv_writer.write_record(COLUMNS).map_err(csv_err)?;

    let mut count = 0;
    for row in UsageTable::new(records).rows() {
        csv_writer
            .write_record(row.iter().map(CellValue::display))
            .map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Export the full report (records plus compliance summary) as pretty JSON.
pub fn export_json<W: Write>(
    report: &UsageReport,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, report).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(report.records.len())
}
