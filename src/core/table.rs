// LicUsage - core/table.rs
//
// Column-ordered view over extracted records. Every renderer (terminal,
// GUI grid, CSV, spreadsheet) reads cells through this one view so the
// column order and null handling stay identical across outputs.

use crate::core::model::UsageRecord;

/// Output columns, in order.
pub const COLUMNS: [&str; 6] = [
    "Site",
    "FeatureName",
    "ConfigureItemName",
    "ResourceUsage",
    "Used",
    "Total",
];

/// A single table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue<'a> {
    Text(&'a str),
    Number(f64),
    /// A numeric field that could not be coerced.
    Empty,
}

impl CellValue<'_> {
    /// Text shown for the cell. Whole numbers print without a fraction.
    pub fn display(&self) -> String {
        match self {
            CellValue::Text(s) => (*s).to_string(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Empty => String::new(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Number(_) | CellValue::Empty)
    }
}

/// Format a number, dropping the `.0` of whole values.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Borrowed tabular view over a record slice.
#[derive(Debug, Clone, Copy)]
pub struct UsageTable<'a> {
    records: &'a [UsageRecord],
}

impl<'a> UsageTable<'a> {
    pub fn new(records: &'a [UsageRecord]) -> Self {
        Self { records }
    }

    pub fn header(&self) -> &'static [&'static str; 6] {
        &COLUMNS
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Cells of one record, in column order.
    pub fn row(&self, index: usize) -> Option<[CellValue<'a>; 6]> {
        self.records.get(index).map(row_cells)
    }

    /// All rows in record order.
    pub fn rows(&self) -> impl Iterator<Item = [CellValue<'a>; 6]> + 'a {
        self.records.iter().map(row_cells)
    }
}

fn row_cells(record: &UsageRecord) -> [CellValue<'_>; 6] {
    let number = |v: Option<f64>| v.map_or(CellValue::Empty, CellValue::Number);
    [
        CellValue::Text(&record.site),
        CellValue::Text(&record.feature_name),
        CellValue::Text(&record.configure_item_name),
        CellValue::Text(&record.resource_usage),
        number(record.used),
        number(record.total),
    ]
}

/// Render the table as aligned plain text for terminal output.
///
/// Text columns are left-aligned and numeric columns right-aligned. An
/// empty table renders the header and rule only.
pub fn render_text(table: &UsageTable<'_>) -> String {
    let rows: Vec<[CellValue<'_>; 6]> = table.rows().collect();

    let mut widths: Vec<usize> = COLUMNS.iter().map(|c| c.chars().count()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.display().chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = COLUMNS
        .iter()
        .zip(&widths)
        .map(|(c, &w)| format!("{c:<w$}"))
        .collect();
    out.push_str(header.join("  ").trim_end());
    out.push('\n');

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| {
                let text = cell.display();
                if cell.is_numeric() {
                    format!("{text:>w$}")
                } else {
                    format!("{text:<w$}")
                }
            })
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }

    out
}
