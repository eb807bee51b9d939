// LicUsage - ui/panels/records.rs
//
// Central record table: one row per extracted record in document order,
// columns as exported.

use crate::app::state::AppState;
use crate::core::table::{CellValue, UsageTable, COLUMNS};
use crate::ui::theme;

/// Render the record table (central panel).
pub fn render(ui: &mut egui::Ui, state: &AppState) {
    let Some(report) = state.report.as_ref() else {
        ui.centered_and_justified(|ui| {
            ui.label("Open a log file (File \u{2192} Open Log\u{2026}) or drop one onto the window.");
        });
        return;
    };

    if let Some(ref source) = report.source_file {
        ui.label(egui::RichText::new(source.display().to_string()).weak());
        ui.add_space(4.0);
    }

    if report.records.is_empty() {
        ui.centered_and_justified(|ui| {
            ui.label("No license resource usage blocks were found in this document.");
        });
        return;
    }

    let table = UsageTable::new(&report.records);
    egui::ScrollArea::both()
        .id_salt("records_table_scroll")
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            egui::Grid::new("records_table")
                .num_columns(COLUMNS.len())
                .striped(true)
                .spacing(theme::CELL_SPACING)
                .show(ui, |ui| {
                    for name in table.header() {
                        ui.strong(*name);
                    }
                    ui.end_row();

                    for row in table.rows() {
                        for cell in &row {
                            match cell {
                                CellValue::Text(s) => {
                                    ui.label(
                                        egui::RichText::new(*s)
                                            .monospace()
                                            .size(theme::TABLE_FONT_SIZE),
                                    );
                                }
                                CellValue::Number(_) => {
                                    ui.label(
                                        egui::RichText::new(cell.display())
                                            .monospace()
                                            .size(theme::TABLE_FONT_SIZE),
                                    );
                                }
                                CellValue::Empty => {
                                    ui.label(
                                        egui::RichText::new("\u{2014}")
                                            .color(theme::MISSING_VALUE)
                                            .size(theme::TABLE_FONT_SIZE),
                                    )
                                    .on_hover_text("Not a number");
                                }
                            }
                        }
                        ui.end_row();
                    }
                });
        });
}
