// LicUsage - ui/panels/compliance.rs
//
// Compliance window: overall verdict plus a per-site breakdown of distinct
// ConfigureItemName and ResourceUsage counts, followed by any config warnings.

use crate::app::state::AppState;
use crate::core::compliance;
use crate::ui::theme;

/// Render the compliance dialog (if state.show_compliance is true).
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    if !state.show_compliance {
        return;
    }

    let mut open = true;
    let mut close_clicked = false;
    egui::Window::new("Compliance Check")
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .min_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            if let Some(ref report) = state.report {
                let summary = &report.compliance;
                let verdict = compliance::describe(summary, &state.config.compliance);
                let colour = if summary.all_compliant() {
                    theme::COMPLIANT
                } else {
                    theme::NON_COMPLIANT
                };
                ui.colored_label(colour, verdict);

                if !summary.sites.is_empty() {
                    ui.add_space(8.0);
                    ui.separator();
                    ui.strong("Per-site breakdown");

                    egui::ScrollArea::vertical()
                        .id_salt("compliance_sites")
                        .max_height(300.0)
                        .show(ui, |ui| {
                            egui::Grid::new("compliance_table")
                                .num_columns(5)
                                .striped(true)
                                .spacing([12.0, 3.0])
                                .show(ui, |ui| {
                                    ui.strong("Site");
                                    ui.strong("Records");
                                    ui.strong("Configure items");
                                    ui.strong("Resource usages");
                                    ui.strong("Status");
                                    ui.end_row();

                                    for site in &summary.sites {
                                        ui.label(egui::RichText::new(&site.site).monospace());
                                        ui.label(site.records.to_string());
                                        ui.label(site.distinct_configure_items.to_string());
                                        ui.label(site.distinct_resource_usages.to_string());
                                        if site.compliant {
                                            ui.colored_label(theme::COMPLIANT, "OK");
                                        } else {
                                            ui.colored_label(theme::NON_COMPLIANT, "Fails");
                                        }
                                        ui.end_row();
                                    }
                                });
                        });
                }
            } else {
                ui.label("No document has been loaded yet.");
            }

            // Config warnings gathered at startup.
            if !state.warnings.is_empty() {
                ui.add_space(8.0);
                ui.separator();
                egui::CollapsingHeader::new(format!("Warnings ({})", state.warnings.len()))
                    .id_salt("compliance_warnings")
                    .default_open(state.report.is_none())
                    .show(ui, |ui| {
                        egui::ScrollArea::vertical()
                            .id_salt("compliance_warnings_scroll")
                            .max_height(120.0)
                            .show(ui, |ui| {
                                for warn in &state.warnings {
                                    ui.label(
                                        egui::RichText::new(warn)
                                            .color(theme::ERROR_TEXT)
                                            .size(11.5),
                                    );
                                }
                            });
                    });
            }

            ui.add_space(8.0);
            ui.separator();
            if ui.button("Close").clicked() {
                close_clicked = true;
            }
        });

    if !open || close_clicked {
        state.show_compliance = false;
    }
}
