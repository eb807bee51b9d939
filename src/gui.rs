// LicUsage - gui.rs
//
// Top-level eframe::App implementation.
// Wires together the menu bar, status bar, record table and compliance window.

use crate::app::state::AppState;
use crate::core::export::ExportFormat;
use crate::ui;

/// The LicUsage desktop application.
pub struct LicUsageApp {
    pub state: AppState,
}

impl LicUsageApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for LicUsageApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Files dropped onto the window become the next document; when several
        // arrive in one frame the last one wins.
        let dropped: Option<std::path::PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .last()
        });
        if let Some(path) = dropped {
            tracing::debug!(path = %path.display(), "File dropped onto window");
            self.state.pending_load = Some(path);
        }
        self.state.process_pending();

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Log\u{2026}").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Text logs", &["txt", "log"])
                            .add_filter("All files", &["*"])
                            .pick_file()
                        {
                            self.state.pending_load = Some(path);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    // Export sub-menu -- enabled only when a report is loaded
                    let has_report = self.state.report.is_some();
                    ui.add_enabled_ui(has_report, |ui| {
                        ui.menu_button("Export", |ui| {
                            for format in [ExportFormat::Xlsx, ExportFormat::Csv, ExportFormat::Json]
                            {
                                let label = format!("Export {}\u{2026}", format.label());
                                if ui.button(label).clicked() {
                                    if let Some(dest) = rfd::FileDialog::new()
                                        .add_filter(format.label(), &[format.extension()])
                                        .set_file_name(format.default_file_name())
                                        .save_file()
                                    {
                                        self.state.export_to(format, &dest);
                                    }
                                    ui.close_menu();
                                }
                            }
                        });
                        if ui.button("Close Document").clicked() {
                            self.state.clear();
                            ui.close_menu();
                        }
                    });
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("View", |ui| {
                    if ui.button("Compliance Check").clicked() {
                        self.state.show_compliance = true;
                        ui.close_menu();
                    }
                });
            });
        });

        // Error bar -- shown until dismissed or replaced by a successful load.
        if let Some(message) = self.state.last_error.clone() {
            egui::TopBottomPanel::top("error_bar").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(ui::theme::ERROR_TEXT, format!("Error: {message}"));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("Dismiss").clicked() {
                            self.state.last_error = None;
                        }
                    });
                });
            });
        }

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.state.status_message);
                if let Some(badge) = self.state.warning_badge() {
                    ui.separator();
                    let badge = egui::Label::new(
                        egui::RichText::new(badge).color(ui::theme::ERROR_TEXT),
                    )
                    .sense(egui::Sense::click());
                    let clicked = ui
                        .add(badge)
                        .on_hover_text("Show config warnings")
                        .clicked();
                    if clicked {
                        self.state.show_compliance = true;
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(ref report) = self.state.report {
                        ui.label(format!(
                            "{} record(s) in {} block(s)",
                            self.state.record_count(),
                            report.block_count()
                        ));
                        if self.state.debug_mode {
                            ui.separator();
                            ui.label(egui::RichText::new("DEBUG").weak());
                        }
                    }
                });
            });
        });

        // Central panel (record table)
        egui::CentralPanel::default().show(ctx, |ui| {
            ui::panels::records::render(ui, &self.state);
        });

        ui::panels::compliance::render(ctx, &mut self.state);
    }
}
