use eframe::egui::{self, Align, Color32, RichText};
use rfd::FileDialog;

use super::{DropzoneApp, SelectedFile};
use crate::utils::format_size;

impl DropzoneApp {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(20.0);
            ui.vertical_centered(|ui| {
                ui.heading("S3 Dropzone");
                ui.add_space(5.0);
                ui.label(
                    RichText::new("Upload a file straight to your bucket")
                        .color(ui.visuals().text_color().gamma_multiply(0.7)),
                );
            });

            ui.add_space(15.0);

            if self.machine.upload_failed() {
                ui.vertical_centered(|ui| {
                    ui.colored_label(
                        Color32::from_rgb(220, 50, 50),
                        "A server error occurred. Please try again.",
                    );
                });
                ui.add_space(10.0);
            }

            // The success window is not a true modal, so the controls
            // are also frozen while it is open.
            let controls_enabled =
                !self.machine.is_uploading() && !self.machine.dialog_visible();

            ui.vertical_centered(|ui| {
                ui.add_enabled_ui(controls_enabled, |ui| {
                    let button =
                        egui::Button::new("📁 Choose file").min_size(egui::vec2(200.0, 40.0));
                    if ui.add(button).clicked() {
                        self.pick_file();
                    }
                });
            });

            ui.add_space(15.0);

            if let Some(file) = self.machine.selected_file().cloned() {
                self.render_selected_file(ui, &file, controls_enabled);
            }

            ui.with_layout(egui::Layout::bottom_up(Align::Center), |ui| {
                ui.add_space(10.0);
                ui.label(
                    RichText::new(format!("v {}", env!("CARGO_PKG_VERSION")))
                        .color(ui.visuals().text_color().gamma_multiply(0.5)),
                );
            });
        });

        if self.machine.dialog_visible() {
            self.render_success_dialog(ctx);
        }
    }

    /// Native picker; of a multi-selection only the first entry is used,
    /// and a cancelled or unreadable pick is silently ignored.
    fn pick_file(&mut self) {
        let picked = FileDialog::new()
            .pick_files()
            .and_then(|files| files.into_iter().next());
        if let Some(file) = picked.and_then(SelectedFile::from_path) {
            self.select_file(file);
        }
    }

    fn render_selected_file(
        &mut self,
        ui: &mut egui::Ui,
        file: &SelectedFile,
        controls_enabled: bool,
    ) {
        ui.vertical_centered(|ui| {
            ui.group(|ui| {
                ui.label(format!("{} ({})", file.name, format_size(file.size)));

                if self.machine.is_uploading() {
                    ui.add_space(8.0);
                    let progress_bar =
                        egui::ProgressBar::new(self.machine.progress() as f32 / 100.0)
                            .show_percentage()
                            .desired_width(260.0);
                    ui.add(progress_bar);
                }
            });

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                let indent = (ui.available_width() - 220.0).max(0.0) / 2.0;
                ui.add_space(indent);

                ui.add_enabled_ui(controls_enabled, |ui| {
                    if ui.button("🗑 Remove file").clicked() {
                        self.remove_file();
                    }

                    let label = if self.machine.is_uploading() {
                        "⏳ Uploading..."
                    } else {
                        "📤 Upload file"
                    };
                    if ui.button(label).clicked() {
                        self.start_upload();
                    }
                });
            });
        });
    }

    fn render_success_dialog(&mut self, ctx: &egui::Context) {
        let mut open = true;
        let mut accepted = false;

        egui::Window::new("Success")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .open(&mut open)
            .show(ctx, |ui| {
                ui.add_space(5.0);
                ui.label("The file was uploaded to the bucket.");
                ui.add_space(10.0);
                ui.with_layout(egui::Layout::right_to_left(Align::Min), |ui| {
                    if ui.button("Accept").clicked() {
                        accepted = true;
                    }
                });
            });

        // Title-bar close and Accept are the same reset.
        if !open || accepted {
            self.dismiss_dialog();
        }
    }
}
