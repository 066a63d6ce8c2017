use super::*;
use eframe::egui::Ui;

impl EguiApp {
    pub(super) fn render_ocr(&mut self, ui: &mut Ui) {
        heading(ui, "Text recognition");
        muted_label(ui, "Extract the written text from a handwriting image.");
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("Choose image…").clicked() {
                self.controller.pick_ocr_file_via_dialog();
            }
            match self.controller.ui.ocr.selected.as_ref() {
                Some(upload) => {
                    ui.label(&upload.file_name);
                }
                None => muted_label(ui, "No file selected"),
            }
        });
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            let submitting = self.controller.is_ocr_submitting();
            let label = if submitting { "Recognizing…" } else { "Recognize text" };
            if ui
                .add_enabled(!submitting, egui::Button::new(label))
                .clicked()
            {
                self.controller.submit_ocr();
            }
            if submitting {
                ui.spinner();
            }
        });
        if let Some(message) = self.controller.ui.ocr.error.as_deref() {
            ui.add_space(6.0);
            error_label(ui, message);
        }
        if let Some(text) = self.controller.ui.ocr.recognized_text.as_deref() {
            ui.add_space(10.0);
            ui.label(RichText::new("Recognized text").strong());
            let mut shown = if text.is_empty() { "(no text found)" } else { text };
            style::section_frame().show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut shown)
                        .desired_width(f32::INFINITY)
                        .desired_rows(6),
                );
            });
        }
    }
}
