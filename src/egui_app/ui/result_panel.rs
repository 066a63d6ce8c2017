use super::*;
use crate::session::AnalysisResult;
use eframe::egui::{ProgressBar, Ui};

const RESULT_WIDTH: f32 = 320.0;

impl EguiApp {
    pub(super) fn render_result(&mut self, ui: &mut Ui) {
        ui.set_width(RESULT_WIDTH);
        heading(ui, "Result");
        ui.add_space(6.0);
        if let Some(message) = self.controller.ui.analyze.error.as_deref() {
            error_label(ui, message);
            ui.add_space(6.0);
        }
        match self.controller.ui.analyze.displayed.as_ref() {
            Some(result) => render_result_card(ui, result),
            None if self.controller.is_analysis_submitting() => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    muted_label(ui, "Analyzing handwriting…");
                });
            }
            None => muted_label(ui, "Draw or upload a sample, then press Analyze."),
        }
    }
}

fn render_result_card(ui: &mut Ui, result: &AnalysisResult) {
    let palette = style::palette();
    style::section_frame().show(ui, |ui| {
        ui.label(
            RichText::new(result.personality.label())
                .size(22.0)
                .strong()
                .color(palette.accent_violet),
        );
        ui.label(result.description);
        ui.add_space(8.0);
        let fraction = result.confidence_bar_fraction();
        ui.add(
            ProgressBar::new(fraction)
                .desired_width(RESULT_WIDTH - 24.0)
                .fill(style::confidence_fill(fraction))
                .text(format!("Confidence {}", result.confidence_label())),
        );
        ui.add_space(8.0);
        ui.label(RichText::new("Notes").strong());
        muted_label(ui, &result.note);
        if let Some(url) = result.image_url.as_deref() {
            ui.add_space(4.0);
            ui.hyperlink_to("Processed image", url);
        }
        ui.add_space(4.0);
        muted_label(ui, &result.captured_at_label());
    });
}
