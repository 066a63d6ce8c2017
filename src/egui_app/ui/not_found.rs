use super::*;
use eframe::egui::Ui;

impl EguiApp {
    pub(super) fn render_not_found(&mut self, ui: &mut Ui, name: &str) {
        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            ui.label(RichText::new("404").size(48.0).color(style::palette().accent_violet));
            heading(ui, "Page not found");
            muted_label(ui, &format!("There is no view called \"{name}\"."));
            ui.add_space(12.0);
            if ui.button("Back to analysis").clicked() {
                self.controller.set_view(View::Analyze);
            }
        });
    }
}
