use super::*;
use eframe::egui::{ColorImage, TextureOptions, Ui};

const THUMBNAIL_EDGE: f32 = 48.0;

impl EguiApp {
    pub(super) fn render_history(&mut self, ui: &mut Ui) {
        heading(ui, "History");
        ui.add_space(6.0);
        self.prune_thumbnails();
        if self.controller.history().is_empty() {
            muted_label(ui, "No analyses yet this session.");
            return;
        }
        let mut remove = None;
        egui::ScrollArea::vertical()
            .id_salt("history_scroll")
            .show(ui, |ui| {
                let entries: Vec<_> = self
                    .controller
                    .history()
                    .iter()
                    .map(|entry| (entry.id(), entry.summary(), entry.captured_at_label()))
                    .collect();
                for (index, (id, summary, captured)) in entries.into_iter().enumerate() {
                    ui.push_id(id, |ui| {
                        ui.horizontal(|ui| {
                            if let Some(tex) = self.thumbnail(ui, index) {
                                ui.add(egui::Image::new((tex, egui::vec2(THUMBNAIL_EDGE, THUMBNAIL_EDGE))));
                            }
                            ui.vertical(|ui| {
                                ui.label(RichText::new(summary).strong());
                                muted_label(ui, &captured);
                            });
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if ui.small_button("Delete").clicked() {
                                    remove = Some(index);
                                }
                            });
                        });
                    });
                    ui.separator();
                }
            });
        if let Some(index) = remove {
            self.controller.remove_history_entry(index);
        }
    }

    /// Texture for the submitted image of history row `index`, decoded once per result.
    fn thumbnail(&mut self, ui: &Ui, index: usize) -> Option<egui::TextureId> {
        let entry = self.controller.history().get(index)?;
        if let Some(tex) = self.thumbnails.get(&entry.id()) {
            return Some(tex.id());
        }
        let decoded = match image::load_from_memory(&entry.source_image) {
            Ok(decoded) => decoded.to_rgba8(),
            Err(err) => {
                tracing::warn!(id = entry.id(), "Failed to decode history thumbnail: {err}");
                return None;
            }
        };
        let size = [decoded.width() as usize, decoded.height() as usize];
        let image = ColorImage::from_rgba_unmultiplied(size, decoded.as_raw());
        let tex = ui.ctx().load_texture(
            format!("history_thumb_{}", entry.id()),
            image,
            TextureOptions::LINEAR,
        );
        let id = tex.id();
        self.thumbnails.insert(entry.id(), tex);
        Some(id)
    }

    fn prune_thumbnails(&mut self) {
        let history = self.controller.history();
        if self.thumbnails.len() > history.len() {
            self.thumbnails
                .retain(|id, _| history.iter().any(|entry| entry.id() == *id));
        }
    }
}
