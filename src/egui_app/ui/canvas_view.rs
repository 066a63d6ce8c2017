use super::*;
use crate::canvas::Point;
use eframe::egui::{ColorImage, Sense, StrokeKind, TextureOptions, Ui};

impl EguiApp {
    pub(super) fn render_canvas(&mut self, ui: &mut Ui) {
        heading(ui, "Handwriting");
        muted_label(ui, "Write a sentence or load a scanned sample.");
        ui.add_space(6.0);
        let (width, height) = {
            let raster = self.controller.surface().raster();
            (raster.width(), raster.height())
        };
        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(width as f32, height as f32), Sense::drag());
        self.handle_canvas_pointer(ui, rect, &response);
        let tex_id = self.canvas_texture(ui);
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        ui.painter().image(tex_id, rect, uv, Color32::WHITE);
        ui.painter()
            .rect_stroke(rect, 0.0, style::outer_border(), StrokeKind::Outside);
        if response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
        }

        ui.add_space(8.0);
        let analyze = &self.controller.ui.analyze;
        if let Some(message) = analyze.upload_error.clone() {
            error_label(ui, &message);
        }
        if let Some(name) = analyze.decoding.clone() {
            ui.horizontal(|ui| {
                ui.spinner();
                muted_label(ui, &format!("Loading {name}…"));
            });
        }
        ui.horizontal(|ui| {
            let submitting = self.controller.is_analysis_submitting();
            let label = if submitting { "Analyzing…" } else { "Analyze" };
            if ui
                .add_enabled(!submitting, egui::Button::new(label))
                .clicked()
            {
                self.controller.submit_analysis();
            }
            if ui.button("Clear").clicked() {
                self.controller.clear_canvas();
            }
            if ui.button("Upload image…").clicked() {
                self.controller.upload_image_via_dialog();
            }
            if submitting {
                ui.spinner();
            }
        });
    }

    fn handle_canvas_pointer(&mut self, ui: &Ui, rect: egui::Rect, response: &egui::Response) {
        let to_canvas = |pos: egui::Pos2| Point::new(pos.x - rect.left(), pos.y - rect.top());
        if response.drag_started() {
            let origin = ui
                .input(|i| i.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos());
            let Some(origin) = origin else {
                return;
            };
            self.controller.pointer_down(to_canvas(origin));
            if let Some(pos) = response.interact_pointer_pos() {
                self.controller.pointer_move(to_canvas(pos));
            }
        } else if response.dragged() {
            if !response.contains_pointer() {
                self.controller.pointer_leave();
            } else if let Some(pos) = response.interact_pointer_pos() {
                self.controller.pointer_move(to_canvas(pos));
            }
        } else if response.drag_stopped() {
            self.controller.pointer_up();
        }
    }

    /// Upload the raster when it changed since the last frame.
    fn canvas_texture(&mut self, ui: &Ui) -> egui::TextureId {
        let raster = self.controller.surface().raster();
        let revision = raster.revision();
        if let Some(tex) = self.canvas_tex.as_ref()
            && self.canvas_revision == Some(revision)
        {
            return tex.id();
        }
        let size = [raster.width() as usize, raster.height() as usize];
        let image = ColorImage::from_rgba_unmultiplied(size, raster.as_rgba().as_raw());
        let tex = match self.canvas_tex.take() {
            Some(mut tex) if tex.size() == size => {
                tex.set(image, TextureOptions::LINEAR);
                tex
            }
            _ => ui
                .ctx()
                .load_texture("canvas_texture", image, TextureOptions::LINEAR),
        };
        let id = tex.id();
        self.canvas_tex = Some(tex);
        self.canvas_revision = Some(revision);
        id
    }
}
