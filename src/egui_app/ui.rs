//! egui renderer for the application UI.

use std::collections::HashMap;
use std::time::Duration;

use eframe::egui::{self, Color32, RichText, TextureHandle};

use crate::config::AppSettings;
use crate::egui_app::controller::AppController;
use crate::egui_app::state::View;

mod canvas_view;
mod history_panel;
mod not_found;
mod ocr_view;
mod result_panel;
pub mod style;

/// Smallest window size that still fits the canvas next to the history.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(760.0, 560.0);
const BUSY_REPAINT_INTERVAL: Duration = Duration::from_millis(50);

/// Renders the egui UI using the shared controller state.
pub struct EguiApp {
    controller: AppController,
    visuals_set: bool,
    canvas_tex: Option<TextureHandle>,
    canvas_revision: Option<u64>,
    thumbnails: HashMap<u64, TextureHandle>,
}

impl EguiApp {
    /// Create the app from loaded settings, starting on `view`.
    pub fn new(settings: &AppSettings, view: View) -> Result<Self, String> {
        let mut controller = AppController::from_settings(settings)
            .map_err(|err| format!("Failed to load config: {err}"))?;
        controller.set_view(view);
        Ok(Self::with_controller(controller))
    }

    pub fn with_controller(controller: AppController) -> Self {
        Self {
            controller,
            visuals_set: false,
            canvas_tex: None,
            canvas_revision: None,
            thumbnails: HashMap::new(),
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::top("top_bar")
            .frame(style::bar_frame())
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Scry").strong().color(palette.accent_violet));
                    ui.separator();
                    for (view, label) in [(View::Analyze, "Personality"), (View::Ocr, "Text recognition")] {
                        let selected = self.controller.view() == &view;
                        if ui.selectable_label(selected, label).clicked() {
                            self.controller.set_view(view);
                        }
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            RichText::new(self.controller.endpoint().base_url())
                                .small()
                                .color(palette.text_muted),
                        );
                    });
                });
            });
    }

    fn render_analyze(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("history_panel")
            .resizable(true)
            .default_width(260.0)
            .frame(style::section_frame())
            .show(ctx, |ui| self.render_history(ui));
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal_top(|ui| {
                ui.vertical(|ui| self.render_canvas(ui));
                ui.add_space(16.0);
                ui.vertical(|ui| self.render_result(ui));
            });
        });
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.controller.poll_jobs();
        self.render_top_bar(ctx);
        match self.controller.view().clone() {
            View::Analyze => self.render_analyze(ctx),
            View::Ocr => {
                egui::CentralPanel::default().show(ctx, |ui| self.render_ocr(ui));
            }
            View::NotFound(name) => {
                egui::CentralPanel::default().show(ctx, |ui| self.render_not_found(ui, &name));
            }
        }
        if self.controller.is_busy() {
            ctx.request_repaint_after(BUSY_REPAINT_INTERVAL);
        }
    }
}

fn error_label(ui: &mut egui::Ui, message: &str) {
    ui.label(RichText::new(message).color(style::palette().warning));
}

fn muted_label(ui: &mut egui::Ui, message: &str) {
    ui.label(RichText::new(message).color(style::palette().text_muted));
}

fn heading(ui: &mut egui::Ui, text: &str) {
    ui.label(RichText::new(text).heading().color(Color32::WHITE));
}
