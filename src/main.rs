//! Entry point for the egui-based Scry UI.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use eframe::egui;
use scry::config;
use scry::egui_app::state::View;
use scry::egui_app::ui::{EguiApp, MIN_VIEWPORT_SIZE};
use scry::logging::{self, LogTarget};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Some(view) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    if let Err(err) = logging::init(LogTarget::Desktop) {
        eprintln!("Logging disabled: {err}");
    }

    let viewport = egui::ViewportBuilder::default()
        .with_title("Scry")
        .with_inner_size([1040.0, 640.0])
        .with_min_inner_size(MIN_VIEWPORT_SIZE)
        .with_drag_and_drop(true);
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Scry",
        native_options,
        Box::new(move |_cc| {
            let app = config::load_or_default()
                .map_err(|err| format!("Failed to load config: {err}"))
                .and_then(|settings| EguiApp::new(&settings, view));
            match app {
                Ok(app) => Ok(Box::new(app) as Box<dyn eframe::App>),
                Err(message) => {
                    tracing::error!("{message}");
                    Ok(Box::new(LaunchError { message }) as Box<dyn eframe::App>)
                }
            }
        }),
    )?;
    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<Option<View>, String> {
    let mut view = View::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "--view" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--view requires a value".to_string())?;
                view = View::from_name(value);
            }
            unknown => {
                return Err(format!("Unknown argument: {unknown}\n\n{}", help_text()));
            }
        }
        idx += 1;
    }
    Ok(Some(view))
}

fn help_text() -> String {
    [
        "scry",
        "",
        "Draw or load handwriting and submit it for personality analysis.",
        "",
        "Usage:",
        "  scry [--view <analyze|ocr>]",
    ]
    .join("\n")
}

/// Minimal fallback app to display initialization errors.
struct LaunchError {
    message: String,
}

impl eframe::App for LaunchError {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Failed to start UI");
                ui.label(&self.message);
            });
        });
    }
}
