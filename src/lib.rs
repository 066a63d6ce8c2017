//! Library exports for the desktop client, the CLI and integration tests.
/// Image upload validation and decoding.
pub mod acquisition;
/// Client for the handwriting analysis service and result interpretation.
pub mod analysis;
/// Application directory resolution.
pub mod app_dirs;
/// Drawing canvas: pixel raster and stroke capture.
pub mod canvas;
/// TOML settings.
pub mod config;
/// Shared egui UI modules.
pub mod egui_app;
/// Shared HTTP agent.
pub(crate) mod http_client;
/// Logging setup.
pub mod logging;
/// Session history and the submission guard.
pub mod session;
