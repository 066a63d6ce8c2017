//! Desktop UI: controller state, background jobs and the egui renderer.

/// Application state and the operations behind every button.
pub mod controller;
/// Plain UI state shared between controller and renderer.
pub mod state;
/// egui rendering.
pub mod ui;
