//! Application state and the operations the UI triggers on it.
//!
//! The controller is owned by the egui app and only touched from the UI
//! thread. Network requests and upload decoding run on background threads
//! and report back through [`AppController::poll_jobs`].

use std::path::Path;
use std::sync::Arc;

use crate::acquisition::{AcquisitionError, ImageUpload};
use crate::analysis::api::{ANALYZE_FAILURE_MESSAGE, OCR_FAILURE_MESSAGE, ServiceEndpoint};
use crate::canvas::{CanvasRaster, DrawingSurface, Pen, Point};
use crate::config::{AppSettings, ConfigError};
use crate::egui_app::state::{UiState, View};
use crate::session::{AnalysisResult, SessionHistory, Submission, captured_now};

mod analysis_submit;
mod drawing;
mod jobs;
mod ocr;
#[cfg(test)]
mod tests;

use jobs::{ControllerJobs, JobMessage};

/// Shown when the OCR trigger fires with nothing selected.
pub const OCR_NO_FILE_MESSAGE: &str = "Please select an image file first.";

/// Maintains app state and bridges core logic to the egui UI.
pub struct AppController {
    pub ui: UiState,
    surface: DrawingSurface,
    history: SessionHistory,
    analysis: Submission,
    ocr: Submission,
    endpoint: ServiceEndpoint,
    jobs: ControllerJobs,
}

impl AppController {
    pub fn new(endpoint: ServiceEndpoint, surface: DrawingSurface) -> Self {
        Self {
            ui: UiState::default(),
            surface,
            history: SessionHistory::new(),
            analysis: Submission::new(),
            ocr: Submission::new(),
            endpoint,
            jobs: ControllerJobs::new(),
        }
    }

    /// Build a controller from loaded settings.
    pub fn from_settings(settings: &AppSettings) -> Result<Self, ConfigError> {
        let endpoint = settings.endpoint()?;
        let pen = settings.pen()?;
        let raster = CanvasRaster::new(settings.canvas.width, settings.canvas.height);
        tracing::info!(
            service = endpoint.base_url(),
            width = raster.width(),
            height = raster.height(),
            "Controller ready"
        );
        Ok(Self::new(endpoint, DrawingSurface::new(raster, pen)))
    }

    pub fn surface(&self) -> &DrawingSurface {
        &self.surface
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn endpoint(&self) -> &ServiceEndpoint {
        &self.endpoint
    }

    pub fn view(&self) -> &View {
        &self.ui.view
    }

    pub fn set_view(&mut self, view: View) {
        if self.ui.view != view {
            tracing::debug!(view = view.name(), "Switching view");
            self.ui.view = view;
        }
    }

    /// True while any background job still owes the UI a result.
    pub fn is_busy(&self) -> bool {
        self.analysis.is_submitting() || self.ocr.is_submitting() || self.jobs.upload_pending()
    }

    /// Drain finished background jobs and apply their results.
    pub fn poll_jobs(&mut self) {
        while let Ok(message) = self.jobs.try_recv_message() {
            match message {
                JobMessage::AnalysisFinished(message) => self.handle_analysis_finished(message),
                JobMessage::OcrFinished(message) => self.handle_ocr_finished(message),
                JobMessage::UploadDecoded(message) => self.handle_upload_decoded(message),
            }
        }
    }
}
