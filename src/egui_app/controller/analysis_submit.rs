use super::jobs::AnalysisJobResult;
use super::*;

impl AppController {
    pub fn is_analysis_submitting(&self) -> bool {
        self.analysis.is_submitting()
    }

    /// Encode the canvas and submit it for analysis.
    ///
    /// Ignored while another analysis is outstanding.
    pub fn submit_analysis(&mut self) {
        if self.analysis.is_submitting() {
            tracing::debug!("Analysis already in flight; ignoring trigger");
            return;
        }
        let png = match self.surface.raster().encode_png() {
            Ok(png) => Arc::<[u8]>::from(png),
            Err(err) => {
                tracing::error!("Failed to encode canvas: {err}");
                self.ui.analyze.error = Some(ANALYZE_FAILURE_MESSAGE.to_string());
                return;
            }
        };
        if self.analysis.begin().is_err() {
            return;
        }
        self.ui.analyze.error = None;
        self.jobs.begin_analysis(self.endpoint.clone(), png);
    }

    pub(super) fn handle_analysis_finished(&mut self, message: AnalysisJobResult) {
        match message.result {
            Ok(response) => {
                if !self.analysis.succeed() {
                    return;
                }
                let result = AnalysisResult::from_response(response, message.png, captured_now());
                tracing::info!(
                    personality = %result.personality,
                    confidence = result.confidence,
                    "Analysis finished"
                );
                self.history.record(result.clone());
                self.ui.analyze.displayed = Some(result);
                self.ui.analyze.error = None;
            }
            Err(err) => {
                if !self.analysis.fail() {
                    return;
                }
                tracing::warn!("Analysis failed: {err}");
                self.ui.analyze.error = Some(err.user_message(ANALYZE_FAILURE_MESSAGE));
            }
        }
    }

    /// Delete a history row; out-of-range indices are ignored.
    pub fn remove_history_entry(&mut self, index: usize) {
        if let Some(removed) = self.history.remove(index) {
            tracing::debug!(id = removed.id(), "History entry removed");
        }
    }
}
