use super::jobs::OcrJobResult;
use super::*;
use rfd::FileDialog;

impl AppController {
    pub fn is_ocr_submitting(&self) -> bool {
        self.ocr.is_submitting()
    }

    pub fn pick_ocr_file_via_dialog(&mut self) {
        let Some(path) = FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "gif", "bmp", "webp"])
            .pick_file()
        else {
            return;
        };
        self.select_ocr_file(&path);
    }

    /// Validate and hold `path` for the next OCR submission.
    pub fn select_ocr_file(&mut self, path: &Path) {
        match ImageUpload::from_path(path) {
            Ok(upload) => {
                self.ui.ocr.selected = Some(upload);
                self.ui.ocr.error = None;
            }
            Err(err) => {
                tracing::info!("OCR file rejected: {err}");
                self.ui.ocr.selected = None;
                self.ui.ocr.error = Some(match err {
                    AcquisitionError::Read { .. } => "Could not read the selected file.".to_string(),
                    other => other.to_string(),
                });
            }
        }
    }

    pub fn submit_ocr(&mut self) {
        let Some(upload) = self.ui.ocr.selected.clone() else {
            self.ui.ocr.error = Some(OCR_NO_FILE_MESSAGE.to_string());
            return;
        };
        if self.ocr.begin().is_err() {
            tracing::debug!("OCR already in flight; ignoring trigger");
            return;
        }
        self.ui.ocr.error = None;
        self.ui.ocr.recognized_text = None;
        self.jobs.begin_ocr(self.endpoint.clone(), upload);
    }

    pub(super) fn handle_ocr_finished(&mut self, message: OcrJobResult) {
        match message.result {
            Ok(text) => {
                if !self.ocr.succeed() {
                    return;
                }
                tracing::info!(file = %message.file_name, chars = text.len(), "OCR finished");
                self.ui.ocr.recognized_text = Some(text);
            }
            Err(err) => {
                if !self.ocr.fail() {
                    return;
                }
                tracing::warn!(file = %message.file_name, "OCR failed: {err}");
                self.ui.ocr.error = Some(err.user_message(OCR_FAILURE_MESSAGE));
            }
        }
    }
}
