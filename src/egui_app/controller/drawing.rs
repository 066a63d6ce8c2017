use super::jobs::UploadDecodeResult;
use super::*;
use rfd::FileDialog;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff"];

impl AppController {
    pub fn pointer_down(&mut self, point: Point) {
        self.surface.pointer_down(point);
    }

    pub fn pointer_move(&mut self, point: Point) -> bool {
        self.surface.pointer_move(point)
    }

    pub fn pointer_up(&mut self) {
        self.surface.pointer_up();
    }

    pub fn pointer_leave(&mut self) {
        self.surface.pointer_leave();
    }

    /// Wipe the canvas and drop the displayed result; history is kept.
    pub fn clear_canvas(&mut self) {
        self.surface.clear();
        self.jobs.abandon_upload();
        self.ui.analyze.displayed = None;
        self.ui.analyze.error = None;
        self.ui.analyze.upload_error = None;
        self.ui.analyze.decoding = None;
    }

    pub fn pen(&self) -> Pen {
        self.surface.pen()
    }

    /// Ask the user for an image and load it into the canvas.
    pub fn upload_image_via_dialog(&mut self) {
        let Some(path) = FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
        else {
            return;
        };
        self.upload_image_from_path(&path);
    }

    /// Validate `path` now and decode it in the background.
    pub fn upload_image_from_path(&mut self, path: &Path) {
        match ImageUpload::from_path(path) {
            Ok(upload) => self.upload_image(upload),
            Err(err) => self.reject_upload(err),
        }
    }

    /// Start decoding an already-validated upload into the canvas.
    pub fn upload_image(&mut self, upload: ImageUpload) {
        self.ui.analyze.upload_error = None;
        self.ui.analyze.decoding = Some(upload.file_name.clone());
        let request_id = self.jobs.begin_upload_decode(upload);
        tracing::debug!(request_id, "Upload decode started");
    }

    fn reject_upload(&mut self, err: AcquisitionError) {
        tracing::info!("Upload rejected: {err}");
        self.ui.analyze.upload_error = Some(upload_error_message(&err));
    }

    pub(super) fn handle_upload_decoded(&mut self, message: UploadDecodeResult) {
        if !self.jobs.take_upload_if_current(message.request_id) {
            tracing::debug!(request_id = message.request_id, "Dropping stale upload");
            return;
        }
        self.ui.analyze.decoding = None;
        match message.result {
            Ok(image) => {
                self.surface.load_image(&image);
                tracing::info!(file = %message.file_name, "Upload loaded into canvas");
            }
            Err(err) => self.reject_upload(err),
        }
    }
}

fn upload_error_message(err: &AcquisitionError) -> String {
    match err {
        AcquisitionError::InvalidFileType { .. } | AcquisitionError::FileTooLarge { .. } => {
            err.to_string()
        }
        AcquisitionError::Read { .. } => "Could not read the selected file.".to_string(),
        AcquisitionError::Decode(_) => "Please upload a valid image.".to_string(),
    }
}
