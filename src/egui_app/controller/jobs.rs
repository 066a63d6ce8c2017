use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use image::RgbaImage;

use crate::acquisition::{AcquisitionError, ImageUpload};
use crate::analysis::api::{self, AnalysisError, AnalysisResponse, ServiceEndpoint};

type TryRecvError = std::sync::mpsc::TryRecvError;

pub(crate) enum JobMessage {
    AnalysisFinished(AnalysisJobResult),
    OcrFinished(OcrJobResult),
    UploadDecoded(UploadDecodeResult),
}

#[derive(Debug)]
pub(crate) struct AnalysisJobResult {
    pub(crate) png: Arc<[u8]>,
    pub(crate) result: Result<AnalysisResponse, AnalysisError>,
}

#[derive(Debug)]
pub(crate) struct OcrJobResult {
    pub(crate) file_name: String,
    pub(crate) result: Result<String, AnalysisError>,
}

#[derive(Debug)]
pub(crate) struct UploadDecodeResult {
    pub(crate) request_id: u64,
    pub(crate) file_name: String,
    pub(crate) result: Result<RgbaImage, AcquisitionError>,
}

/// Background work for the controller: one thread per job, results over one channel.
pub(crate) struct ControllerJobs {
    message_tx: Sender<JobMessage>,
    message_rx: Receiver<JobMessage>,
    next_upload_request_id: u64,
    pending_upload: Option<u64>,
}

impl ControllerJobs {
    pub(super) fn new() -> Self {
        let (message_tx, message_rx) = std::sync::mpsc::channel::<JobMessage>();
        Self {
            message_tx,
            message_rx,
            next_upload_request_id: 1,
            pending_upload: None,
        }
    }

    pub(super) fn try_recv_message(&self) -> Result<JobMessage, TryRecvError> {
        self.message_rx.try_recv()
    }

    pub(super) fn upload_pending(&self) -> bool {
        self.pending_upload.is_some()
    }

    /// True when `request_id` belongs to the most recent upload; clears it.
    pub(super) fn take_upload_if_current(&mut self, request_id: u64) -> bool {
        if self.pending_upload == Some(request_id) {
            self.pending_upload = None;
            true
        } else {
            false
        }
    }

    /// Forget the outstanding upload so its result is dropped on arrival.
    pub(super) fn abandon_upload(&mut self) {
        self.pending_upload = None;
    }

    pub(super) fn begin_analysis(&self, endpoint: ServiceEndpoint, png: Arc<[u8]>) {
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = api::analyze(&endpoint, &png);
            let _ = tx.send(JobMessage::AnalysisFinished(AnalysisJobResult { png, result }));
        });
    }

    pub(super) fn begin_ocr(&self, endpoint: ServiceEndpoint, upload: ImageUpload) {
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = api::recognize_text(&endpoint, &upload);
            let _ = tx.send(JobMessage::OcrFinished(OcrJobResult {
                file_name: upload.file_name,
                result,
            }));
        });
    }

    /// Decode `upload` off the UI thread; returns the request id for this decode.
    pub(super) fn begin_upload_decode(&mut self, upload: ImageUpload) -> u64 {
        let request_id = self.next_upload_request_id;
        self.next_upload_request_id = self.next_upload_request_id.wrapping_add(1).max(1);
        self.pending_upload = Some(request_id);
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = upload.decode();
            if let Err(err) = &result {
                tracing::warn!("Failed to decode {}: {err}", upload.file_name);
            }
            let _ = tx.send(JobMessage::UploadDecoded(UploadDecodeResult {
                request_id,
                file_name: upload.file_name,
                result,
            }));
        });
        request_id
    }
}
