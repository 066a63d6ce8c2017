//! Loading handwriting images from files into the drawing surface.
//!
//! Uploads are validated on their declared media type and size before any
//! bytes are decoded. A rejected or undecodable upload never touches the
//! raster.

use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};

use crate::canvas::DrawingSurface;

/// Largest accepted upload, in bytes (5 MB).
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;
const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    #[error("Please upload a valid image.")]
    InvalidFileType { media_type: String },
    #[error("File must be smaller than 5MB")]
    FileTooLarge { size: u64 },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Check an upload's declared media type and size.
pub fn validate_upload(media_type: &str, size: u64) -> Result<(), AcquisitionError> {
    if !media_type.starts_with("image/") {
        return Err(AcquisitionError::InvalidFileType {
            media_type: media_type.to_string(),
        });
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(AcquisitionError::FileTooLarge { size });
    }
    Ok(())
}

/// Media type implied by a file's extension.
pub fn media_type_for_path(path: &Path) -> &'static str {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MEDIA_TYPE)
}

/// A validated image file, held in memory until it is decoded or submitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Validate and read an image file; the size check happens before reading.
    pub fn from_path(path: &Path) -> Result<Self, AcquisitionError> {
        let media_type = media_type_for_path(path);
        let metadata = std::fs::metadata(path).map_err(|source| AcquisitionError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        validate_upload(media_type, metadata.len())?;
        let bytes = std::fs::read(path).map_err(|source| AcquisitionError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        // The file may have grown between the metadata call and the read.
        validate_upload(media_type, bytes.len() as u64)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self {
            file_name,
            media_type: media_type.to_string(),
            bytes,
        })
    }

    /// Validate an in-memory upload with an explicitly declared media type.
    pub fn from_bytes(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, AcquisitionError> {
        let media_type = media_type.into();
        validate_upload(&media_type, bytes.len() as u64)?;
        Ok(Self {
            file_name: file_name.into(),
            media_type,
            bytes,
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Decode the upload into RGBA pixels.
    pub fn decode(&self) -> Result<RgbaImage, AcquisitionError> {
        Ok(image::load_from_memory(&self.bytes)?.to_rgba8())
    }
}

/// Decode `upload` and draw it scaled into the surface, replacing its content.
pub fn acquire_into(
    surface: &mut DrawingSurface,
    upload: &ImageUpload,
) -> Result<(), AcquisitionError> {
    let decoded = upload.decode()?;
    surface.load_image(&decoded);
    tracing::debug!(
        file = %upload.file_name,
        width = decoded.width(),
        height = decoded.height(),
        "Upload drawn into canvas"
    );
    Ok(())
}
