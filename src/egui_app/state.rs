//! Plain UI state read by the renderer and written by the controller.

use crate::acquisition::ImageUpload;
use crate::session::AnalysisResult;

/// Which page the window shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Analyze,
    Ocr,
    /// An unknown view name, kept for the not-found panel.
    NotFound(String),
}

impl View {
    /// Resolve a view from its command-line name; matching ignores case.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "" | "analyze" => Self::Analyze,
            "ocr" => Self::Ocr,
            _ => Self::NotFound(name.trim().to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Analyze => "analyze",
            Self::Ocr => "ocr",
            Self::NotFound(name) => name.as_str(),
        }
    }
}

/// State behind the personality analysis page.
#[derive(Clone, Debug, Default)]
pub struct AnalyzeUiState {
    /// Result shown in the result panel; survives failed submissions.
    pub displayed: Option<AnalysisResult>,
    /// Inline error from the last submission.
    pub error: Option<String>,
    /// Inline error from the last upload attempt.
    pub upload_error: Option<String>,
    /// Name of the file currently being decoded into the canvas.
    pub decoding: Option<String>,
}

/// State behind the text recognition page.
#[derive(Clone, Debug, Default)]
pub struct OcrUiState {
    pub selected: Option<ImageUpload>,
    pub recognized_text: Option<String>,
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub view: View,
    pub analyze: AnalyzeUiState,
    pub ocr: OcrUiState,
}
