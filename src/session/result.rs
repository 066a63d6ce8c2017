use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use time::{OffsetDateTime, format_description::FormatItem, macros::format_description};

use crate::analysis::api::AnalysisResponse;
use crate::analysis::interpret::{Personality, coerce_confidence, interpret};

/// Note shown when the service sends no description of its own.
pub const NO_NOTES: &str = "No additional notes.";

const CAPTURED_AT_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

static NEXT_RESULT_ID: AtomicU64 = AtomicU64::new(1);

/// One interpreted analysis, immutable once built.
#[derive(Clone, Debug)]
pub struct AnalysisResult {
    id: u64,
    pub personality: Personality,
    pub description: &'static str,
    /// Raw score from the service; may lie outside `[0, 1]`.
    pub confidence: f64,
    pub note: String,
    pub image_url: Option<String>,
    /// PNG bytes that were submitted.
    pub source_image: Arc<[u8]>,
    pub captured_at: OffsetDateTime,
}

impl AnalysisResult {
    pub fn from_response(
        response: AnalysisResponse,
        source_image: Arc<[u8]>,
        captured_at: OffsetDateTime,
    ) -> Self {
        let interpretation = interpret(response.class.as_deref());
        Self {
            id: NEXT_RESULT_ID.fetch_add(1, Ordering::Relaxed),
            personality: interpretation.personality,
            description: interpretation.description,
            confidence: coerce_confidence(response.confidence.as_ref()),
            note: response
                .defect_description
                .unwrap_or_else(|| NO_NOTES.to_string()),
            image_url: response.image_url,
            source_image,
            captured_at,
        }
    }

    /// Process-unique identifier, stable for the lifetime of the result.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn confidence_percent(&self) -> f64 {
        self.confidence * 100.0
    }

    /// Fill fraction for a confidence bar; only the drawing is clamped.
    pub fn confidence_bar_fraction(&self) -> f32 {
        self.confidence.clamp(0.0, 1.0) as f32
    }

    pub fn confidence_label(&self) -> String {
        format!("{:.1}%", self.confidence_percent())
    }

    /// `"Openness - 87.0%"`, as shown in history rows.
    pub fn summary(&self) -> String {
        format!("{} - {}", self.personality, self.confidence_label())
    }

    pub fn captured_at_label(&self) -> String {
        self.captured_at
            .format(CAPTURED_AT_FORMAT)
            .unwrap_or_else(|_| self.captured_at.to_string())
    }
}

/// Current wall-clock time in the local offset, or UTC when it is unknown.
pub fn captured_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
