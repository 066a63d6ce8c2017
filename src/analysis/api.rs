//! HTTP client for the handwriting analysis and OCR service.

use serde::Deserialize;
use serde_json::Value;

use super::multipart::MultipartForm;
use crate::acquisition::ImageUpload;
use crate::http_client;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_ANALYZE_PATH: &str = "/analyze";
pub const DEFAULT_OCR_PATH: &str = "/api/ocr-recognize";

/// Shown when a failed analysis carries no usable server message.
pub const SERVER_ERROR_FALLBACK: &str = "Server error";
/// Shown for analysis failures that never produced a server message.
pub const ANALYZE_FAILURE_MESSAGE: &str = "Failed to analyze handwriting.";
/// Shown for OCR failures without a server message.
pub const OCR_FAILURE_MESSAGE: &str = "Failed to process image. Check server status.";

const ANALYZE_FIELD: &str = "image";
const ANALYZE_FILE_NAME: &str = "handwriting.png";
const OCR_FIELD: &str = "handwriting_image";
const MAX_RESPONSE_BYTES: usize = 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("Invalid service URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Where the analysis service lives and which routes it exposes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceEndpoint {
    base_url: String,
    analyze_path: String,
    ocr_path: String,
}

impl ServiceEndpoint {
    /// Validate `base_url` (http or https) and use the default routes.
    pub fn new(base_url: &str) -> Result<Self, EndpointError> {
        let trimmed = base_url.trim();
        let invalid = |reason: String| EndpointError::InvalidUrl {
            url: trimmed.to_string(),
            reason,
        };
        let parsed = url::Url::parse(trimmed).map_err(|err| invalid(err.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", parsed.scheme())));
        }
        if parsed.cannot_be_a_base() || parsed.host_str().is_none() {
            return Err(invalid("missing host".to_string()));
        }
        Ok(Self {
            base_url: trimmed.trim_end_matches('/').to_string(),
            analyze_path: DEFAULT_ANALYZE_PATH.to_string(),
            ocr_path: DEFAULT_OCR_PATH.to_string(),
        })
    }

    pub fn with_paths(mut self, analyze_path: &str, ocr_path: &str) -> Self {
        self.analyze_path = analyze_path.trim().to_string();
        self.ocr_path = ocr_path.trim().to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn analyze_url(&self) -> String {
        join_url(&self.base_url, &self.analyze_path)
    }

    pub fn ocr_url(&self) -> String {
        join_url(&self.base_url, &self.ocr_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{base}/{}", path.trim_start_matches('/'))
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// The service answered with a non-success status.
    #[error("{0}")]
    ServiceError(String),
    /// No response arrived at all.
    #[error("Network error: {0}")]
    NetworkError(String),
    /// A success response whose body is not a JSON object.
    #[error("Invalid response: {0}")]
    ParseError(String),
}

impl AnalysisError {
    /// Text for the inline error area; server messages win over `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::ServiceError(message) if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Fields of a successful analysis response, before interpretation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnalysisResponse {
    pub class: Option<String>,
    pub confidence: Option<Value>,
    pub defect_description: Option<String>,
    pub image_url: Option<String>,
}

/// Submit a PNG-encoded handwriting sample for personality analysis.
pub fn analyze(endpoint: &ServiceEndpoint, png: &[u8]) -> Result<AnalysisResponse, AnalysisError> {
    let mut form = MultipartForm::new();
    form.add_file(ANALYZE_FIELD, ANALYZE_FILE_NAME, "image/png", png);
    let url = endpoint.analyze_url();
    tracing::info!(url = %url, bytes = png.len(), "Submitting handwriting for analysis");
    match post_form(&url, form)? {
        Reply::Success(body) => parse_analysis_response(&body),
        Reply::Failure { status, body } => {
            let message = error_message(&body, ErrorField::MessageFirst)
                .unwrap_or_else(|| SERVER_ERROR_FALLBACK.to_string());
            tracing::warn!(status, "Analysis request failed: {message}");
            Err(AnalysisError::ServiceError(message))
        }
    }
}

/// Submit a handwriting image for text recognition.
pub fn recognize_text(
    endpoint: &ServiceEndpoint,
    upload: &ImageUpload,
) -> Result<String, AnalysisError> {
    let mut form = MultipartForm::new();
    form.add_file(OCR_FIELD, &upload.file_name, &upload.media_type, &upload.bytes);
    let url = endpoint.ocr_url();
    tracing::info!(url = %url, bytes = upload.bytes.len(), "Submitting handwriting for OCR");
    match post_form(&url, form)? {
        Reply::Success(body) => parse_ocr_response(&body),
        Reply::Failure { status, body } => {
            let message = error_message(&body, ErrorField::ErrorFirst)
                .unwrap_or_else(|| OCR_FAILURE_MESSAGE.to_string());
            tracing::warn!(status, "OCR request failed: {message}");
            Err(AnalysisError::ServiceError(message))
        }
    }
}

/// Read a success body; missing fields are left for the interpreter to coerce.
pub fn parse_analysis_response(body: &str) -> Result<AnalysisResponse, AnalysisError> {
    let object = parse_object(body)?;
    let text = |key: &str| {
        object
            .get(key)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };
    Ok(AnalysisResponse {
        class: object.get("class").and_then(Value::as_str).map(str::to_string),
        confidence: object.get("confidence").cloned(),
        defect_description: text("defect_description"),
        image_url: text("image_url"),
    })
}

pub fn parse_ocr_response(body: &str) -> Result<String, AnalysisError> {
    let object = parse_object(body)?;
    Ok(object
        .get("recognized_text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string())
}

fn parse_object(body: &str) -> Result<serde_json::Map<String, Value>, AnalysisError> {
    let trimmed = body.trim();
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(other) => Err(AnalysisError::ParseError(format!(
            "expected a JSON object, got {other}"
        ))),
        Err(err) => Err(AnalysisError::ParseError(err.to_string())),
    }
}

#[derive(Clone, Copy)]
enum ErrorField {
    MessageFirst,
    ErrorFirst,
}

#[derive(Deserialize)]
struct ErrorWire {
    error: Option<String>,
    message: Option<String>,
}

fn error_message(body: &str, order: ErrorField) -> Option<String> {
    let wire: ErrorWire = serde_json::from_str(body.trim()).ok()?;
    let (first, second) = match order {
        ErrorField::MessageFirst => (wire.message, wire.error),
        ErrorField::ErrorFirst => (wire.error, wire.message),
    };
    [first, second]
        .into_iter()
        .flatten()
        .map(|message| message.trim().to_string())
        .find(|message| !message.is_empty())
}

enum Reply {
    Success(String),
    Failure { status: u16, body: String },
}

fn post_form(url: &str, form: MultipartForm) -> Result<Reply, AnalysisError> {
    let (content_type, body) = form.finish();
    let request = http_client::agent()
        .post(url)
        .set("Accept", "application/json")
        .set("Content-Type", &content_type);
    match request.send_bytes(&body) {
        Ok(response) if (200..300).contains(&response.status()) => {
            http_client::read_response_text(response, MAX_RESPONSE_BYTES)
                .map(Reply::Success)
                .map_err(|err| match err.kind() {
                    std::io::ErrorKind::InvalidData => AnalysisError::ParseError(err.to_string()),
                    _ => AnalysisError::NetworkError(err.to_string()),
                })
        }
        Ok(response) => Ok(failure_reply(response.status(), response)),
        Err(ureq::Error::Status(status, response)) => Ok(failure_reply(status, response)),
        Err(ureq::Error::Transport(err)) => {
            tracing::warn!("Request to {url} failed: {err}");
            Err(AnalysisError::NetworkError(err.to_string()))
        }
    }
}

fn failure_reply(status: u16, response: ureq::Response) -> Reply {
    let body = http_client::read_response_text(response, MAX_RESPONSE_BYTES).unwrap_or_default();
    Reply::Failure { status, body }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn endpoint_joins_routes_onto_base() {
        let endpoint = ServiceEndpoint::new("http://127.0.0.1:5000/").unwrap();
        assert_eq!(endpoint.analyze_url(), "http://127.0.0.1:5000/analyze");
        assert_eq!(endpoint.ocr_url(), "http://127.0.0.1:5000/api/ocr-recognize");
        let endpoint = ServiceEndpoint::new("https://example.test/svc")
            .unwrap()
            .with_paths("upload_and_analyze", "/ocr");
        assert_eq!(endpoint.analyze_url(), "https://example.test/svc/upload_and_analyze");
        assert_eq!(endpoint.ocr_url(), "https://example.test/svc/ocr");
    }

    #[test]
    fn endpoint_rejects_bad_urls() {
        assert!(ServiceEndpoint::new("not a url").is_err());
        assert!(ServiceEndpoint::new("ftp://example.test").is_err());
        assert!(ServiceEndpoint::new("mailto:someone@example.test").is_err());
    }

    #[test]
    fn parses_full_analysis_response() {
        let body = r#"{"class":"Extraversion_1","confidence":"0.92","defect_description":"Slanted","image_url":"http://x/y.png"}"#;
        let parsed = parse_analysis_response(body).unwrap();
        assert_eq!(parsed.class.as_deref(), Some("Extraversion_1"));
        assert_eq!(parsed.confidence, Some(json!("0.92")));
        assert_eq!(parsed.defect_description.as_deref(), Some("Slanted"));
        assert_eq!(parsed.image_url.as_deref(), Some("http://x/y.png"));
    }

    #[test]
    fn missing_fields_are_tolerated() {
        let parsed = parse_analysis_response(r#"{"defect_description":""}"#).unwrap();
        assert_eq!(parsed, AnalysisResponse::default());
    }

    #[test]
    fn non_object_success_body_is_a_parse_error() {
        assert!(matches!(
            parse_analysis_response("<html>oops</html>"),
            Err(AnalysisError::ParseError(_))
        ));
        assert!(matches!(
            parse_analysis_response("[1,2]"),
            Err(AnalysisError::ParseError(_))
        ));
    }

    #[test]
    fn ocr_response_defaults_to_empty_text() {
        assert_eq!(parse_ocr_response(r#"{"recognized_text":"hello"}"#).unwrap(), "hello");
        assert_eq!(parse_ocr_response("{}").unwrap(), "");
    }

    #[test]
    fn error_message_prefers_requested_field() {
        let body = r#"{"error":"bad image","message":"try again"}"#;
        assert_eq!(
            error_message(body, ErrorField::MessageFirst).as_deref(),
            Some("try again")
        );
        assert_eq!(
            error_message(body, ErrorField::ErrorFirst).as_deref(),
            Some("bad image")
        );
        assert_eq!(
            error_message(r#"{"error":"No image uploaded"}"#, ErrorField::MessageFirst).as_deref(),
            Some("No image uploaded")
        );
    }

    #[test]
    fn unusable_error_bodies_yield_none() {
        for body in ["", "Internal Server Error", r#"{"message":"  "}"#, r#"{"error":42}"#] {
            assert_eq!(error_message(body, ErrorField::MessageFirst), None, "{body}");
        }
    }

    #[test]
    fn user_message_falls_back_for_transport_failures() {
        let service = AnalysisError::ServiceError("Model offline".to_string());
        assert_eq!(service.user_message(ANALYZE_FAILURE_MESSAGE), "Model offline");
        let network = AnalysisError::NetworkError("connection refused".to_string());
        assert_eq!(network.user_message(ANALYZE_FAILURE_MESSAGE), ANALYZE_FAILURE_MESSAGE);
        let empty = AnalysisError::ServiceError(String::new());
        assert_eq!(empty.user_message(ANALYZE_FAILURE_MESSAGE), ANALYZE_FAILURE_MESSAGE);
    }

    #[test]
    fn unreachable_service_is_a_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let endpoint = ServiceEndpoint::new(&format!("http://{addr}")).unwrap();
        let err = analyze(&endpoint, b"png").unwrap_err();
        assert!(matches!(err, AnalysisError::NetworkError(_)));
    }
}
