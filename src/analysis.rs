//! Submission of handwriting samples to the remote service and interpretation
//! of its answers.

pub mod api;
pub mod interpret;
pub mod multipart;

pub use api::{AnalysisError, AnalysisResponse, ServiceEndpoint};
pub use interpret::{Interpretation, Personality, coerce_confidence, interpret};
