//! Per-session state: the analysis history and the request lifecycle guard.

mod history;
mod result;
mod submission;

pub use history::SessionHistory;
pub use result::{AnalysisResult, NO_NOTES, captured_now};
pub use submission::{Submission, SubmissionBusy, SubmissionOutcome, SubmissionPhase};
