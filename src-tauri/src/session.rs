//! Page-level state for one upload cycle.
//!
//! Each `begin` hands out a `Ticket`. Only the ticket from the most recent
//! `begin` may finish the cycle; `reset` and newer uploads invalidate older ones.

use crate::proxy::ProxyResponse;
use crate::types::ProcessingResult;
use crate::upload::{SelectedFile, UploadRejection};
use crate::views::ResultPage;
use serde::Serialize;
use serde_json::Value;

const PROCESSING_FAILED: &str = "Processing failed";
const SOMETHING_WENT_WRONG: &str = "Something went wrong";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Processing,
    Done,
    Failed,
}

/// Serializable view of the session pushed to the webview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    /// Bumped by every upload and reset, so the webview can tell cycles apart.
    pub generation: u64,
    pub phase: Phase,
    pub file_name: Option<String>,
    /// The data URL itself is fetched once per cycle through `get_preview`.
    pub has_preview: bool,
    pub error: Option<String>,
    /// Upload widget message; independent of `phase`.
    pub rejection: Option<String>,
    pub can_retry: bool,
    pub page: Option<ResultPage>,
}

#[derive(Debug, Default)]
pub struct Session {
    generation: u64,
    file_name: Option<String>,
    preview: Option<String>,
    last_file: Option<SelectedFile>,
    processing: bool,
    result: Option<ProcessingResult>,
    error: Option<String>,
    rejection: Option<String>,
    ocr_expanded: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new cycle for `file`, superseding whatever was in flight.
    pub fn begin(&mut self, file: SelectedFile) -> Ticket {
        self.generation += 1;
        self.processing = true;
        self.result = None;
        self.error = None;
        self.rejection = None;
        self.ocr_expanded = false;
        self.file_name = Some(file.name.clone());
        self.preview = file.preview_url();
        self.last_file = Some(file);
        Ticket(self.generation)
    }

    /// Apply an outcome. Returns `false` (and changes nothing) for a stale ticket.
    pub fn finish(&mut self, ticket: Ticket, outcome: Result<ProcessingResult, String>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.processing = false;
        match outcome {
            Ok(result) => self.result = Some(result),
            Err(message) => self.error = Some(message),
        }
        true
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.processing && ticket.0 == self.generation
    }

    /// Back to the empty page. Any outstanding ticket becomes stale.
    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = Self {
            generation,
            ..Self::default()
        };
    }

    pub fn reject(&mut self, rejection: &UploadRejection) {
        self.rejection = Some(rejection.to_string());
    }

    pub fn retry_file(&self) -> Option<SelectedFile> {
        self.last_file.clone()
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn result(&self) -> Option<&ProcessingResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn set_ocr_expanded(&mut self, expanded: bool) {
        self.ocr_expanded = expanded;
    }

    pub fn phase(&self) -> Phase {
        if self.processing {
            Phase::Processing
        } else if self.result.is_some() {
            Phase::Done
        } else if self.error.is_some() {
            Phase::Failed
        } else {
            Phase::Idle
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let phase = self.phase();
        let page = match (phase, &self.result) {
            (Phase::Done, Some(result)) => Some(ResultPage::render(
                self.file_name.as_deref().unwrap_or_default(),
                self.preview.is_some(),
                result,
                self.ocr_expanded,
            )),
            _ => None,
        };
        SessionSnapshot {
            generation: self.generation,
            phase,
            file_name: self.file_name.clone(),
            has_preview: self.preview.is_some(),
            error: self.error.clone(),
            rejection: self.rejection.clone(),
            can_retry: phase == Phase::Failed && self.last_file.is_some(),
            page,
        }
    }
}

/// Turn a proxy response into a result or a user-facing message.
pub fn interpret(response: ProxyResponse) -> Result<ProcessingResult, String> {
    if !response.is_success() {
        if !response.body.is_object() {
            return Err(PROCESSING_FAILED.to_string());
        }
        return Err(match response.body.get("detail") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Null) | Some(Value::String(_)) | None => {
                format!("Server error: {}", response.status)
            }
            Some(other) => other.to_string(),
        });
    }
    serde_json::from_value(response.body).map_err(|e| {
        tracing::error!("Unexpected result payload: {}", e);
        SOMETHING_WENT_WRONG.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn png(name: &str) -> SelectedFile {
        SelectedFile {
            name: name.to_string(),
            mime: "image/png".to_string(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }
    }

    fn result(document_type: &str) -> ProcessingResult {
        ProcessingResult {
            document_type: document_type.to_string(),
            confidence: 0.9,
            ocr_text: "text".to_string(),
            extracted_fields: Vec::new(),
            processing_time_ms: 10,
        }
    }

    #[test]
    fn begin_then_finish_shows_result() {
        let mut session = Session::new();
        let ticket = session.begin(png("a.png"));
        assert_eq!(session.phase(), Phase::Processing);
        assert!(session.snapshot().has_preview);
        assert!(session.preview().unwrap().starts_with("data:image/png;base64,"));

        assert!(session.finish(ticket, Ok(result("invoice"))));
        let snap = session.snapshot();
        assert_eq!(snap.phase, Phase::Done);
        assert_eq!(snap.page.unwrap().title, "Results for a.png");
        assert!(!snap.can_retry);
    }

    #[test]
    fn snapshot_leaves_preview_bytes_out() {
        let mut session = Session::new();
        let ticket = session.begin(png("a.png"));
        session.finish(ticket, Ok(result("invoice")));
        let snap = session.snapshot();
        assert_eq!(snap.generation, 1);
        assert!(snap.has_preview);
        assert!(!snap.page.as_ref().unwrap().classification_full_width);

        let json = serde_json::to_string(&snap).unwrap();
        assert!(!json.contains("data:image"));
        assert!(json.contains("\"has_preview\":true"));
    }

    #[test]
    fn generation_advances_on_begin_and_reset() {
        let mut session = Session::new();
        assert_eq!(session.snapshot().generation, 0);
        session.begin(png("a.png"));
        session.reset();
        assert_eq!(session.snapshot().generation, 2);
        assert!(!session.snapshot().has_preview);
        assert!(session.preview().is_none());
    }

    #[test]
    fn stale_ticket_cannot_overwrite_newer_upload() {
        let mut session = Session::new();
        let old = session.begin(png("old.png"));
        let new = session.begin(png("new.png"));

        assert!(!session.finish(old, Ok(result("memo"))));
        assert!(session.is_processing());

        assert!(session.finish(new, Ok(result("receipt"))));
        assert!(!session.finish(old, Err("late".to_string())));
        assert_eq!(session.result().unwrap().document_type, "receipt");
        assert!(session.error().is_none());
    }

    #[test]
    fn reset_invalidates_in_flight_ticket() {
        let mut session = Session::new();
        let ticket = session.begin(png("a.png"));
        session.reset();
        assert!(!session.finish(ticket, Ok(result("invoice"))));
        assert_eq!(session.snapshot().phase, Phase::Idle);
        assert!(session.retry_file().is_none());
    }

    #[test]
    fn failure_allows_retry_of_same_file() {
        let mut session = Session::new();
        let ticket = session.begin(png("a.png"));
        session.finish(ticket, Err("Backend returned 500".to_string()));
        let snap = session.snapshot();
        assert_eq!(snap.phase, Phase::Failed);
        assert_eq!(snap.error.as_deref(), Some("Backend returned 500"));
        assert!(snap.can_retry);
        assert_eq!(session.retry_file().unwrap().name, "a.png");
    }

    #[test]
    fn rejection_leaves_page_alone() {
        let mut session = Session::new();
        let ticket = session.begin(png("a.png"));
        session.finish(ticket, Ok(result("invoice")));
        session.reject(&UploadRejection::TooLarge);
        let snap = session.snapshot();
        assert_eq!(snap.phase, Phase::Done);
        assert_eq!(
            snap.rejection.as_deref(),
            Some("File exceeds 10MB limit. Please use a smaller file.")
        );
    }

    #[test]
    fn interpret_relays_detail_verbatim() {
        let response = ProxyResponse::error(422, "Unsupported file type: text/plain");
        assert_eq!(interpret(response).unwrap_err(), "Unsupported file type: text/plain");
    }

    #[test]
    fn interpret_fallbacks() {
        let not_an_object = ProxyResponse {
            status: 500,
            body: Value::Null,
        };
        assert_eq!(interpret(not_an_object).unwrap_err(), PROCESSING_FAILED);

        let no_detail = ProxyResponse {
            status: 500,
            body: json!({}),
        };
        assert_eq!(interpret(no_detail).unwrap_err(), "Server error: 500");

        let empty_detail = ProxyResponse {
            status: 503,
            body: json!({"detail": ""}),
        };
        assert_eq!(interpret(empty_detail).unwrap_err(), "Server error: 503");

        let bad_shape = ProxyResponse::ok(json!({"document_type": 7}));
        assert_eq!(interpret(bad_shape).unwrap_err(), SOMETHING_WENT_WRONG);
    }

    #[test]
    fn interpret_decodes_success() {
        let body = serde_json::to_value(result("form")).unwrap();
        assert_eq!(interpret(ProxyResponse::ok(body)).unwrap().document_type, "form");
    }
}
