use serde::{Deserialize, Serialize};

/// Single labeled value pulled out of the document by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedField {
    pub field: String,
    pub value: String,
    pub confidence: f64,
}

/// Backend `/process` reply: classification, OCR transcript and extracted fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub document_type: String,
    pub confidence: f64,
    pub ocr_text: String,
    #[serde(default)]
    pub extracted_fields: Vec<ExtractedField>,
    pub processing_time_ms: u64,
}

/// Error body relayed to the page on any non-success response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub models_loaded: bool,
}
