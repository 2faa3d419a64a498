use serde::Serialize;

const EMPTY_TEXT: &str = "No text extracted";

/// Collapsible raw OCR transcript panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OcrTextView {
    pub char_count: usize,
    pub expanded: bool,
    pub body: String,
}

impl OcrTextView {
    pub fn new(text: &str, expanded: bool) -> Self {
        Self {
            char_count: text.chars().count(),
            expanded,
            body: if text.is_empty() {
                EMPTY_TEXT.to_string()
            } else {
                text.to_string()
            },
        }
    }
}
