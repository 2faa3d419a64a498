use super::classification::ClassificationView;
use super::fields::{ExtractedFieldsView, KeyFieldsView};
use super::ocr_text::OcrTextView;
use crate::types::ProcessingResult;
use serde::Serialize;

/// Everything the results section needs, laid out top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultPage {
    pub title: String,
    /// The classification card spans both columns when there is no preview.
    pub classification_full_width: bool,
    pub classification: ClassificationView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_fields: Option<KeyFieldsView>,
    pub extracted_fields: ExtractedFieldsView,
    pub ocr_text: OcrTextView,
}

impl ResultPage {
    pub fn render(
        file_name: &str,
        has_preview: bool,
        result: &ProcessingResult,
        ocr_expanded: bool,
    ) -> Self {
        Self {
            title: format!("Results for {}", file_name),
            classification_full_width: !has_preview,
            classification: ClassificationView::from_result(result),
            key_fields: KeyFieldsView::from_fields(&result.extracted_fields),
            extracted_fields: ExtractedFieldsView::from_fields(&result.extracted_fields),
            ocr_text: OcrTextView::new(&result.ocr_text, ocr_expanded),
        }
    }
}
