//! Presentational view models for a processing result.
//!
//! Everything here is a pure function of the result payload; the webview only
//! maps these structs onto markup.

mod classification;
mod confidence;
mod fields;
mod ocr_text;
mod page;

pub use classification::{document_type_label, ClassificationView};
pub use confidence::{percent, ConfidenceTier};
pub use fields::{ExtractedFieldRow, ExtractedFieldsView, KeyFieldCard, KeyFieldsView};
pub use ocr_text::OcrTextView;
pub use page::ResultPage;
