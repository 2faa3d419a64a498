use super::confidence::{percent, ConfidenceTier};
use crate::types::ProcessingResult;
use serde::Serialize;

const TYPE_COLORS: &[(&str, &str)] = &[
    ("invoice", "bg-blue-100 text-blue-800 dark:bg-blue-900 dark:text-blue-200"),
    ("budget", "bg-green-100 text-green-800 dark:bg-green-900 dark:text-green-200"),
    ("form", "bg-purple-100 text-purple-800 dark:bg-purple-900 dark:text-purple-200"),
    ("letter", "bg-orange-100 text-orange-800 dark:bg-orange-900 dark:text-orange-200"),
    ("memo", "bg-yellow-100 text-yellow-800 dark:bg-yellow-900 dark:text-yellow-200"),
    ("resume", "bg-pink-100 text-pink-800 dark:bg-pink-900 dark:text-pink-200"),
    ("email", "bg-cyan-100 text-cyan-800 dark:bg-cyan-900 dark:text-cyan-200"),
    ("receipt", "bg-emerald-100 text-emerald-800 dark:bg-emerald-900 dark:text-emerald-200"),
    ("report", "bg-indigo-100 text-indigo-800 dark:bg-indigo-900 dark:text-indigo-200"),
    ("specification", "bg-slate-100 text-slate-800 dark:bg-slate-900 dark:text-slate-200"),
];

const UNKNOWN_TYPE_COLOR: &str = "bg-muted text-muted-foreground";

/// Classification summary card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationView {
    pub label: String,
    pub badge_class: &'static str,
    pub confidence_percent: u32,
    pub tier: ConfidenceTier,
    pub bar_class: &'static str,
    pub processing_time: String,
}

impl ClassificationView {
    pub fn from_result(result: &ProcessingResult) -> Self {
        let confidence_percent = percent(result.confidence);
        let tier = ConfidenceTier::from_percent(confidence_percent);
        Self {
            label: document_type_label(&result.document_type),
            badge_class: type_color(&result.document_type),
            confidence_percent,
            tier,
            bar_class: tier.bar_class(),
            processing_time: seconds_label(result.processing_time_ms),
        }
    }
}

/// `news_article` -> `NEWS ARTICLE`.
pub fn document_type_label(document_type: &str) -> String {
    document_type.replace('_', " ").to_uppercase()
}

/// Milliseconds as seconds with one decimal; halves round up (1250 -> "1.3s").
fn seconds_label(ms: u64) -> String {
    let tenths = ms.saturating_add(50) / 100;
    format!("{}.{}s", tenths / 10, tenths % 10)
}

fn type_color(document_type: &str) -> &'static str {
    TYPE_COLORS
        .iter()
        .find(|(t, _)| *t == document_type)
        .map(|(_, class)| *class)
        .unwrap_or(UNKNOWN_TYPE_COLOR)
}
