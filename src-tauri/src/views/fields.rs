use super::confidence::{percent, ConfidenceTier};
use crate::types::ExtractedField;
use serde::Serialize;

struct KeyFieldSpec {
    field: &'static str,
    label: &'static str,
    icon: &'static str,
    color: &'static str,
    bg: &'static str,
}

/// Highlighted fields, in display order.
const KEY_FIELDS: &[KeyFieldSpec] = &[
    KeyFieldSpec {
        field: "Total",
        label: "Total Amount",
        icon: "dollar-sign",
        color: "text-emerald-600 dark:text-emerald-400",
        bg: "bg-emerald-50 dark:bg-emerald-950/30",
    },
    KeyFieldSpec {
        field: "Date",
        label: "Document Date",
        icon: "calendar",
        color: "text-blue-600 dark:text-blue-400",
        bg: "bg-blue-50 dark:bg-blue-950/30",
    },
    KeyFieldSpec {
        field: "Invoice Number",
        label: "Reference",
        icon: "hash",
        color: "text-violet-600 dark:text-violet-400",
        bg: "bg-violet-50 dark:bg-violet-950/30",
    },
];

const NO_FIELDS_MESSAGE: &str = "No structured fields could be extracted from this document.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyFieldCard {
    pub label: &'static str,
    pub value: String,
    pub icon: &'static str,
    pub color_class: &'static str,
    pub bg_class: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyFieldsView {
    pub cards: Vec<KeyFieldCard>,
    /// 1..=3, one column per card.
    pub columns: usize,
}

impl KeyFieldsView {
    /// `None` when none of the key fields were extracted; the panel is then not shown.
    pub fn from_fields(fields: &[ExtractedField]) -> Option<Self> {
        let cards: Vec<KeyFieldCard> = KEY_FIELDS
            .iter()
            .filter_map(|spec| {
                let found = fields.iter().find(|f| f.field == spec.field)?;
                Some(KeyFieldCard {
                    label: spec.label,
                    value: found.value.clone(),
                    icon: spec.icon,
                    color_class: spec.color,
                    bg_class: spec.bg,
                })
            })
            .collect();
        if cards.is_empty() {
            return None;
        }
        let columns = cards.len();
        Some(Self { cards, columns })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedFieldRow {
    /// Row key; field names may repeat.
    pub key: String,
    pub field: String,
    pub value: String,
    pub confidence_percent: u32,
    pub tier: ConfidenceTier,
    pub badge_class: &'static str,
}

/// Full extracted-fields table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedFieldsView {
    pub count: usize,
    /// "(N found)" beside the card title; absent for an empty table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_suffix: Option<String>,
    pub rows: Vec<ExtractedFieldRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<&'static str>,
}

impl ExtractedFieldsView {
    pub fn from_fields(fields: &[ExtractedField]) -> Self {
        let rows: Vec<ExtractedFieldRow> = fields
            .iter()
            .enumerate()
            .map(|(i, f)| {
                let tier = ConfidenceTier::from_score(f.confidence);
                ExtractedFieldRow {
                    key: format!("{}-{}", f.field, i),
                    field: f.field.clone(),
                    value: f.value.clone(),
                    confidence_percent: percent(f.confidence),
                    tier,
                    badge_class: tier.badge_class(),
                }
            })
            .collect();
        let count = rows.len();
        Self {
            count,
            title_suffix: (count > 0).then(|| format!("({} found)", count)),
            empty_message: rows.is_empty().then_some(NO_FIELDS_MESSAGE),
            rows,
        }
    }
}
