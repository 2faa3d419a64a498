use serde::Serialize;

/// Visual tier for a confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    pub const HIGH_THRESHOLD: f64 = 0.90;
    pub const MEDIUM_THRESHOLD: f64 = 0.75;

    /// Score in 0..=1. NaN lands in `Low`.
    pub fn from_score(score: f64) -> Self {
        if score >= Self::HIGH_THRESHOLD {
            Self::High
        } else if score >= Self::MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn from_percent(pct: u32) -> Self {
        Self::from_score(f64::from(pct) / 100.0)
    }

    /// Badge colours for field rows.
    pub fn badge_class(self) -> &'static str {
        match self {
            Self::High => "bg-green-100 text-green-800 dark:bg-green-900 dark:text-green-200",
            Self::Medium => "bg-yellow-100 text-yellow-800 dark:bg-yellow-900 dark:text-yellow-200",
            Self::Low => "bg-red-100 text-red-800 dark:bg-red-900 dark:text-red-200",
        }
    }

    /// Fill colour for the classification confidence bar.
    pub fn bar_class(self) -> &'static str {
        match self {
            Self::High => "bg-emerald-500",
            Self::Medium => "bg-yellow-500",
            Self::Low => "bg-red-500",
        }
    }
}

/// Whole-number percentage, clamped to 0..=100.
pub fn percent(score: f64) -> u32 {
    if !score.is_finite() {
        return 0;
    }
    (score * 100.0).round().clamp(0.0, 100.0) as u32
}
