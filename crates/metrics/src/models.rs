use serde::{Deserialize, Serialize};

/// Share of a limit at which it is reported as close to exhausted.
pub const CLOSE_THRESHOLD: f64 = 0.8;
/// Share of a limit at which it is reported as exceeded.
pub const EXCEEDED_THRESHOLD: f64 = 1.0;

// Absorbs float error such as 0.29 * 100.0 == 28.999999999999996.
const PERCENT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LimitStatus {
    Ok,
    Close,
    Exceeded,
}

impl LimitStatus {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= EXCEEDED_THRESHOLD {
            LimitStatus::Exceeded
        } else if ratio >= CLOSE_THRESHOLD {
            LimitStatus::Close
        } else {
            LimitStatus::Ok
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LimitMetrics {
    pub remaining: f64,
    pub ratio: f64,
    pub status: LimitStatus,
}

impl LimitMetrics {
    /// Ratio as a percentage with one decimal, e.g. "92.5%".
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.ratio * 100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalMetrics {
    pub remaining: f64,
    pub progress_fraction: f64,
}

impl GoalMetrics {
    /// Whole percentage, truncated, e.g. "72%".
    pub fn percent_label(&self) -> String {
        format!("{}%", (self.progress_fraction * 100.0 + PERCENT_EPSILON).floor() as i64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AggregateSummary {
    pub total_limit: f64,
    pub total_spent: f64,
    pub total_remaining: f64,
}

/// Anything carrying a spending ceiling and the amount spent against it.
pub trait Budgeted {
    fn limit_amount(&self) -> f64;
    fn spent_amount(&self) -> f64;
}

// (limit, spent)
impl Budgeted for (f64, f64) {
    fn limit_amount(&self) -> f64 {
        self.0
    }

    fn spent_amount(&self) -> f64 {
        self.1
    }
}

impl<T: Budgeted + ?Sized> Budgeted for &T {
    fn limit_amount(&self) -> f64 {
        (**self).limit_amount()
    }

    fn spent_amount(&self) -> f64 {
        (**self).spent_amount()
    }
}
