use chrono::NaiveDate;
use metrics::{AggregateSummary, Budgeted, LimitMetrics, MetricsEngine};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Limit {
    pub id: String,
    pub category_slug: String,
    pub category_name: String,
    pub period: String,       // YYYY-MM
    pub period_label: String, // "February 2026"
    pub limit_amount: f64,
    pub spent_amount: f64,
}

impl Budgeted for Limit {
    fn limit_amount(&self) -> f64 {
        self.limit_amount
    }

    fn spent_amount(&self) -> f64 {
        self.spent_amount
    }
}

/// A limit together with the figures the limits screen shows for it.
#[derive(Debug, Serialize, Clone)]
pub struct LimitView {
    #[serde(flatten)]
    pub limit: Limit,
    pub metrics: LimitMetrics,
    pub percent_label: String,
}

impl From<Limit> for LimitView {
    fn from(limit: Limit) -> Self {
        let metrics = MetricsEngine::limit_metrics(limit.limit_amount, limit.spent_amount);
        LimitView {
            percent_label: metrics.percent_label(),
            metrics,
            limit,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LimitsOverview {
    pub period: Option<String>,
    pub limits: Vec<LimitView>,
    pub summary: AggregateSummary,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateLimitRequest {
    #[validate(length(min = 1))]
    pub category_slug: String,
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
    #[validate(custom(function = "validate_period"))]
    pub period: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLimitRequest {
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
}

pub fn validate_period(period: &str) -> Result<(), ValidationError> {
    parse_period(period)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("period_format"))
}

/// First day of a `YYYY-MM` period.
pub fn parse_period(period: &str) -> Option<NaiveDate> {
    if period.len() != 7 {
        return None;
    }
    NaiveDate::parse_from_str(&format!("{period}-01"), "%Y-%m-%d").ok()
}

pub fn period_label(period: &str) -> Option<String> {
    parse_period(period).map(|d| d.format("%B %Y").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_parsing() {
        assert_eq!(period_label("2026-02").as_deref(), Some("February 2026"));
        assert!(parse_period("2026-13").is_none());
        assert!(parse_period("2026-2").is_none());
        assert!(parse_period("Feb 2026").is_none());
    }

    #[test]
    fn test_create_limit_request_validation() {
        let req = CreateLimitRequest {
            category_slug: "products".into(),
            amount: 0.0,
            period: "2026/02".into(),
        };
        let errors = req.validate().expect_err("zero amount and bad period");
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 2);
        assert_eq!("range", fields["amount"][0].code);
        assert_eq!("period_format", fields["period"][0].code);
    }

    #[test]
    fn test_limit_view_carries_metrics() {
        let view = LimitView::from(Limit {
            id: "1".into(),
            category_slug: "products".into(),
            category_name: "Groceries".into(),
            period: "2026-02".into(),
            period_label: "February 2026".into(),
            limit_amount: 20000.0,
            spent_amount: 18500.0,
        });
        assert_eq!(view.metrics.remaining, 1500.0);
        assert_eq!(view.percent_label, "92.5%");
    }
}
