use crate::models::{AggregateSummary, Budgeted, GoalMetrics, LimitMetrics, LimitStatus};

pub struct MetricsEngine;

impl MetricsEngine {
    pub fn limit_metrics(limit_amount: f64, spent_amount: f64) -> LimitMetrics {
        let ratio = clamped_ratio(spent_amount, limit_amount);
        LimitMetrics {
            remaining: remaining(limit_amount, spent_amount),
            ratio,
            status: LimitStatus::from_ratio(ratio),
        }
    }

    pub fn goal_metrics(target_amount: f64, saved_amount: f64) -> GoalMetrics {
        GoalMetrics {
            remaining: remaining(target_amount, saved_amount),
            progress_fraction: clamped_ratio(saved_amount, target_amount),
        }
    }

    pub fn aggregate_summary<B: Budgeted>(limits: &[B]) -> AggregateSummary {
        let total_limit: f64 = limits.iter().map(Budgeted::limit_amount).sum();
        let total_spent: f64 = limits.iter().map(Budgeted::spent_amount).sum();

        AggregateSummary {
            total_limit,
            total_spent,
            total_remaining: remaining(total_limit, total_spent),
        }
    }
}

// A non-positive (or NaN) denominator yields 0 instead of dividing.
fn clamped_ratio(numerator: f64, denominator: f64) -> f64 {
    if !(denominator > 0.0) {
        return 0.0;
    }

    let ratio = numerator / denominator;
    if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) }
}

fn remaining(ceiling: f64, used: f64) -> f64 {
    (ceiling - used).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_close_to_ceiling() {
        let m = MetricsEngine::limit_metrics(20000.0, 18500.0);
        assert_eq!(m.ratio, 0.925);
        assert_eq!(m.status, LimitStatus::Close);
        assert_eq!(m.remaining, 1500.0);
    }

    #[test]
    fn test_limit_exactly_spent() {
        let m = MetricsEngine::limit_metrics(20000.0, 20000.0);
        assert_eq!(m.ratio, 1.0);
        assert_eq!(m.status, LimitStatus::Exceeded);
        assert_eq!(m.remaining, 0.0);
    }

    #[test]
    fn test_goal_label_survives_float_error() {
        assert_eq!(MetricsEngine::goal_metrics(100.0, 29.0).percent_label(), "29%");
        assert_eq!(MetricsEngine::goal_metrics(100.0, 57.0).percent_label(), "57%");
        assert_eq!(MetricsEngine::goal_metrics(1000.0, 580.0).percent_label(), "58%");
    }

    #[test]
    fn test_limit_overspent_is_clamped() {
        let m = MetricsEngine::limit_metrics(10000.0, 14000.0);
        assert_eq!(m.ratio, 1.0);
        assert_eq!(m.status, LimitStatus::Exceeded);
        assert_eq!(m.remaining, 0.0);
    }

    #[test]
    fn test_limit_at_eighty_percent_is_close() {
        let m = MetricsEngine::limit_metrics(20000.0, 16000.0);
        assert_eq!(m.ratio, 0.8);
        assert_eq!(m.status, LimitStatus::Close);
    }

    #[test]
    fn test_limit_zero_ceiling_is_guarded() {
        let m = MetricsEngine::limit_metrics(0.0, 500.0);
        assert_eq!(m.ratio, 0.0);
        assert_eq!(m.status, LimitStatus::Ok);
        assert_eq!(m.remaining, 0.0);

        let negative = MetricsEngine::limit_metrics(-100.0, 50.0);
        assert_eq!(negative.ratio, 0.0);
        assert_eq!(negative.status, LimitStatus::Ok);
    }

    #[test]
    fn test_limit_negative_spend_clamps_to_zero() {
        let m = MetricsEngine::limit_metrics(1000.0, -200.0);
        assert_eq!(m.ratio, 0.0);
        assert_eq!(m.status, LimitStatus::Ok);
        assert_eq!(m.remaining, 1200.0);
    }

    #[test]
    fn test_goal_progress() {
        let m = MetricsEngine::goal_metrics(200000.0, 145000.0);
        assert!((m.progress_fraction - 0.725).abs() < 1e-9);
        assert_eq!(m.remaining, 55000.0);
    }

    #[test]
    fn test_goal_over_target() {
        let m = MetricsEngine::goal_metrics(1000.0, 1500.0);
        assert_eq!(m.progress_fraction, 1.0);
        assert_eq!(m.remaining, 0.0);
    }

    #[test]
    fn test_goal_zero_target_is_guarded() {
        let m = MetricsEngine::goal_metrics(0.0, 100.0);
        assert_eq!(m.progress_fraction, 0.0);
        assert_eq!(m.remaining, 0.0);
    }

    #[test]
    fn test_aggregate_summary() {
        let limits = [(20000.0, 18500.0), (15000.0, 12300.0), (10000.0, 8900.0)];
        let summary = MetricsEngine::aggregate_summary(&limits);
        assert_eq!(summary.total_limit, 45000.0);
        assert_eq!(summary.total_spent, 39700.0);
        assert_eq!(summary.total_remaining, 5300.0);
    }

    #[test]
    fn test_aggregate_summary_empty() {
        let limits: [(f64, f64); 0] = [];
        assert_eq!(MetricsEngine::aggregate_summary(&limits), AggregateSummary::default());
    }

    #[test]
    fn test_aggregate_overspent_total_is_clamped() {
        let limits = [(1000.0, 1500.0), (1000.0, 900.0)];
        let summary = MetricsEngine::aggregate_summary(&limits);
        assert_eq!(summary.total_remaining, 0.0);
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let limits = [(20000.0, 18500.0), (15000.0, 12300.0)];
        assert_eq!(
            MetricsEngine::limit_metrics(20000.0, 18500.0),
            MetricsEngine::limit_metrics(20000.0, 18500.0)
        );
        assert_eq!(
            MetricsEngine::goal_metrics(500.0, 250.0),
            MetricsEngine::goal_metrics(500.0, 250.0)
        );
        assert_eq!(
            MetricsEngine::aggregate_summary(&limits),
            MetricsEngine::aggregate_summary(&limits)
        );
    }
}
