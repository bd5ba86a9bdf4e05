//! Rule-based insights and chat replies built from limits, goals and debts.

use crate::models::{Insight, InsightType};
use goals::models::{DebtsOverview, GoalView};
use limits::models::{Limit, LimitView};
use metrics::{LimitStatus, MetricsEngine};

/// Goals funded at least this much are reported as a success.
pub const GOAL_SUCCESS_THRESHOLD: f64 = 0.7;

/// Topic a chat message is about, picked by keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Limits,
    Goals,
    Debts,
    General,
}

impl Topic {
    pub fn detect(message: &str) -> Self {
        let text = message.to_lowercase();
        let mentions = |words: &[&str]| words.iter().any(|w| text.contains(w));

        if mentions(&["limit", "budget", "spend", "spent"]) {
            Topic::Limits
        } else if mentions(&["goal", "saving", "save"]) {
            Topic::Goals
        } else if mentions(&["debt", "owe", "lend", "borrow"]) {
            Topic::Debts
        } else {
            Topic::General
        }
    }
}

/// Dangers first, then warnings, then successes. A single INFO entry when
/// nothing qualifies.
pub fn derive_insights(limits: &[LimitView], goals: &[GoalView]) -> Vec<Insight> {
    let mut dangers = Vec::new();
    let mut warnings = Vec::new();

    for view in limits {
        let limit = &view.limit;
        match view.metrics.status {
            LimitStatus::Exceeded => dangers.push(Insight {
                id: format!("limit_{}", limit.id),
                kind: InsightType::Danger,
                title: format!("{} limit exceeded", limit.category_name),
                description: format!(
                    "Spent {:.0} of {:.0} ({}) in {}.",
                    limit.spent_amount, limit.limit_amount, view.percent_label, limit.period_label
                ),
                recommendation: format!(
                    "Pause non-essential {} purchases until the next period.",
                    limit.category_name.to_lowercase()
                ),
            }),
            LimitStatus::Close => warnings.push(Insight {
                id: format!("limit_{}", limit.id),
                kind: InsightType::Warning,
                title: format!("{} limit almost used", limit.category_name),
                description: format!(
                    "{} of the {} limit is spent, {:.0} left.",
                    view.percent_label, limit.period_label, view.metrics.remaining
                ),
                recommendation: format!(
                    "Keep {} spending under {:.0} for the rest of the period.",
                    limit.category_name.to_lowercase(),
                    view.metrics.remaining
                ),
            }),
            LimitStatus::Ok => {}
        }
    }

    let successes = goals
        .iter()
        .filter(|view| view.metrics.progress_fraction >= GOAL_SUCCESS_THRESHOLD)
        .map(|view| Insight {
            id: format!("goal_{}", view.goal.id),
            kind: InsightType::Success,
            title: format!("{} is {} funded", view.goal.title, view.percent_label),
            description: format!(
                "{:.0} saved, {:.0} to go with {} days left.",
                view.goal.saved_amount, view.metrics.remaining, view.goal.days_left
            ),
            recommendation: "Keep the current pace of contributions.".to_string(),
        });

    let mut insights: Vec<Insight> = dangers.into_iter().chain(warnings).chain(successes).collect();

    if insights.is_empty() {
        insights.push(Insight {
            id: "all_clear".to_string(),
            kind: InsightType::Info,
            title: "Everything is on track".to_string(),
            description: "No limit is close to its cap and no goal needs attention.".to_string(),
            recommendation: "Consider setting a new savings goal.".to_string(),
        });
    }

    insights
}

pub fn limits_reply(limits: &[Limit]) -> String {
    if limits.is_empty() {
        return "You have no spending limits yet. Add one on the Limits screen to track a category.".to_string();
    }

    let summary = MetricsEngine::aggregate_summary(limits);
    let at_risk = limits
        .iter()
        .filter(|l| MetricsEngine::limit_metrics(l.limit_amount, l.spent_amount).status != LimitStatus::Ok)
        .count();

    format!(
        "Across {} limits you have spent {:.0} of {:.0}, so {:.0} is left. {} of them need attention.",
        limits.len(),
        summary.total_spent,
        summary.total_limit,
        summary.total_remaining,
        at_risk
    )
}

pub fn goals_reply(goals: &[GoalView]) -> String {
    let Some(closest) = goals
        .iter()
        .max_by(|a, b| a.metrics.progress_fraction.total_cmp(&b.metrics.progress_fraction))
    else {
        return "You have no savings goals yet. Create one and I will track its progress.".to_string();
    };

    let saved: f64 = goals.iter().map(|g| g.goal.saved_amount).sum();
    let target: f64 = goals.iter().map(|g| g.goal.target_amount).sum();

    format!(
        "You are saving toward {} goals: {:.0} of {:.0} so far. Closest to done is {} at {}.",
        goals.len(),
        saved,
        target,
        closest.goal.title,
        closest.percent_label
    )
}

pub fn debts_reply(debts: &DebtsOverview) -> String {
    if debts.active.is_empty() {
        return "You have no active debts.".to_string();
    }

    format!(
        "You have {} active debts: you owe {:.0} and are owed {:.0}.",
        debts.active.len(),
        debts.total_i_owe,
        debts.total_they_owe
    )
}

pub fn general_reply() -> String {
    "I can review your spending limits, savings goals and debts. Try asking how your limits look this month."
        .to_string()
}
