use chrono::NaiveDate;
use metrics::{GoalMetrics, MetricsEngine};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Accent colours handed out to new goals, RGB hex without '#'.
pub const ACCENT_PALETTE: [&str; 4] = ["3B82F6", "8B5CF6", "10B981", "F59E0B"];

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Goal {
    pub id: String,
    pub emoji: String,
    pub title: String,
    pub days_left: i64,
    pub saved_amount: f64,
    pub target_amount: f64,
    pub accent_color: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct GoalView {
    #[serde(flatten)]
    pub goal: Goal,
    pub metrics: GoalMetrics,
    pub percent_label: String,
}

impl From<Goal> for GoalView {
    fn from(goal: Goal) -> Self {
        let metrics = MetricsEngine::goal_metrics(goal.target_amount, goal.saved_amount);
        GoalView {
            percent_label: metrics.percent_label(),
            metrics,
            goal,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateGoalRequest {
    #[validate(custom(function = "not_blank"))]
    pub emoji: String,
    #[validate(length(max = 80), custom(function = "not_blank"))]
    pub title: String,
    #[validate(range(exclusive_min = 0.0))]
    pub target_amount: f64,
    #[validate(custom(function = "validate_date"))]
    pub target_date: String, // YYYY-MM-DD
}

#[derive(Debug, Deserialize, Validate)]
pub struct ContributionRequest {
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DebtType {
    IOwe,
    TheyOwe,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Debt {
    pub id: String,
    pub person_name: String,
    pub kind: DebtType,
    pub amount: f64,
    pub due_date: String, // YYYY-MM-DD
    pub is_paid: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDebtRequest {
    #[validate(length(max = 80), custom(function = "not_blank"))]
    pub person_name: String,
    pub kind: DebtType,
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
    #[validate(custom(function = "validate_date"))]
    pub due_date: String,
}

/// Debts split the way the debts tab shows them. Totals only count active debts.
#[derive(Debug, Serialize)]
pub struct DebtsOverview {
    pub active: Vec<Debt>,
    pub paid: Vec<Debt>,
    pub total_i_owe: f64,
    pub total_they_owe: f64,
}

impl DebtsOverview {
    pub fn from_debts(debts: Vec<Debt>) -> Self {
        let (paid, active): (Vec<Debt>, Vec<Debt>) = debts.into_iter().partition(|d| d.is_paid);
        let total = |kind: DebtType| -> f64 {
            active.iter().filter(|d| d.kind == kind).map(|d| d.amount).sum()
        };

        DebtsOverview {
            total_i_owe: total(DebtType::IOwe),
            total_they_owe: total(DebtType::TheyOwe),
            active,
            paid,
        }
    }
}

/// Both tabs of the goals screen.
#[derive(Debug, Serialize)]
pub struct GoalsScreen {
    pub goals: Vec<GoalView>,
    pub debts: DebtsOverview,
}

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

pub fn validate_date(value: &str) -> Result<(), ValidationError> {
    parse_date(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("date_format"))
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}
