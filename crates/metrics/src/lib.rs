//! Derived figures for spending limits and savings goals.

pub mod engine;
pub mod models;

pub use engine::MetricsEngine;
pub use models::{AggregateSummary, Budgeted, GoalMetrics, LimitMetrics, LimitStatus};
