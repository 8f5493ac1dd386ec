// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Value objects produced by the goal analysis engine.
//!
//! Everything here is plain data: built once per call, never mutated,
//! serialised with camelCase keys.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeasibilityStatus {
    Excellent,
    Good,
    Challenging,
    Difficult,
    VeryDifficult,
}

impl FeasibilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeasibilityStatus::Excellent => "excellent",
            FeasibilityStatus::Good => "good",
            FeasibilityStatus::Challenging => "challenging",
            FeasibilityStatus::Difficult => "difficult",
            FeasibilityStatus::VeryDifficult => "very_difficult",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Moderate,
    Hard,
    VeryHard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Moderate => "moderate",
            Difficulty::Hard => "hard",
            Difficulty::VeryHard => "very_hard",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalAnalysis {
    pub goal_summary: GoalSummary,
    pub financial_snapshot: FinancialSnapshot,
    pub feasibility_analysis: FeasibilityAnalysis,
    pub savings_strategy: Vec<SavingsStrategy>,
    pub budget_recommendations: Vec<BudgetRecommendation>,
    pub milestones_plan: Vec<PlannedMilestone>,
    pub risk_assessment: RiskAssessment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSummary {
    pub goal_id: i64,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub remaining_amount: Decimal,
    pub progress_percentage: Decimal,
    pub target_date: NaiveDate,
    pub months_to_goal: u32,
    pub required_monthly_saving: Decimal,
    pub monthly_contribution: Decimal,
}

/// "Typical month" view of the lookback window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSnapshot {
    pub monthly_salary: Decimal,
    pub avg_monthly_income: Decimal,
    pub avg_monthly_expenses: Decimal,
    /// Salary plus tracked income.
    pub monthly_income: Decimal,
    pub monthly_expenses: Decimal,
    pub current_savings_capacity: Decimal,
    /// Expense totals per category over the whole window (not per month).
    pub category_spending: BTreeMap<String, Decimal>,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeasibilityAnalysis {
    /// Clamped to [0, 100].
    pub feasibility_score: Decimal,
    pub status: FeasibilityStatus,
    pub difficulty: Difficulty,
    pub shortfall: Decimal,
    /// Unclamped, may be negative or above 100.
    pub surplus_percentage: Decimal,
    pub is_feasible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    AutomateTransfers,
    ReduceExpenses,
    IncreaseIncome,
    UseWindfalls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsStrategy {
    pub kind: StrategyKind,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    pub impact: Level,
    pub effort: Level,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRecommendation {
    pub category: String,
    pub current_monthly_spend: Decimal,
    pub reduction_percentage: u32,
    pub reduction_target: Decimal,
    pub suggested_budget: Decimal,
    pub priority: Level,
    pub rationale: String,
}

/// Forward-looking checkpoint; unrelated to the goal's persisted achieved flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedMilestone {
    pub percentage: u32,
    pub amount: Decimal,
    pub target_month: u32,
    pub target_date: NaiveDate,
    pub celebration: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskKind {
    TimelineRisk,
    IncomeRisk,
    EmergencyRisk,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFactor {
    pub kind: RiskKind,
    pub level: Level,
    pub description: String,
    pub mitigation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub overall_risk: Level,
    pub risks: Vec<RiskFactor>,
    /// Clamped to [30, 95].
    pub success_probability: Decimal,
}
